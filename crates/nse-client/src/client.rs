//! HTTP client construction and the browser-like header set.
//!
//! The NSE edge rejects requests that do not look like they come from a
//! desktop browser, so every request carries the same identifying headers.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

pub const DEFAULT_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36";

pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

pub const PAGE_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

pub const API_ACCEPT: &str = "application/json, text/plain, */*";

/// Default timeout for a single request, including reading the body.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for establishing a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Install the aws-lc-rs crypto provider for rustls once per process.
///
/// reqwest is built without a bundled provider, so this must run before the
/// first client is built.
pub fn install_rustls_provider() {
    static PROVIDER_INSTALLED: OnceLock<()> = OnceLock::new();
    PROVIDER_INSTALLED.get_or_init(|| {
        if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
            debug!(existing_provider = ?e, "rustls CryptoProvider already installed");
        }
    });
}

/// Browser-identifying headers sent with every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserHeaders {
    pub user_agent: String,
    pub accept_language: String,
    /// `Accept` used for the HTML pages of the handshake.
    pub page_accept: String,
    /// `Accept` used for the JSON API.
    pub api_accept: String,
}

impl Default for BrowserHeaders {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_UA.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            page_accept: PAGE_ACCEPT.to_string(),
            api_accept: API_ACCEPT.to_string(),
        }
    }
}

impl BrowserHeaders {
    /// Headers for the HTML pages visited during the handshake.
    pub fn page_headers(&self) -> HeaderMap {
        self.build(&self.page_accept, None)
    }

    /// Headers for the JSON data endpoint.
    pub fn api_headers(&self, referer: &str) -> HeaderMap {
        self.build(&self.api_accept, Some(referer))
    }

    fn build(&self, accept: &str, referer: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        insert_header(&mut headers, header::USER_AGENT, &self.user_agent);
        insert_header(&mut headers, header::ACCEPT_LANGUAGE, &self.accept_language);
        insert_header(&mut headers, header::ACCEPT, accept);
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        if let Some(referer) = referer {
            insert_header(&mut headers, header::REFERER, referer);
        }
        // Do not set `Accept-Encoding` here.
        // Reqwest adds it (and decompresses) when the gzip/deflate features are on.
        headers
    }
}

fn insert_header(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(e) => {
            debug!(header = %name, error = %e, "Invalid header value; skipping");
        }
    }
}

/// Timeouts actually applied by [`create_client_builder`]; zero falls back
/// to the default.
pub(crate) fn effective_timeouts(
    request_timeout: Duration,
    connect_timeout: Duration,
) -> (Duration, Duration) {
    let or_default = |value: Duration, default: Duration| {
        if value.is_zero() { default } else { value }
    };
    (
        or_default(request_timeout, DEFAULT_REQUEST_TIMEOUT),
        or_default(connect_timeout, DEFAULT_CONNECT_TIMEOUT),
    )
}

/// Client builder shared by the handshake and the data requests.
///
/// Cookies are tracked explicitly by the caller, so the reqwest cookie store
/// stays disabled. Both timeouts are always set; a zero duration means the
/// default.
pub fn create_client_builder(
    request_timeout: Duration,
    connect_timeout: Duration,
) -> reqwest::ClientBuilder {
    install_rustls_provider();

    let (request_timeout, connect_timeout) = effective_timeouts(request_timeout, connect_timeout);
    reqwest::Client::builder()
        .gzip(true)
        .deflate(true)
        .timeout(request_timeout)
        .connect_timeout(connect_timeout)
}
