//! Session handshake and the authenticated option-chain request.
//!
//! Both operations are single attempts. Deciding when to retry, and with which
//! cookies, is left to the caller.

use bytes::Bytes;
use reqwest::header::COOKIE;
use reqwest::{Client, StatusCode};
use rustc_hash::FxHashMap;
use tracing::{debug, instrument, trace};

use crate::client::BrowserHeaders;
use crate::cookies::{build_cookie_header, parse_set_cookies};
use crate::endpoints::NseEndpoints;
use crate::error::{AcquisitionError, FetchError};

/// HTTP access to the NSE site for one configured set of endpoints.
#[derive(Debug, Clone)]
pub struct NseSession {
    client: Client,
    endpoints: NseEndpoints,
    headers: BrowserHeaders,
}

impl NseSession {
    pub fn new(client: Client, endpoints: NseEndpoints, headers: BrowserHeaders) -> Self {
        Self {
            client,
            endpoints,
            headers,
        }
    }

    pub fn endpoints(&self) -> &NseEndpoints {
        &self.endpoints
    }

    /// Visit the site root and then the option-chain landing page, collecting
    /// every cookie issued along the way.
    ///
    /// Cookies from the first page are sent with the second, the way a browser
    /// would. The returned jar holds the union of both responses.
    #[instrument(skip(self), fields(origin = %self.endpoints.origin_url))]
    pub async fn handshake(&self) -> Result<FxHashMap<String, String>, AcquisitionError> {
        let mut jar = FxHashMap::default();

        for url in [&self.endpoints.origin_url, &self.endpoints.landing_url] {
            self.visit(url, &mut jar).await?;
        }

        debug!(cookies = jar.len(), "Session handshake completed");
        Ok(jar)
    }

    async fn visit(
        &self,
        url: &str,
        jar: &mut FxHashMap<String, String>,
    ) -> Result<(), AcquisitionError> {
        let mut request = self.client.get(url).headers(self.headers.page_headers());
        if let Some(cookie) = build_cookie_header(jar) {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AcquisitionError::UnexpectedStatus {
                url: url.to_string(),
                status,
            });
        }

        let stored = parse_set_cookies(response.headers(), jar);
        // Drain the page so the pooled connection can be reused.
        let body = response.bytes().await?;
        trace!(%url, stored, body_len = body.len(), "Handshake page visited");
        Ok(())
    }

    /// Issue one GET against the option-chain API.
    ///
    /// 401 and 403 map to [`FetchError::Unauthorized`], which callers treat as
    /// a signal to renew the session.
    #[instrument(skip(self, cookie_header), fields(api = %self.endpoints.api_url))]
    pub async fn fetch_option_chain(&self, cookie_header: Option<&str>) -> Result<Bytes, FetchError> {
        let mut request = self
            .client
            .get(&self.endpoints.api_url)
            .headers(self.headers.api_headers(&self.endpoints.landing_url));
        if let Some(cookie) = cookie_header {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::Unauthorized(status));
        }
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus(status));
        }

        let body = response.bytes().await?;
        trace!(body_len = body.len(), "Option chain fetched");
        Ok(body)
    }
}
