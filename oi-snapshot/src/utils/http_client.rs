use std::sync::Arc;

use nse_client::{NseSession, create_client_builder};
use tracing::debug;

use crate::config::HttpConfig;
use crate::error::Result;

/// Build the HTTP client shared by the handshake and the data requests.
pub fn build_nse_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let client = create_client_builder(config.request_timeout, config.connect_timeout).build()?;
    debug!(
        request_timeout_secs = config.request_timeout.as_secs(),
        connect_timeout_secs = config.connect_timeout.as_secs(),
        "Created NSE HTTP client"
    );
    Ok(client)
}

/// Build the session used by both the credential acquirer and the fetcher.
pub fn build_nse_session(config: &HttpConfig) -> Result<Arc<NseSession>> {
    let client = build_nse_client(config)?;
    Ok(Arc::new(NseSession::new(
        client,
        config.endpoints.clone(),
        config.headers.clone(),
    )))
}
