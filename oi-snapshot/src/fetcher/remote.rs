//! Authenticated option-chain retrieval.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use nse_client::{FetchError, NseSession};
use tracing::instrument;

use super::snapshot::Snapshot;
use crate::credentials::TokenSet;

/// Undecoded response body of the data endpoint.
pub type RawPayload = Bytes;

/// Single-attempt access to the data endpoint.
///
/// No retries happen here. On [`FetchError::Unauthorized`] the caller is
/// expected to renew the session and try again.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// Issue one authenticated request using `tokens` as cookies.
    async fn fetch_raw(&self, tokens: &TokenSet) -> Result<RawPayload, FetchError>;

    /// Extract the open-interest totals from a payload.
    fn parse(&self, payload: &RawPayload) -> Result<Snapshot, FetchError> {
        Snapshot::from_payload(payload)
    }
}

/// [`RemoteFetcher`] backed by the NSE option-chain API.
pub struct NseOptionChainFetcher {
    session: Arc<NseSession>,
}

impl NseOptionChainFetcher {
    pub fn new(session: Arc<NseSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl RemoteFetcher for NseOptionChainFetcher {
    #[instrument(skip(self, tokens), fields(cookies = tokens.len()))]
    async fn fetch_raw(&self, tokens: &TokenSet) -> Result<RawPayload, FetchError> {
        let cookie_header = tokens.cookie_header();
        self.session
            .fetch_option_chain(cookie_header.as_deref())
            .await
    }
}
