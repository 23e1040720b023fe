//! NSE credential acquirer.
//!
//! Delegates the handshake to the nse-client crate and wraps the resulting
//! cookie jar into a time-stamped [`TokenSet`].

use std::sync::Arc;

use async_trait::async_trait;
use nse_client::{AcquisitionError, NseSession};
use tracing::{debug, instrument};

use crate::credentials::manager::CredentialAcquirer;
use crate::credentials::types::TokenSet;

pub struct NseCredentialAcquirer {
    session: Arc<NseSession>,
}

impl NseCredentialAcquirer {
    pub fn new(session: Arc<NseSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl CredentialAcquirer for NseCredentialAcquirer {
    #[instrument(skip(self))]
    async fn acquire(&self) -> Result<TokenSet, AcquisitionError> {
        let cookies = self.session.handshake().await?;
        let tokens = TokenSet::new(cookies);
        debug!(cookies = ?tokens.cookie_names(), "Acquired NSE session cookies");
        Ok(tokens)
    }
}
