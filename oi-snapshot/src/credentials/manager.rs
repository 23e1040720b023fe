//! Credential acquisition trait.

use async_trait::async_trait;
use nse_client::AcquisitionError;

use super::types::TokenSet;

/// Obtains a fresh [`TokenSet`] from the remote origin.
///
/// Implementations perform a single attempt and do not touch the
/// [`CredentialStore`](super::CredentialStore); storing the result and
/// deciding when to retry belong to the poller.
#[async_trait]
pub trait CredentialAcquirer: Send + Sync {
    /// Run the handshake and return the cookies it produced.
    async fn acquire(&self) -> Result<TokenSet, AcquisitionError>;
}
