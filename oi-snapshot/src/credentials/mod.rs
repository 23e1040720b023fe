//! Session credential management.
//!
//! The option-chain API only answers requests that carry the cookies handed
//! out by the site's anti-bot layer. This module holds those cookies and
//! knows how to obtain new ones.
//!
//! # Architecture
//!
//! - [`TokenSet`]: one immutable set of cookies plus its acquisition time
//! - [`CredentialStore`]: the current set, swapped wholesale on renewal
//! - [`CredentialAcquirer`]: performs the handshake that produces a new set

mod manager;
mod store;
mod types;

// Provider-specific implementations
pub mod platforms;

pub use manager::CredentialAcquirer;
pub use store::CredentialStore;
pub use types::TokenSet;
