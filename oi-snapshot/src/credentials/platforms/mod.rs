//! Provider-specific credential acquirers.

pub mod nse;

pub use nse::NseCredentialAcquirer;
