//! Option-chain fetching and decoding.

mod remote;
mod snapshot;

pub use remote::{NseOptionChainFetcher, RawPayload, RemoteFetcher};
pub use snapshot::Snapshot;
