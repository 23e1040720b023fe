//! NIFTY option-chain open-interest snapshot service.
//!
//! A background poller keeps a session with the NSE website alive, pulls the
//! option chain once per interval and publishes the aggregate CE/PE open
//! interest into an in-memory cache. The HTTP API serves whatever the cache
//! holds and never calls the remote itself.

pub mod api;
pub mod cache;
pub mod config;
pub mod credentials;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod poller;
pub mod utils;

pub use error::{Error, Result};
