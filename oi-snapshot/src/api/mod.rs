//! HTTP API.
//!
//! Serves the cached totals and the poller health. Handlers only ever read
//! from the cache; they never trigger a fetch.

pub mod error;
pub mod models;
pub mod routes;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use server::{ApiServer, ApiServerConfig, AppState};
