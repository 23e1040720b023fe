//! Client for the NSE option-chain API.
//!
//! The API sits behind an anti-bot layer that only answers requests carrying
//! cookies obtained by first browsing the site. This crate provides the
//! building blocks for that flow:
//!
//! - [`NseSession::handshake`]: visit the site root and landing page, collecting cookies
//! - [`NseSession::fetch_option_chain`]: one authenticated request for the raw payload
//! - [`parse_open_interest`]: extract the CE/PE aggregate open interest
//!
//! Nothing here retries or keeps state between calls.

pub mod client;
pub mod cookies;
pub mod endpoints;
pub mod error;
pub mod option_chain;
pub mod session;

pub use client::{
    BrowserHeaders, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, DEFAULT_UA,
    create_client_builder, install_rustls_provider,
};
pub use cookies::{build_cookie_header, parse_set_cookies};
pub use endpoints::NseEndpoints;
pub use error::{AcquisitionError, FetchError};
pub use option_chain::{OpenInterestTotals, parse_open_interest};
pub use session::NseSession;
