//! Core credential types.

use std::time::Duration;

use rustc_hash::FxHashMap;
use tokio::time::Instant;

/// One complete set of session cookies from a single handshake.
///
/// Never edited in place: a renewal produces a new `TokenSet` that replaces
/// the old one wholesale.
#[derive(Debug, Clone)]
pub struct TokenSet {
    cookies: FxHashMap<String, String>,
    acquired_at: Instant,
}

impl TokenSet {
    /// Create a token set stamped with the current time.
    pub fn new(cookies: FxHashMap<String, String>) -> Self {
        Self::acquired_at(cookies, Instant::now())
    }

    /// Create a token set with an explicit acquisition time.
    pub fn acquired_at(cookies: FxHashMap<String, String>, acquired_at: Instant) -> Self {
        Self {
            cookies,
            acquired_at,
        }
    }

    /// The same cookies, stamped with the current time.
    pub fn restamped(self) -> Self {
        Self {
            acquired_at: Instant::now(),
            ..self
        }
    }

    #[inline]
    pub fn cookies(&self) -> &FxHashMap<String, String> {
        &self.cookies
    }

    #[inline]
    pub fn acquisition_time(&self) -> Instant {
        self.acquired_at
    }

    /// Time elapsed since the handshake completed.
    pub fn age(&self) -> Duration {
        self.acquired_at.elapsed()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Render as a `Cookie` header value, `None` if the set is empty.
    pub fn cookie_header(&self) -> Option<String> {
        nse_client::build_cookie_header(&self.cookies)
    }

    /// Cookie names only, for logging. Values are never logged.
    pub fn cookie_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.cookies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
