//! In-memory holder for the current session cookies.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use super::types::TokenSet;

/// Holds the latest [`TokenSet`].
///
/// The scheduler is the only writer. Readers get an `Arc` clone, so a read
/// never observes a half-replaced set and never holds the lock across an
/// await point.
#[derive(Debug, Default)]
pub struct CredentialStore {
    current: RwLock<Option<Arc<TokenSet>>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` iff a token set is held and it is younger than `max_age`.
    pub fn is_fresh(&self, max_age: Duration) -> bool {
        self.current
            .read()
            .as_ref()
            .is_some_and(|tokens| tokens.age() < max_age)
    }

    /// Swap in a new token set, stamped with the current time.
    ///
    /// Returns the set as stored.
    pub fn replace(&self, tokens: TokenSet) -> Arc<TokenSet> {
        let tokens = Arc::new(tokens.restamped());
        *self.current.write() = Some(Arc::clone(&tokens));
        tokens
    }

    /// The held token set, if one was ever acquired.
    pub fn current(&self) -> Option<Arc<TokenSet>> {
        self.current.read().clone()
    }

    /// Age of the held token set.
    pub fn age(&self) -> Option<Duration> {
        self.current.read().as_ref().map(|tokens| tokens.age())
    }
}
