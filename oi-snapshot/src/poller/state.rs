//! Poller state and status reporting.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use nse_client::{AcquisitionError, FetchError};
use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;

use crate::fetcher::Snapshot;

/// Where the poller currently is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollState {
    Idle,
    AcquiringCredentials,
    Fetching,
    UpdatingCache,
    Sleeping,
}

impl PollState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AcquiringCredentials => "acquiring_credentials",
            Self::Fetching => "fetching",
            Self::UpdatingCache => "updating_cache",
            Self::Sleeping => "sleeping",
        }
    }
}

impl std::fmt::Display for PollState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a cycle ended without updating the cache.
#[derive(Debug, Error)]
pub enum CycleFailure {
    #[error("credential acquisition failed: {0}")]
    Acquisition(#[source] AcquisitionError),
    #[error("fetch failed: {0}")]
    Fetch(#[source] FetchError),
    #[error("payload rejected: {0}")]
    Parse(#[source] FetchError),
}

impl CycleFailure {
    /// `stage:reason`, e.g. `fetch:unauthorized`.
    pub fn kind(&self) -> String {
        match self {
            Self::Acquisition(e) => format!("acquisition:{}", e.kind()),
            Self::Fetch(e) => format!("fetch:{}", e.kind()),
            Self::Parse(e) => format!("parse:{}", e.kind()),
        }
    }
}

/// Result of one poll cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    Updated(Arc<Snapshot>),
    Failed(CycleFailure),
}

impl CycleOutcome {
    #[inline]
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}

/// Information about the most recent failed cycle.
#[derive(Debug, Clone, Serialize)]
pub struct FailureInfo {
    pub at: DateTime<Utc>,
    pub kind: String,
    pub message: String,
}

/// Point-in-time view of the poller, served by the health route.
#[derive(Debug, Clone, Serialize)]
pub struct PollStatus {
    pub state: PollState,
    /// Completed cycles, successful or not.
    pub cycles: u64,
    pub consecutive_failures: u32,
    pub credential_acquisitions: u64,
    pub last_credential_acquired_at: Option<DateTime<Utc>>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_failure: Option<FailureInfo>,
}

impl Default for PollStatus {
    fn default() -> Self {
        Self {
            state: PollState::Idle,
            cycles: 0,
            consecutive_failures: 0,
            credential_acquisitions: 0,
            last_credential_acquired_at: None,
            last_success_at: None,
            last_failure: None,
        }
    }
}

impl PollStatus {
    pub(crate) fn record_success(&mut self, at: DateTime<Utc>) {
        self.cycles += 1;
        self.consecutive_failures = 0;
        self.last_success_at = Some(at);
    }

    /// Record a failed cycle and return the updated consecutive count.
    pub(crate) fn record_failure(&mut self, failure: &CycleFailure, at: DateTime<Utc>) -> u32 {
        self.cycles += 1;
        self.consecutive_failures += 1;
        self.last_failure = Some(FailureInfo {
            at,
            kind: failure.kind(),
            message: failure.to_string(),
        });
        self.consecutive_failures
    }

    pub(crate) fn record_acquisition(&mut self, at: DateTime<Utc>) {
        self.credential_acquisitions += 1;
        self.last_credential_acquired_at = Some(at);
    }
}

/// Shared handle to the poller status. Only the poller writes to it.
#[derive(Debug, Clone, Default)]
pub struct PollStatusHandle {
    inner: Arc<RwLock<PollStatus>>,
}

impl PollStatusHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current status.
    pub fn snapshot(&self) -> PollStatus {
        self.inner.read().clone()
    }

    pub fn state(&self) -> PollState {
        self.inner.read().state
    }

    pub(crate) fn set_state(&self, state: PollState) {
        self.inner.write().state = state;
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut PollStatus) -> R) -> R {
        f(&mut self.inner.write())
    }
}
