//! API request and response bodies.

use serde::Serialize;

use crate::fetcher::Snapshot;
use crate::poller::PollStatus;

/// Total open interest for one option type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OpenInterestBody {
    #[serde(rename = "totalOI")]
    pub total_oi: u64,
}

/// Body of `GET /`: `{"CE":{"totalOI":n},"PE":{"totalOI":n}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TotalsResponse {
    #[serde(rename = "CE")]
    pub ce: OpenInterestBody,
    #[serde(rename = "PE")]
    pub pe: OpenInterestBody,
}

impl From<&Snapshot> for TotalsResponse {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            ce: OpenInterestBody {
                total_oi: snapshot.ce_total_open_interest,
            },
            pe: OpenInterestBody {
                total_oi: snapshot.pe_total_open_interest,
            },
        }
    }
}

/// Overall service health as reported by `GET /health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// No snapshot has been published yet.
    Starting,
    /// The last cycle succeeded.
    Healthy,
    /// A snapshot is being served but recent cycles failed.
    Degraded,
}

impl HealthStatus {
    pub fn evaluate(has_snapshot: bool, poller: &PollStatus) -> Self {
        match (has_snapshot, poller.consecutive_failures) {
            (false, _) => Self::Starting,
            (true, 0) => Self::Healthy,
            (true, _) => Self::Degraded,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_secs: u64,
    pub poller: PollStatus,
    /// Seconds since the served snapshot was observed.
    pub snapshot_age_secs: Option<i64>,
}
