use chrono::{DateTime, Utc};
use nse_client::{FetchError, OpenInterestTotals, parse_open_interest};

/// One consistent pair of CE/PE open-interest totals and when they were seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub ce_total_open_interest: u64,
    pub pe_total_open_interest: u64,
    pub observed_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(totals: OpenInterestTotals, observed_at: DateTime<Utc>) -> Self {
        Self {
            ce_total_open_interest: totals.ce,
            pe_total_open_interest: totals.pe,
            observed_at,
        }
    }

    /// Decode a raw option-chain body, stamping it with the current time.
    pub fn from_payload(payload: &[u8]) -> Result<Self, FetchError> {
        let totals = parse_open_interest(payload)?;
        Ok(Self::new(totals, Utc::now()))
    }

    /// Seconds since the snapshot was observed.
    pub fn age_secs(&self) -> i64 {
        (Utc::now() - self.observed_at).num_seconds().max(0)
    }
}
