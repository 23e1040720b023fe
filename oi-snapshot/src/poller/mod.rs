//! Background polling of the option-chain API.

mod service;
mod state;

pub use service::{
    DEFAULT_CREDENTIAL_MAX_AGE, DEFAULT_POLL_INTERVAL, FAILURE_ESCALATION_EVERY,
    MAX_FETCH_ATTEMPTS, PollerConfig, PollingScheduler,
};
pub use state::{CycleFailure, CycleOutcome, FailureInfo, PollState, PollStatus, PollStatusHandle};
