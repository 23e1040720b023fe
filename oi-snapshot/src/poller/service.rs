//! Polling scheduler.
//!
//! Drives the acquire → fetch → publish cycle on a fixed period. The
//! scheduler is the only writer of the credential store, the snapshot cache
//! and the poll status.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use super::state::{CycleFailure, CycleOutcome, PollState, PollStatusHandle};
use crate::cache::SnapshotCache;
use crate::credentials::{CredentialAcquirer, CredentialStore, TokenSet};
use crate::fetcher::{RemoteFetcher, Snapshot};

/// Fetch attempts per cycle: the first try plus one retry after renewing
/// credentials on a 401/403.
pub const MAX_FETCH_ATTEMPTS: u32 = 2;

/// Every n-th consecutive failure is logged at error level.
pub const FAILURE_ESCALATION_EVERY: u32 = 5;

/// Default time between cycle starts.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Default maximum credential age before a proactive renewal.
pub const DEFAULT_CREDENTIAL_MAX_AGE: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    pub poll_interval: Duration,
    pub credential_max_age: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            credential_max_age: DEFAULT_CREDENTIAL_MAX_AGE,
        }
    }
}

pub struct PollingScheduler {
    store: Arc<CredentialStore>,
    cache: SnapshotCache,
    acquirer: Arc<dyn CredentialAcquirer>,
    fetcher: Arc<dyn RemoteFetcher>,
    config: PollerConfig,
    status: PollStatusHandle,
}

impl PollingScheduler {
    pub fn new(
        store: Arc<CredentialStore>,
        cache: SnapshotCache,
        acquirer: Arc<dyn CredentialAcquirer>,
        fetcher: Arc<dyn RemoteFetcher>,
        config: PollerConfig,
    ) -> Self {
        Self {
            store,
            cache,
            acquirer,
            fetcher,
            config,
            status: PollStatusHandle::new(),
        }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Shared read handle on the poll status.
    pub fn status(&self) -> PollStatusHandle {
        self.status.clone()
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    /// Run one cycle: ensure credentials, fetch, publish.
    ///
    /// Never panics and never returns early with an error; any failure is
    /// reported through [`CycleOutcome::Failed`] and leaves the cache as it
    /// was.
    #[instrument(skip(self))]
    pub async fn run_cycle(&self) -> CycleOutcome {
        let outcome = match self.try_cycle().await {
            Ok(snapshot) => CycleOutcome::Updated(snapshot),
            Err(failure) => CycleOutcome::Failed(failure),
        };
        self.record_outcome(&outcome);
        outcome
    }

    async fn try_cycle(&self) -> Result<Arc<Snapshot>, CycleFailure> {
        let mut tokens = match self.store.current() {
            Some(tokens) if self.store.is_fresh(self.config.credential_max_age) => tokens,
            current => {
                if let Some(age) = current.as_ref().map(|t| t.age()) {
                    debug!(age_secs = age.as_secs(), "Credentials expired, renewing");
                }
                self.refresh_credentials().await?
            }
        };

        let mut attempt = 0;
        let payload = loop {
            attempt += 1;
            self.status.set_state(PollState::Fetching);
            match self.fetcher.fetch_raw(&tokens).await {
                Ok(payload) => break payload,
                Err(e) if e.is_unauthorized() && attempt < MAX_FETCH_ATTEMPTS => {
                    info!(attempt, error = %e, "Session rejected, renewing credentials");
                    // A failed renewal still gets its retry, with the cookies held.
                    match self.refresh_credentials().await {
                        Ok(renewed) => tokens = renewed,
                        Err(failure) => warn!(
                            kind = %failure.kind(),
                            "Renewal failed, retrying with held credentials: {failure}"
                        ),
                    }
                }
                Err(e) => return Err(CycleFailure::Fetch(e)),
            }
        };

        let snapshot = self
            .fetcher
            .parse(&payload)
            .map_err(CycleFailure::Parse)?;

        self.status.set_state(PollState::UpdatingCache);
        Ok(self.cache.store(snapshot))
    }

    async fn refresh_credentials(&self) -> Result<Arc<TokenSet>, CycleFailure> {
        self.status.set_state(PollState::AcquiringCredentials);
        let tokens = self
            .acquirer
            .acquire()
            .await
            .map_err(CycleFailure::Acquisition)?;

        if tokens.is_empty() {
            warn!("Handshake completed without any cookies");
        }

        let tokens = self.store.replace(tokens);
        self.status.update(|s| s.record_acquisition(Utc::now()));
        debug!(cookies = tokens.len(), "Stored new credentials");
        Ok(tokens)
    }

    fn record_outcome(&self, outcome: &CycleOutcome) {
        let now = Utc::now();
        match outcome {
            CycleOutcome::Updated(snapshot) => {
                self.status.update(|s| s.record_success(now));
                info!(
                    ce = snapshot.ce_total_open_interest,
                    pe = snapshot.pe_total_open_interest,
                    "Snapshot updated"
                );
            }
            CycleOutcome::Failed(failure) => {
                let failures = self.status.update(|s| s.record_failure(failure, now));
                if failures % FAILURE_ESCALATION_EVERY == 0 {
                    error!(
                        consecutive_failures = failures,
                        kind = %failure.kind(),
                        "Poll cycle failed: {failure}"
                    );
                } else {
                    warn!(
                        consecutive_failures = failures,
                        kind = %failure.kind(),
                        "Poll cycle failed: {failure}"
                    );
                }
            }
        }
        self.status.set_state(PollState::Sleeping);
    }

    /// Run cycles until `cancel` fires.
    ///
    /// The first cycle starts immediately. Cycles never overlap; one that
    /// overruns the period is followed straight away by the next.
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            interval_secs = self.config.poll_interval.as_secs(),
            max_age_secs = self.config.credential_max_age.as_secs(),
            "Poller starting"
        );

        let mut ticker = tokio::time::interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                biased;
                // Dropping the cycle future abandons any in-flight request.
                _ = cancel.cancelled() => break,
                _ = self.run_cycle() => {}
            }
        }

        self.status.set_state(PollState::Idle);
        info!("Poller stopped");
    }

    /// Spawn [`run`](Self::run) onto the runtime.
    pub fn spawn(self: Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(cancel).await })
    }
}

impl std::fmt::Debug for PollingScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingScheduler")
            .field("config", &self.config)
            .field("state", &self.status.state())
            .finish_non_exhaustive()
    }
}
