use std::sync::Arc;

use oi_snapshot::api::{ApiServer, AppState};
use oi_snapshot::cache::SnapshotCache;
use oi_snapshot::config::AppConfig;
use oi_snapshot::credentials::CredentialStore;
use oi_snapshot::credentials::platforms::NseCredentialAcquirer;
use oi_snapshot::fetcher::NseOptionChainFetcher;
use oi_snapshot::logging;
use oi_snapshot::poller::PollingScheduler;
use oi_snapshot::utils::http_client::build_nse_session;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let _log_guard = logging::init_logging(config.log_dir.as_deref())?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        api_url = %config.http.endpoints.api_url,
        "oi-snapshot starting"
    );

    let session = build_nse_session(&config.http)?;
    let cache = SnapshotCache::new();
    let scheduler = Arc::new(PollingScheduler::new(
        Arc::new(CredentialStore::new()),
        cache.clone(),
        Arc::new(NseCredentialAcquirer::new(Arc::clone(&session))),
        Arc::new(NseOptionChainFetcher::new(session)),
        config.poller,
    ));

    let state = AppState::new(cache.reader(), scheduler.status());
    let server = ApiServer::new(config.api.clone(), state);
    let shutdown = server.cancel_token();

    if let Some(log_dir) = &config.log_dir {
        logging::start_retention_cleanup(log_dir.clone(), shutdown.clone());
    }

    let poller = Arc::clone(&scheduler).spawn(shutdown.clone());

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                signal_token.cancel();
            }
            Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
        }
    });

    let served = server.run().await;

    // Stop the poller whether the server exited cleanly or failed to bind.
    shutdown.cancel();
    if let Err(e) = poller.await {
        warn!(error = %e, "Poller task ended abnormally");
    }

    served?;
    info!("oi-snapshot stopped");
    Ok(())
}
