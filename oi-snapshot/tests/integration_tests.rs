//! End-to-end tests: real acquirer and fetcher against a local fake of the
//! NSE site, with the API router on top.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::response::{AppendHeaders, IntoResponse};
use axum::routing::get;
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use oi_snapshot::api::{ApiServer, ApiServerConfig, AppState};
use oi_snapshot::cache::SnapshotCache;
use oi_snapshot::config::HttpConfig;
use oi_snapshot::credentials::CredentialStore;
use oi_snapshot::credentials::platforms::NseCredentialAcquirer;
use oi_snapshot::fetcher::NseOptionChainFetcher;
use oi_snapshot::poller::{CycleFailure, CycleOutcome, PollerConfig, PollingScheduler};
use oi_snapshot::utils::http_client::build_nse_session;

/// Shared state of the fake site.
#[derive(Default)]
struct FakeNse {
    landing_hits: AtomicUsize,
    api_hits: AtomicUsize,
    /// Challenge cookie value the API currently accepts.
    valid_token: Mutex<String>,
    ce: AtomicU64,
    pe: AtomicU64,
}

impl FakeNse {
    fn set_totals(&self, ce: u64, pe: u64) {
        self.ce.store(ce, Ordering::SeqCst);
        self.pe.store(pe, Ordering::SeqCst);
    }

    /// Make every previously issued cookie stale.
    fn revoke_sessions(&self) {
        *self.valid_token.lock() = "revoked".to_string();
    }
}

fn cookie_header(headers: &HeaderMap) -> String {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn root() -> impl IntoResponse {
    (
        AppendHeaders([(header::SET_COOKIE, "nsit=base; Path=/; HttpOnly")]),
        "<html>home</html>",
    )
}

async fn landing(State(nse): State<Arc<FakeNse>>, headers: HeaderMap) -> impl IntoResponse {
    if !cookie_header(&headers).contains("nsit=base") {
        return (StatusCode::FORBIDDEN, AppendHeaders(Vec::new()), "denied");
    }
    let generation = nse.landing_hits.fetch_add(1, Ordering::SeqCst) + 1;
    let token = format!("gen-{generation}");
    *nse.valid_token.lock() = token.clone();
    (
        StatusCode::OK,
        AppendHeaders(vec![(header::SET_COOKIE, format!("bm_sv={token}; Path=/"))]),
        "<html>option chain</html>",
    )
}

async fn option_chain(State(nse): State<Arc<FakeNse>>, headers: HeaderMap) -> impl IntoResponse {
    nse.api_hits.fetch_add(1, Ordering::SeqCst);
    let expected = format!("bm_sv={}", nse.valid_token.lock());
    if !cookie_header(&headers).contains(&expected) {
        return (StatusCode::FORBIDDEN, "{}".to_string());
    }
    let body = serde_json::json!({
        "records": { "expiryDates": ["26-Oct-2026"] },
        "filtered": {
            "data": [],
            "CE": { "totOI": nse.ce.load(Ordering::SeqCst), "totVol": 1 },
            "PE": { "totOI": nse.pe.load(Ordering::SeqCst), "totVol": 2 }
        }
    });
    (StatusCode::OK, body.to_string())
}

async fn spawn_fake_nse(nse: Arc<FakeNse>) -> SocketAddr {
    let router = Router::new()
        .route("/", get(root))
        .route("/option-chain", get(landing))
        .route("/api/option-chain-indices", get(option_chain))
        .with_state(nse);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

struct Harness {
    nse: Arc<FakeNse>,
    scheduler: Arc<PollingScheduler>,
    router: Router,
}

async fn harness() -> Harness {
    let nse = Arc::new(FakeNse::default());
    nse.set_totals(100, 200);
    let addr = spawn_fake_nse(Arc::clone(&nse)).await;

    let mut http = HttpConfig::default();
    http.endpoints.origin_url = format!("http://{addr}/");
    http.endpoints.landing_url = format!("http://{addr}/option-chain");
    http.endpoints.api_url = format!("http://{addr}/api/option-chain-indices?symbol=NIFTY");
    let session = build_nse_session(&http).unwrap();

    let cache = SnapshotCache::new();
    let scheduler = Arc::new(PollingScheduler::new(
        Arc::new(CredentialStore::new()),
        cache.clone(),
        Arc::new(NseCredentialAcquirer::new(Arc::clone(&session))),
        Arc::new(NseOptionChainFetcher::new(session)),
        PollerConfig::default(),
    ));

    let state = AppState::new(cache.reader(), scheduler.status());
    let router = ApiServer::new(ApiServerConfig::default(), state).build_router();

    Harness {
        nse,
        scheduler,
        router,
    }
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_serves_503_until_first_cycle_then_totals() {
    let h = harness().await;

    let (status, body) = get_json(&h.router, "/").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body["message"],
        "Data not yet available; try again in a few seconds."
    );

    assert!(h.scheduler.run_cycle().await.is_updated());

    let (status, body) = get_json(&h.router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({"CE": {"totalOI": 100}, "PE": {"totalOI": 200}})
    );
    assert_eq!(h.nse.landing_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_cookies_are_reused_between_cycles() {
    let h = harness().await;

    h.scheduler.run_cycle().await;
    h.nse.set_totals(150, 250);
    h.scheduler.run_cycle().await;

    assert_eq!(h.nse.landing_hits.load(Ordering::SeqCst), 1);
    assert_eq!(h.nse.api_hits.load(Ordering::SeqCst), 2);

    let (_, body) = get_json(&h.router, "/").await;
    assert_eq!(body["CE"]["totalOI"], 150);
    assert_eq!(body["PE"]["totalOI"], 250);
}

#[tokio::test]
async fn test_rejected_session_is_renewed_within_the_cycle() {
    let h = harness().await;
    h.scheduler.run_cycle().await;

    h.nse.revoke_sessions();
    h.nse.set_totals(300, 400);
    let outcome = h.scheduler.run_cycle().await;

    assert!(outcome.is_updated());
    assert_eq!(h.nse.landing_hits.load(Ordering::SeqCst), 2);
    // First cycle, the rejected attempt, and the retry.
    assert_eq!(h.nse.api_hits.load(Ordering::SeqCst), 3);

    let (_, body) = get_json(&h.router, "/").await;
    assert_eq!(body["CE"]["totalOI"], 300);

    let (_, health) = get_json(&h.router, "/health").await;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["poller"]["credential_acquisitions"], 2);
}

#[tokio::test]
async fn test_unreachable_remote_keeps_serving_last_snapshot() {
    let h = harness().await;
    h.scheduler.run_cycle().await;

    // Second scheduler writing to the same cache, pointed at a closed port.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = listener.local_addr().unwrap();
    drop(listener);

    let mut http = HttpConfig::default();
    http.endpoints.origin_url = format!("http://{dead}/");
    http.endpoints.landing_url = format!("http://{dead}/option-chain");
    http.endpoints.api_url = format!("http://{dead}/api/option-chain-indices?symbol=NIFTY");
    let session = build_nse_session(&http).unwrap();

    let cache = h.scheduler.cache().clone();
    let failing = PollingScheduler::new(
        Arc::new(CredentialStore::new()),
        cache,
        Arc::new(NseCredentialAcquirer::new(Arc::clone(&session))),
        Arc::new(NseOptionChainFetcher::new(session)),
        PollerConfig::default(),
    );

    let outcome = failing.run_cycle().await;
    assert!(matches!(
        outcome,
        CycleOutcome::Failed(CycleFailure::Acquisition(_))
    ));

    let (status, body) = get_json(&h.router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["CE"]["totalOI"], 100);
}

#[tokio::test]
async fn test_spawned_poller_publishes_immediately_and_stops() {
    let h = harness().await;
    let cancel = CancellationToken::new();
    let handle = Arc::clone(&h.scheduler).spawn(cancel.clone());

    let published = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if h.scheduler.cache().get_latest().is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(published.is_ok(), "first cycle did not run at startup");

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("poller did not stop")
        .unwrap();
    assert_eq!(h.nse.api_hits.load(Ordering::SeqCst), 1);
}
