//! Shared utilities for integration testing.

use axum::{
    extract::Query,
    http::{header, StatusCode},
    Router,
};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use route_service::{app, config::Config, AppState};
use route_service::services::RouteClient;

type Responder = dyn Fn(usize, &[(String, String)]) -> (StatusCode, String) + Send + Sync;

struct MockState {
    hits: AtomicUsize,
    queries: Mutex<Vec<Vec<(String, String)>>>,
    delay: Duration,
    respond: Box<Responder>,
}

/// A mock HTTP backend answering every path with a programmable response.
#[derive(Clone)]
pub struct MockBackend {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// Query pairs of every request received, in arrival order
    pub fn queries(&self) -> Vec<Vec<(String, String)>> {
        self.state.queries.lock().unwrap().clone()
    }
}

/// Start a mock backend on an ephemeral port. `respond` gets the zero-based
/// request number and the decoded query pairs.
#[allow(dead_code)]
pub async fn start_programmable_backend<F>(respond: F) -> MockBackend
where
    F: Fn(usize, &[(String, String)]) -> (StatusCode, String) + Send + Sync + 'static,
{
    start_slow_backend(Duration::ZERO, respond).await
}

/// Like [`start_programmable_backend`], but every response waits `delay` first.
pub async fn start_slow_backend<F>(delay: Duration, respond: F) -> MockBackend
where
    F: Fn(usize, &[(String, String)]) -> (StatusCode, String) + Send + Sync + 'static,
{
    let state = Arc::new(MockState {
        hits: AtomicUsize::new(0),
        queries: Mutex::new(Vec::new()),
        delay,
        respond: Box::new(respond),
    });

    let handler_state = state.clone();
    let handler = move |Query(params): Query<Vec<(String, String)>>| {
        let state = handler_state.clone();
        async move {
            let count = state.hits.fetch_add(1, Ordering::SeqCst);
            state.queries.lock().unwrap().push(params.clone());
            if !state.delay.is_zero() {
                tokio::time::sleep(state.delay).await;
            }
            let (status, body) = (state.respond)(count, &params);
            (status, [(header::CONTENT_TYPE, "application/json")], body)
        }
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, Router::new().fallback(handler))
            .await
            .unwrap();
    });

    MockBackend { addr, state }
}

/// Start a mock routing provider that always answers with `status` and `body`.
#[allow(dead_code)]
pub async fn start_mock_provider(status: StatusCode, body: serde_json::Value) -> MockBackend {
    let body = body.to_string();
    start_programmable_backend(move |_, _| (status, body.clone())).await
}

/// Provider success body with a single three-point path
#[allow(dead_code)]
pub fn provider_body(distance: f64, time_ms: f64) -> serde_json::Value {
    serde_json::json!({
        "paths": [{
            "distance": distance,
            "time": time_ms,
            "points": {
                "type": "LineString",
                "coordinates": [[13.4049, 52.5201], [13.2846, 52.4563], [13.0646, 52.3905]]
            }
        }],
        "info": { "took": 4 }
    })
}

#[allow(dead_code)]
pub fn gateway_config(provider_url: String, api_key: Option<&str>) -> Config {
    Config {
        routing_api_key: api_key.map(str::to_string),
        routing_base_url: provider_url,
        routing_timeout_secs: 5,
        ..Config::default()
    }
}

/// HTTP client that ignores proxy settings from the environment
pub fn local_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

/// Gateway state talking to local mocks
pub fn gateway_state(config: Config) -> AppState {
    AppState::with_client(config, local_http_client())
}

/// Serve the real gateway router on an ephemeral port
#[allow(dead_code)]
pub async fn start_gateway(config: Config) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app(gateway_state(config));
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Log lines written by the test's subscriber
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

#[allow(dead_code)]
impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Capture `WARN` and above on the current thread until the guard drops.
/// `#[tokio::test]` runs on one thread, so this covers the whole test.
#[allow(dead_code)]
pub fn capture_warnings() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    (logs, tracing::subscriber::set_default(subscriber))
}

/// Route client pointed at `url`, bypassing environment proxies
#[allow(dead_code)]
pub fn route_client(url: String) -> RouteClient {
    RouteClient::with_client(local_http_client(), url)
}
