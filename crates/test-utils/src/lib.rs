//! vatform test utilities.
//!
//! Helpers for integration testing: a mock validation endpoint served over
//! real HTTP, registry record fixtures, and assertion utilities.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use parking_lot::Mutex;
use serde_json::Value as JsonValue;
use tokio::sync::oneshot;

/// Route the mock endpoint answers on.
pub const VALIDATE_ROUTE: &str = "/wp-json/vat/validate";

/// Build a registry record as the endpoint would return it before encoding.
pub fn registry_record(valid: bool, name: Option<&str>) -> JsonValue {
    let mut record = serde_json::json!({
        "countryCode": "FI",
        "vatNumber": "23319727",
        "requestDate": "2024-11-04+01:00",
        "valid": valid,
    });
    if let (Some(name), Some(obj)) = (name, record.as_object_mut()) {
        obj.insert("name".to_string(), JsonValue::String(name.to_string()));
        obj.insert(
            "address".to_string(),
            JsonValue::String("Testikatu 1\n00100 HELSINKI".to_string()),
        );
    }
    record
}

/// Encode a value the way the endpoint does: JSON text wrapped in a JSON string.
pub fn double_encode(value: &JsonValue) -> String {
    JsonValue::String(value.to_string()).to_string()
}

/// Canned answer served by [`MockEndpoint`].
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl MockResponse {
    /// 200 with `value` double-encoded.
    pub fn double_encoded(value: &JsonValue) -> Self {
        Self::raw(double_encode(value))
    }

    /// 200 with `body` sent as-is.
    pub fn raw(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    /// Set the status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Hold the response back for `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A request the mock endpoint received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub content_type: Option<String>,
    /// Parsed JSON body, or `Null` if the body was not JSON.
    pub body: JsonValue,
}

struct MockState {
    response: MockResponse,
    hits: AtomicUsize,
    received: Mutex<Vec<RecordedRequest>>,
}

/// Validation endpoint stand-in bound to an ephemeral loopback port.
///
/// Shuts down when dropped.
pub struct MockEndpoint {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockEndpoint {
    /// Start serving `response` for every POST to [`VALIDATE_ROUTE`].
    pub async fn start(response: MockResponse) -> std::io::Result<Self> {
        let state = Arc::new(MockState {
            response,
            hits: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route(VALIDATE_ROUTE, post(handle_validate))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (tx, rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            // A dead server shows up as a failed request in the test using it.
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    rx.await.ok();
                })
                .await
                .ok();
        });

        Ok(Self {
            addr,
            state,
            shutdown: Some(tx),
        })
    }

    /// Base URL to hand to the client, without trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of requests received so far.
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.received.lock().clone()
    }
}

impl Drop for MockEndpoint {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
    }
}

async fn handle_validate(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.received.lock().push(RecordedRequest {
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(JsonValue::Null),
    });

    let response = &state.response;
    if !response.delay.is_zero() {
        tokio::time::sleep(response.delay).await;
    }

    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        response.body.clone(),
    )
        .into_response()
}

/// Base URL of a loopback port nothing is listening on.
pub async fn unreachable_base_url() -> std::io::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

/// Assertion helpers for JSON payloads.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON object has exactly the given keys.
    pub fn exact_keys(value: &Value, keys: &[&str]) {
        let mut actual: Vec<&str> = value
            .as_object()
            .map(|obj| obj.keys().map(String::as_str).collect())
            .unwrap_or_default();
        actual.sort_unstable();
        let mut expected = keys.to_vec();
        expected.sort_unstable();
        assert_eq!(actual, expected, "unexpected keys in {value}");
    }
}
