//! Shared fixtures for unit tests: a scripted in-process API server plus
//! recording notifier/navigator doubles.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::notify::{Notification, NotifyLevel, Notifier};
use crate::router::{Navigator, Route};
use crate::types::UserProfile;

// =============================================================================
// StubApi
// =============================================================================

/// One scripted response.
#[derive(Clone, Debug)]
pub(crate) struct Reply {
    status: u16,
    body: Vec<u8>,
    content_type: &'static str,
    disposition: Option<String>,
    delay: Option<Duration>,
}

impl Reply {
    pub(crate) fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: serde_json::to_vec(&body).unwrap(),
            content_type: "application/json",
            disposition: None,
            delay: None,
        }
    }

    pub(crate) fn zip(bytes: &[u8], filename: Option<&str>) -> Self {
        Self {
            status: 200,
            body: bytes.to_vec(),
            content_type: "application/zip",
            disposition: filename.map(|name| format!("attachment; filename=\"{name}\"")),
            delay: None,
        }
    }

    pub(crate) fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A request the stub received.
#[derive(Clone, Debug)]
pub(crate) struct Hit {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct StubState {
    routes: Mutex<HashMap<(String, String), VecDeque<Reply>>>,
    hits: Mutex<Vec<Hit>>,
}

/// Scripted API mounted under `/api`. Routes are keyed by method and path
/// without the prefix; each route replays its replies in order and repeats
/// the last one once exhausted.
#[derive(Clone, Default)]
pub(crate) struct StubApi {
    state: Arc<StubState>,
}

impl StubApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(&self, method: &str, path: &str, status: u16, body: Value) -> &Self {
        self.script(method, path, vec![Reply::json(status, body)])
    }

    pub(crate) fn script(&self, method: &str, path: &str, replies: Vec<Reply>) -> &Self {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert((method.to_owned(), path.to_owned()), replies.into());
        self
    }

    /// Bind to an ephemeral port and return the API base URL.
    pub(crate) async fn start(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = axum::Router::new().fallback(handle).with_state(self.state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}/api")
    }

    pub(crate) fn hits(&self) -> Vec<Hit> {
        self.state.hits.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, method: &str, path: &str) -> usize {
        self.hits().iter().filter(|h| h.method == method && h.path == path).count()
    }

    pub(crate) fn last(&self, method: &str, path: &str) -> Option<Hit> {
        self.hits().into_iter().rev().find(|h| h.method == method && h.path == path)
    }
}

async fn handle(State(state): State<Arc<StubState>>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    let path = uri.path().strip_prefix("/api").unwrap_or(uri.path()).to_owned();
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(ToOwned::to_owned);
    state.hits.lock().unwrap().push(Hit {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(ToOwned::to_owned),
        authorization: header("authorization"),
        content_type: header("content-type"),
        body: serde_json::from_slice(&body).ok(),
    });

    let reply = {
        let mut routes = state.routes.lock().unwrap();
        match routes.get_mut(&(method.to_string(), path)) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        }
    };
    let Some(reply) = reply else {
        return (StatusCode::NOT_FOUND, axum::Json(serde_json::json!({ "error": "Not found" }))).into_response();
    };

    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }
    let mut response = (StatusCode::from_u16(reply.status).unwrap(), reply.body).into_response();
    response
        .headers_mut()
        .insert("content-type", HeaderValue::from_static(reply.content_type));
    if let Some(disposition) = reply.disposition {
        response
            .headers_mut()
            .insert("content-disposition", HeaderValue::from_str(&disposition).unwrap());
    }
    response
}

pub(crate) fn config(base_url: &str) -> ClientConfig {
    let mut config = ClientConfig::new(base_url);
    config.timeouts.request_secs = 2;
    config.timeouts.export_secs = 2;
    config
}

pub(crate) fn user(value: Value) -> UserProfile {
    serde_json::from_value(value).unwrap()
}

// =============================================================================
// Recording doubles
// =============================================================================

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub(crate) fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub(crate) fn of(&self, level: NotifyLevel) -> Vec<String> {
        self.all().into_iter().filter(|n| n.level == level).map(|n| n.message).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

#[derive(Default)]
pub(crate) struct RecordingNavigator {
    seen: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub(crate) fn all(&self) -> Vec<Route> {
        self.seen.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.seen.lock().unwrap().push(route);
    }
}
