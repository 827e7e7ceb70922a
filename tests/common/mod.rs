//! In-process stand-in for an OPA server.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{OriginalUri, State},
    http::StatusCode,
    routing::post,
};
use opa_authz::{app::build_router, services::policy::Authorizer, state::AppState};
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
pub struct Recorded {
    requests: Arc<Mutex<Vec<(String, Value)>>>,
}

impl Recorded {
    fn push(&self, path: &str, body: Value) {
        self.requests.lock().unwrap().push((path.to_string(), body));
    }

    pub fn all(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

pub struct MockEngine {
    pub base_url: String,
    pub recorded: Recorded,
}

pub async fn spawn_engine() -> MockEngine {
    let recorded = Recorded::default();

    let app = Router::new()
        .route("/", post(default_decision))
        .route("/v1/data/policy/decision_always_true", post(always_true))
        .route("/v1/data/policy/decision_always_false", post(always_false))
        .route("/v1/data/policy/deny_with_reason", post(deny_with_reason))
        .route("/v1/data/policy/echo", post(echo))
        .route("/v1/data/policy/undefined", post(undefined))
        .route("/v1/data/policy/broken", post(broken))
        .route("/v1/data/policy/garbage", post(garbage))
        .with_state(recorded.clone());

    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    MockEngine {
        base_url: format!("http://{addr}"),
        recorded,
    }
}

/// A base URL nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Serves the real application router, backed by `authorizer`.
pub async fn spawn_app(authorizer: Authorizer) -> String {
    let state = AppState::new(
        Arc::new(authorizer),
        axum::http::HeaderName::from_static("x-forwarded-user"),
    );
    let app = build_router(state, std::time::Duration::from_secs(5));

    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap()
    });

    format!("http://{addr}")
}

async fn default_decision(
    State(rec): State<Recorded>,
    OriginalUri(uri): OriginalUri,
    Json(input): Json<Value>,
) -> Json<Value> {
    let is_admin = input["subject"]["id"] == json!("admin");
    rec.push(uri.path(), input);

    Json(json!({
        "decision": is_admin,
        "context": {"reason_user": {"en": "only admin may pass"}}
    }))
}

async fn always_true(
    State(rec): State<Recorded>,
    OriginalUri(uri): OriginalUri,
    Json(body): Json<Value>,
) -> Json<Value> {
    rec.push(uri.path(), body);
    Json(json!({"result": {"decision": true}}))
}

async fn always_false(
    State(rec): State<Recorded>,
    OriginalUri(uri): OriginalUri,
    Json(body): Json<Value>,
) -> Json<Value> {
    rec.push(uri.path(), body);
    Json(json!({"result": {"decision": false}}))
}

async fn deny_with_reason(
    State(rec): State<Recorded>,
    OriginalUri(uri): OriginalUri,
    Json(body): Json<Value>,
) -> Json<Value> {
    rec.push(uri.path(), body);
    Json(json!({
        "result": {
            "decision": false,
            "context": {
                "reason_admin": {"en": "matched rule deny_weekends"},
                "reason_user": {"de": "Heute nicht", "en": "Not today"}
            }
        }
    }))
}

// Sends the input back as context.data.
async fn echo(
    State(rec): State<Recorded>,
    OriginalUri(uri): OriginalUri,
    Json(body): Json<Value>,
) -> Json<Value> {
    let input = body["input"].clone();
    rec.push(uri.path(), body);

    Json(json!({
        "result": {
            "decision": true,
            "context": {
                "id": "0",
                "reason_user": {
                    "en": "echo rule always allows",
                    "other": "other reason key"
                },
                "data": input
            }
        }
    }))
}

async fn undefined(
    State(rec): State<Recorded>,
    OriginalUri(uri): OriginalUri,
    Json(body): Json<Value>,
) -> Json<Value> {
    rec.push(uri.path(), body);
    Json(json!({}))
}

async fn broken(
    State(rec): State<Recorded>,
    OriginalUri(uri): OriginalUri,
    Json(body): Json<Value>,
) -> (StatusCode, &'static str) {
    rec.push(uri.path(), body);
    (StatusCode::INTERNAL_SERVER_ERROR, "policy compile error")
}

async fn garbage(
    State(rec): State<Recorded>,
    OriginalUri(uri): OriginalUri,
    Json(body): Json<Value>,
) -> &'static str {
    rec.push(uri.path(), body);
    "this is not json"
}
