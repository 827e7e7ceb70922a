/*
 * Responsibility
 * - GET /health (疎通用)
 * - authz middleware を通さない (app.rs で v1 の外に mount)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
