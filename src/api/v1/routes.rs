/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - v1 配下はすべて policy engine の認可対象 (layer は app.rs で適用)
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::{hello::hello, whoami::whoami};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/hello", get(hello))
        .route("/whoami", get(whoami))
}
