/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - authorizer: 起動時に 1 回だけ組み立てる。request 間で共有 (read-only)
 *   - identity_header: 上流で認証済みの principal を運ぶ header 名
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use axum::http::HeaderName;

use crate::services::policy::Authorizer;

#[derive(Clone, Debug)]
pub struct AppState {
    pub authorizer: Arc<Authorizer>,
    pub identity_header: HeaderName,
}

impl AppState {
    pub fn new(authorizer: Arc<Authorizer>, identity_header: HeaderName) -> Self {
        Self {
            authorizer,
            identity_header,
        }
    }
}
