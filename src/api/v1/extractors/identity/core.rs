use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::identity::Identity;
use crate::state::AppState;

/// Handler で Identity を受け取るための extractor
/// identity middleware が request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（middleware 未設定のルート）
pub struct IdentityExtractor(pub Identity);

impl FromRequestParts<AppState> for IdentityExtractor
where
    AppState: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(IdentityExtractor)
            .ok_or(AppError::Unauthorized)
    }
}
