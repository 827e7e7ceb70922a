/*
 * Responsibility
 * - GET /whoami: policy に渡った subject / claims を確認するための endpoint
 */
use axum::Json;

use crate::api::v1::{dto::whoami::WhoAmIResponse, extractors::IdentityExtractor};

pub async fn whoami(IdentityExtractor(identity): IdentityExtractor) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse::from(identity))
}
