/*
 * Responsibility
 * - GET /hello (policy で許可された caller だけが到達する)
 */
use crate::api::v1::extractors::IdentityExtractor;

pub async fn hello(IdentityExtractor(identity): IdentityExtractor) -> String {
    format!("Hello {}", identity.subject)
}
