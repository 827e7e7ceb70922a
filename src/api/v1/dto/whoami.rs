/*
 * Responsibility
 * - GET /whoami の response DTO
 */
use serde::Serialize;

use crate::services::identity::{Claim, Identity};

#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub subject: String,
    pub authentication_type: Option<String>,
    pub claims: Vec<ClaimView>,
}

#[derive(Debug, Serialize)]
pub struct ClaimView {
    pub issuer: String,
    #[serde(rename = "type")]
    pub claim_type: String,
    pub value: String,
}

impl From<&Claim> for ClaimView {
    fn from(c: &Claim) -> Self {
        Self {
            issuer: c.issuer.clone(),
            claim_type: c.claim_type.clone(),
            value: c.value.clone(),
        }
    }
}

impl From<Identity> for WhoAmIResponse {
    fn from(identity: Identity) -> Self {
        Self {
            claims: identity.claims.iter().map(ClaimView::from).collect(),
            subject: identity.subject,
            authentication_type: identity.authentication_type,
        }
    }
}
