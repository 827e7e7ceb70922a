/*
 * Responsibility
 * - 認証済み caller の型 (Identity / Claim)
 * - 認証そのものは上流 (proxy / 認証 middleware) の責務。ここは「受け取る側の契約」だけ
 *
 * Notes
 * - identity middleware が request extensions に insert し、authz middleware と handler が読む
 */
use std::collections::BTreeMap;

use serde::Serialize;

/// The caller, as established by whatever authenticated the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub authentication_type: Option<String>,
    pub is_authenticated: bool,
    pub claims: Vec<Claim>,
}

impl Identity {
    /// An authenticated identity with a single `name` claim for `subject`.
    pub fn authenticated(
        subject: impl Into<String>,
        authentication_type: impl Into<String>,
        issuer: impl Into<String>,
    ) -> Self {
        let subject = subject.into();
        let authentication_type = authentication_type.into();
        let meta = ClaimSubject {
            name: Some(subject.clone()),
            authentication_type: Some(authentication_type.clone()),
            is_authenticated: true,
        };
        let claim = Claim::new(issuer, NAME_CLAIM_TYPE, subject.clone()).with_subject(meta);

        Self {
            subject,
            authentication_type: Some(authentication_type),
            is_authenticated: true,
            claims: vec![claim],
        }
    }

    /// An identity object that exists but did not pass authentication.
    pub fn anonymous() -> Self {
        Self {
            subject: String::new(),
            authentication_type: None,
            is_authenticated: false,
            claims: Vec::new(),
        }
    }

    pub fn with_claim(mut self, claim: Claim) -> Self {
        self.claims.push(claim);
        self
    }
}

pub const NAME_CLAIM_TYPE: &str = "name";
pub const STRING_VALUE_TYPE: &str = "string";

/// One claim about the caller, serialized verbatim into `input.subject.claims`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claim {
    pub issuer: String,
    pub original_issuer: String,
    #[serde(rename = "type")]
    pub claim_type: String,
    pub value: String,
    pub value_type: String,
    pub properties: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<ClaimSubject>,
}

/// Metadata about the identity a claim belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimSubject {
    pub name: Option<String>,
    pub authentication_type: Option<String>,
    pub is_authenticated: bool,
}

impl Claim {
    pub fn new(
        issuer: impl Into<String>,
        claim_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let issuer = issuer.into();
        Self {
            original_issuer: issuer.clone(),
            issuer,
            claim_type: claim_type.into(),
            value: value.into(),
            value_type: STRING_VALUE_TYPE.to_string(),
            properties: BTreeMap::new(),
            subject: None,
        }
    }

    pub fn with_subject(mut self, subject: ClaimSubject) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}
