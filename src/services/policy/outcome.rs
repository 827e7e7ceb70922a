//! Result of authorizing one request.
use serde::Serialize;

pub const ACCESS_DENIED_TITLE: &str = "Access denied";
pub const DEFAULT_DENY_REASON: &str = "access denied by policy";
pub const DEFAULT_DENY_STATUS: u16 = 403;

/// Exactly one of these per request. There is no third state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Forward to the next handler.
    Allowed,
    /// Stop here and answer with this body.
    Denied(AccessDenied),
}

impl Outcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Outcome::Allowed)
    }
}

/// Body of an access-denied response.
///
/// `reason` is left out of the JSON entirely when there is none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessDenied {
    pub instance: String,
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AccessDenied {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            title: ACCESS_DENIED_TITLE.to_string(),
            status: DEFAULT_DENY_STATUS,
            reason: None,
        }
    }

    /// The fixed denial used for unauthenticated callers and engine failures.
    pub fn by_policy(instance: impl Into<String>) -> Self {
        Self::new(instance).with_reason(DEFAULT_DENY_REASON)
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }
}
