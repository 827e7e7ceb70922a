//! Builds the `input` document sent to the policy engine.
//!
//! Layout:
//! ```json
//! {
//!   "subject":  {"type": "...", "id": "...", "claims": [...]},
//!   "resource": {"type": "endpoint", "id": "/path"},
//!   "action":   {"name": "GET", "protocol": "HTTP/1.1", "headers": {...}},
//!   "context":  {"type": "http", "host": "...", "ip": "...", "port": 0, "data": ...}
//! }
//! ```
//!
//! Building never fails: a request must not be rejected because its input could
//! not be assembled.
use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::services::identity::{Claim, Identity};

/// Snapshot of everything the policy may look at for one request.
///
/// Captured once by the interceptor and not mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    pub identity: Option<Identity>,
    pub resource_path: String,
    pub action_method: String,
    pub action_protocol: String,
    // One value per header name; multi-valued headers are joined by the capturing layer.
    pub headers: BTreeMap<String, String>,
    pub remote_address: String,
    pub remote_host: String,
    pub remote_port: u16,
}

impl RequestContext {
    /// Principal identifier, or `""` when there is none.
    pub fn subject(&self) -> &str {
        self.identity
            .as_ref()
            .map(|i| i.subject.as_str())
            .unwrap_or_default()
    }

    pub fn claims(&self) -> &[Claim] {
        self.identity
            .as_ref()
            .map(|i| i.claims.as_slice())
            .unwrap_or_default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.as_ref().is_some_and(|i| i.is_authenticated)
    }
}

/// Supplies extra data placed under `input.context.data`.
///
/// Called synchronously while the input is built, once per evaluated request.
pub trait ContextDataProvider: Send + Sync {
    fn context_data(&self, request: &RequestContext) -> Value;
}

impl<F> ContextDataProvider for F
where
    F: Fn(&RequestContext) -> Value + Send + Sync,
{
    fn context_data(&self, request: &RequestContext) -> Value {
        self(request)
    }
}

/// Returns the same value for every request.
#[derive(Debug, Clone)]
pub struct ConstantContextDataProvider {
    data: Value,
}

impl ConstantContextDataProvider {
    pub fn new(data: Value) -> Self {
        Self { data }
    }
}

impl ContextDataProvider for ConstantContextDataProvider {
    fn context_data(&self, _request: &RequestContext) -> Value {
        self.data.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyInput {
    pub subject: SubjectInput,
    pub resource: ResourceInput,
    pub action: ActionInput,
    pub context: ContextInput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectInput {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub claims: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceInput {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionInput {
    pub name: String,
    pub protocol: String,
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextInput {
    #[serde(rename = "type")]
    pub kind: String,
    pub host: String,
    pub ip: String,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

pub const DEFAULT_SUBJECT_TYPE: &str = "http_authentication";
pub const DEFAULT_RESOURCE_TYPE: &str = "endpoint";
pub const DEFAULT_CONTEXT_TYPE: &str = "http";

/// Deployment-wide constants stamped into every input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputTypes {
    pub subject: String,
    pub resource: String,
    pub context: String,
}

impl Default for InputTypes {
    fn default() -> Self {
        Self {
            subject: DEFAULT_SUBJECT_TYPE.to_string(),
            resource: DEFAULT_RESOURCE_TYPE.to_string(),
            context: DEFAULT_CONTEXT_TYPE.to_string(),
        }
    }
}

impl InputTypes {
    /// `context.data` is emitted only when `extra_data` is `Some`.
    pub fn build(&self, request: &RequestContext, extra_data: Option<Value>) -> PolicyInput {
        PolicyInput {
            subject: SubjectInput {
                kind: self.subject.clone(),
                id: request.subject().to_string(),
                claims: claims_to_value(request.claims()),
            },
            resource: ResourceInput {
                kind: self.resource.clone(),
                id: request.resource_path.clone(),
            },
            action: ActionInput {
                name: request.action_method.clone(),
                protocol: request.action_protocol.clone(),
                headers: request.headers.clone(),
            },
            context: ContextInput {
                kind: self.context.clone(),
                host: request.remote_host.clone(),
                ip: request.remote_address.clone(),
                port: request.remote_port,
                data: extra_data,
            },
        }
    }
}

// Serialization failure degrades to `{}` rather than failing the request.
fn claims_to_value(claims: &[Claim]) -> Value {
    serde_json::to_value(claims).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "failed to serialize claims, sending empty object");
        Value::Object(Default::default())
    })
}
