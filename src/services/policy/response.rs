//! Decision document returned by the policy engine.
//!
//! Shape (per the engine's contract):
//! ```json
//! {"decision": true, "context": {"id": "0", "reason_user": {"en": "..."}}}
//! ```
//!
//! Notes:
//! - Every member of `context` is optional. An absent map and an empty map are
//!   different things and are kept apart (`None` vs `Some(empty)`).
//! - Maps are `BTreeMap` so iteration follows code-point order of the keys.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub decision: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<DecisionContext>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    // Operator-facing. Never used to pick the caller-visible reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_admin: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_user: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<BTreeMap<String, serde_json::Value>>,
}

impl DecisionResponse {
    pub fn allow() -> Self {
        Self {
            decision: true,
            context: None,
        }
    }

    pub fn deny() -> Self {
        Self {
            decision: false,
            context: None,
        }
    }

    pub fn with_context(mut self, context: DecisionContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Picks the caller-visible reason for this decision.
    ///
    /// Returns `None` when the engine sent no `context` (which it is allowed to omit).
    pub fn reason_for(&self, preferred_key: &str) -> Option<&str> {
        self.context.as_ref()?.reason_for(preferred_key)
    }
}

impl DecisionContext {
    /// Selects a reason from `reason_user`.
    ///
    /// - `preferred_key` wins when present.
    /// - Otherwise the entry with the smallest key (code-point order) is used.
    /// - `reason_admin` is not considered.
    pub fn reason_for(&self, preferred_key: &str) -> Option<&str> {
        let reasons = self.reason_user.as_ref()?;

        if let Some(reason) = reasons.get(preferred_key) {
            return Some(reason.as_str());
        }

        // BTreeMap<String, _> orders by bytes, which for UTF-8 is code-point order.
        reasons.values().next().map(String::as_str)
    }
}
