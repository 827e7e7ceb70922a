//! Per-request authorization flow.
//!
//! ```text
//! Start ─┬─ no identity / not authenticated ──────────────▶ Denied (fixed reason)
//!        └─ build input ─▶ evaluate ─┬─ error / no decision ▶ Denied (fixed reason)
//!                                    ├─ decision = false ───▶ Denied (resolved reason)
//!                                    └─ decision = true ────▶ Allowed
//! ```
//!
//! The authorizer is built once and shared by every request. It holds
//! configuration only, so concurrent use needs no locking.
use std::fmt;
use std::sync::Arc;

use crate::services::policy::client::{EvaluationResult, PolicyClient};
use crate::services::policy::input::{ContextDataProvider, InputTypes, PolicyInput, RequestContext};
use crate::services::policy::opa::{ClientBuildError, OpaClient};
use crate::services::policy::outcome::{AccessDenied, DEFAULT_DENY_REASON, Outcome};

pub const DEFAULT_REASON_KEY: &str = "en";

pub struct Authorizer {
    client: Arc<dyn PolicyClient>,
    // None => the engine's default decision.
    rule_path: Option<String>,
    reason_key: String,
    context_data: Option<Arc<dyn ContextDataProvider>>,
    input_types: InputTypes,
}

impl fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authorizer")
            .field("backend", &self.client.backend_name())
            .field("rule_path", &self.rule_path)
            .field("reason_key", &self.reason_key)
            .field("context_data", &self.context_data.is_some())
            .field("input_types", &self.input_types)
            .finish()
    }
}

#[derive(Default)]
pub struct AuthorizerBuilder {
    client: Option<Arc<dyn PolicyClient>>,
    rule_path: Option<String>,
    reason_key: Option<String>,
    context_data: Option<Arc<dyn ContextDataProvider>>,
    input_types: Option<InputTypes>,
}

impl AuthorizerBuilder {
    pub fn client(mut self, client: Arc<dyn PolicyClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn rule_path(mut self, path: impl Into<String>) -> Self {
        self.rule_path = Some(path.into());
        self
    }

    pub fn reason_key(mut self, key: impl Into<String>) -> Self {
        self.reason_key = Some(key.into());
        self
    }

    pub fn context_data(mut self, provider: Arc<dyn ContextDataProvider>) -> Self {
        self.context_data = Some(provider);
        self
    }

    pub fn input_types(mut self, types: InputTypes) -> Self {
        self.input_types = Some(types);
        self
    }

    /// Without an explicit client, an `OpaClient` for `$OPA_URL` is created.
    pub fn build(self) -> Result<Authorizer, ClientBuildError> {
        let client = match self.client {
            Some(client) => client,
            None => Arc::new(OpaClient::from_env()?),
        };

        let authorizer = Authorizer {
            client,
            rule_path: self.rule_path,
            reason_key: self
                .reason_key
                .unwrap_or_else(|| DEFAULT_REASON_KEY.to_string()),
            context_data: self.context_data,
            input_types: self.input_types.unwrap_or_default(),
        };
        tracing::info!(?authorizer, "authorizer initialized");

        Ok(authorizer)
    }
}

impl Authorizer {
    pub fn builder() -> AuthorizerBuilder {
        AuthorizerBuilder::default()
    }

    pub fn rule_path(&self) -> Option<&str> {
        self.rule_path.as_deref()
    }

    pub fn reason_key(&self) -> &str {
        &self.reason_key
    }

    pub fn build_input(&self, request: &RequestContext) -> PolicyInput {
        let extra = self
            .context_data
            .as_ref()
            .map(|provider| provider.context_data(request));
        self.input_types.build(request, extra)
    }

    /// Builds the input and asks the engine, choosing the configured rule path
    /// or the default decision.
    pub async fn evaluate(&self, request: &RequestContext) -> EvaluationResult {
        let input = self.build_input(request);
        if tracing::enabled!(tracing::Level::TRACE) {
            let json = serde_json::to_string(&input).unwrap_or_default();
            tracing::trace!(input = %json, "policy input for request");
        }

        let result = match self.rule_path.as_deref() {
            Some(path) => {
                tracing::debug!(path, "evaluating policy at rule path");
                self.client.evaluate_at_path(path, &input).await
            }
            None => {
                tracing::debug!("evaluating default policy decision");
                self.client.evaluate_default(&input).await
            }
        };
        tracing::trace!(?result, "policy evaluation result");

        result
    }

    /// Runs the full flow for one request. Never fails: every error is a denial.
    pub async fn authorize(&self, request: &RequestContext) -> Outcome {
        let instance = request.resource_path.as_str();

        if !request.is_authenticated() {
            tracing::trace!(path = instance, "unauthenticated request, denying access");
            return Outcome::Denied(AccessDenied::by_policy(instance));
        }

        let response = match self.evaluate(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    backend = self.client.backend_name(),
                    path = instance,
                    "policy evaluation failed, denying access"
                );
                return Outcome::Denied(AccessDenied::by_policy(instance));
            }
        };

        if !response.decision {
            let reason = response
                .reason_for(&self.reason_key)
                .unwrap_or(DEFAULT_DENY_REASON);
            tracing::debug!(path = instance, reason, "access denied by policy decision");
            return Outcome::Denied(AccessDenied::new(instance).with_reason(reason));
        }

        tracing::trace!(path = instance, "access verified");
        Outcome::Allowed
    }
}
