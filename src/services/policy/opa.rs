//! HTTP client for an Open Policy Agent compatible engine.
//!
//! Endpoints used:
//! - `POST {base}/v1/data/{path}` with `{"input": ...}`; the decision is the `result` member.
//! - `POST {base}/` with the input as the body; the reply is the decision itself
//!   (the engine's configured default decision).
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::services::policy::client::{EvaluationError, EvaluationResult, PolicyClient};
use crate::services::policy::input::PolicyInput;
use crate::services::policy::response::DecisionResponse;

pub const OPA_URL_ENV: &str = "OPA_URL";
pub const DEFAULT_OPA_URL: &str = "http://localhost:8181";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid policy engine url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Serialize)]
struct DataRequest<'a> {
    input: &'a PolicyInput,
}

#[derive(Debug, Deserialize)]
struct DataResponse {
    #[serde(default)]
    result: Option<Value>,
}

/// OPA REST client.
///
/// Cheap to clone: `reqwest::Client` keeps its pool behind an `Arc`.
#[derive(Clone, Debug)]
pub struct OpaClient {
    base_url: Url,
    http: reqwest::Client,
}

impl OpaClient {
    // Create a client for a base URL like `http://localhost:8181`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientBuildError> {
        let mut parsed = Url::parse(base_url).map_err(|source| ClientBuildError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;

        // `Url::join` replaces the last segment unless the base ends with '/'.
        if !parsed.path().ends_with('/') {
            let path = format!("{}/", parsed.path());
            parsed.set_path(&path);
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: parsed,
            http,
        })
    }

    /// Client for `$OPA_URL`, falling back to `http://localhost:8181`.
    pub fn from_env() -> Result<Self, ClientBuildError> {
        let url = std::env::var(OPA_URL_ENV).unwrap_or_else(|_| DEFAULT_OPA_URL.to_string());
        Self::new(&url, DEFAULT_TIMEOUT)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn data_url(&self, path: &str) -> Result<Url, EvaluationError> {
        let path = path.trim_start_matches('/');
        self.base_url
            .join(&format!("v1/data/{path}"))
            .map_err(|e| EvaluationError::Transport(format!("invalid rule path '{path}': {e}")))
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<Value, EvaluationError> {
        tracing::trace!(%url, "sending policy evaluation request");

        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| EvaluationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EvaluationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| EvaluationError::Decode(e.to_string()))
    }
}

/// Turns a decision document into a typed response.
///
/// A document without a boolean `decision` is a missing decision, not a deny.
fn decision_from(document: Value) -> EvaluationResult {
    if !matches!(document.get("decision"), Some(Value::Bool(_))) {
        return Err(EvaluationError::MissingDecision);
    }

    serde_json::from_value::<DecisionResponse>(document)
        .map_err(|e| EvaluationError::Decode(e.to_string()))
}

#[async_trait]
impl PolicyClient for OpaClient {
    fn backend_name(&self) -> &'static str {
        "opa"
    }

    async fn evaluate_at_path(&self, path: &str, input: &PolicyInput) -> EvaluationResult {
        let url = self.data_url(path)?;
        let body = self.post_json(url, &DataRequest { input }).await?;

        let envelope: DataResponse =
            serde_json::from_value(body).map_err(|e| EvaluationError::Decode(e.to_string()))?;

        // Undefined rules come back as `{}`.
        match envelope.result {
            None | Some(Value::Null) => Err(EvaluationError::MissingDecision),
            Some(document) => decision_from(document),
        }
    }

    async fn evaluate_default(&self, input: &PolicyInput) -> EvaluationResult {
        let body = self.post_json(self.base_url.clone(), input).await?;
        decision_from(body)
    }
}
