//! Policy evaluation interface used by the authorizer.
use async_trait::async_trait;
use thiserror::Error;

use crate::services::policy::{input::PolicyInput, response::DecisionResponse};

/// Result type for evaluation calls.
pub type EvaluationResult = Result<DecisionResponse, EvaluationError>;

/// Evaluation failures (transport/status/decode).
///
/// Not:
/// - Callers never show these to the end user. The authorizer logs them and
///   denies the request.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("policy engine transport error: {0}")]
    Transport(String),
    #[error("policy engine returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("policy engine response could not be decoded: {0}")]
    Decode(String),
    #[error("policy engine response has no decision")]
    MissingDecision,
}

/// Evaluates a policy for a given input document.
///
/// Which of the two methods is called is the authorizer's choice: a configured
/// rule path selects `evaluate_at_path`, otherwise `evaluate_default`.
///
/// Implementations own the transport (connection pooling, timeouts) and are
/// shared by all in-flight requests.
#[async_trait]
pub trait PolicyClient: Send + Sync + 'static {
    // Returns the engine name (for logging).
    fn backend_name(&self) -> &'static str;

    // Evaluate the rule at `path` (e.g. `policy/allow`).
    async fn evaluate_at_path(&self, path: &str, input: &PolicyInput) -> EvaluationResult;

    // Evaluate the engine's configured default decision.
    async fn evaluate_default(&self, input: &PolicyInput) -> EvaluationResult;
}

#[cfg(test)]
pub(crate) mod mock {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    /// What the mock answers with.
    #[derive(Debug, Clone)]
    pub enum Reply {
        Decision(DecisionResponse),
        Fail,
        MissingDecision,
        Hang,
    }

    /// Records calls and answers with a fixed reply.
    #[derive(Debug)]
    pub struct MockPolicyClient {
        reply: Reply,
        calls: AtomicUsize,
        pub paths: Mutex<Vec<Option<String>>>,
        pub inputs: Mutex<Vec<PolicyInput>>,
    }

    impl MockPolicyClient {
        pub fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
                paths: Mutex::new(Vec::new()),
                inputs: Mutex::new(Vec::new()),
            }
        }

        pub fn answering(decision: DecisionResponse) -> Self {
            Self::new(Reply::Decision(decision))
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        async fn answer(&self, path: Option<&str>, input: &PolicyInput) -> EvaluationResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.paths.lock().unwrap().push(path.map(str::to_string));
            self.inputs.lock().unwrap().push(input.clone());

            match &self.reply {
                Reply::Decision(d) => Ok(d.clone()),
                Reply::Fail => Err(EvaluationError::Transport("connection refused".into())),
                Reply::MissingDecision => Err(EvaluationError::MissingDecision),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(EvaluationError::Transport("timed out".into()))
                }
            }
        }
    }

    #[async_trait]
    impl PolicyClient for MockPolicyClient {
        fn backend_name(&self) -> &'static str {
            "mock"
        }

        async fn evaluate_at_path(&self, path: &str, input: &PolicyInput) -> EvaluationResult {
            self.answer(Some(path), input).await
        }

        async fn evaluate_default(&self, input: &PolicyInput) -> EvaluationResult {
            self.answer(None, input).await
        }
    }
}
