pub mod authorizer;
pub mod client;
pub mod factory;
pub mod input;
pub mod opa;
pub mod outcome;
pub mod response;

pub use authorizer::{Authorizer, AuthorizerBuilder};
pub use client::{EvaluationError, PolicyClient};
pub use factory::build_authorizer;
pub use input::{ConstantContextDataProvider, ContextDataProvider, PolicyInput, RequestContext};
pub use opa::OpaClient;
pub use outcome::{AccessDenied, Outcome};
pub use response::{DecisionContext, DecisionResponse};
