//! Policy-engine authorization for protected routes.
//!
//! - `access`: the interceptor (capture request → authorize → forward or deny)
//! - `denial`: HTTP rendering of an `AccessDenied`
mod access;
mod denial;

pub use access::{apply, capture_request_context};
