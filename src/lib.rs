//! HTTP request authorization backed by an external policy engine (OPA).
//!
//! Every request under a protected router is turned into a policy input
//! document, evaluated by the engine, and either forwarded or answered with an
//! `Access denied` body. Any failure along the way denies.
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
