//! Policy check → forward or deny.
//!
//! Runs after the identity middleware has (or has not) put an `Identity` into
//! request extensions. The wrapped handler runs only on `Outcome::Allowed`.
//!
//! Cancellation: if the client goes away or the request deadline fires while the
//! engine call is in flight, axum drops this future and `next` is never reached.
use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::{
    Router,
    body::Body,
    extract::{ConnectInfo, OriginalUri, State},
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::services::identity::Identity;
use crate::services::policy::{Outcome, RequestContext};
use crate::state::AppState;

/// Puts every route of `router` behind the policy engine.
///
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::authz::apply(v1, state.clone());
/// let v1 = middleware::identity::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, authz_middleware))
}

async fn authz_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ctx = capture_request_context(&req);

    match state.authorizer.authorize(&ctx).await {
        Outcome::Allowed => next.run(req).await,
        Outcome::Denied(denied) => denied.into_response(),
    }
}

/// Takes the read-only snapshot the authorizer works on.
///
/// - path: from `OriginalUri`, so nested routers still report the full path
/// - host: `Host` header, or the URI authority
/// - ip/port: `ConnectInfo<SocketAddr>` when the server was started with it
pub fn capture_request_context<B>(req: &Request<B>) -> RequestContext {
    let extensions = req.extensions();

    let resource_path = extensions
        .get::<OriginalUri>()
        .map(|OriginalUri(uri)| uri.path())
        .unwrap_or_else(|| req.uri().path())
        .to_string();

    let (remote_address, remote_port) = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| (addr.ip().to_string(), addr.port()))
        .unwrap_or_default();

    let remote_host = req
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| req.uri().authority().map(|a| a.to_string()))
        .unwrap_or_default();

    RequestContext {
        identity: extensions.get::<Identity>().cloned(),
        resource_path,
        action_method: req.method().to_string(),
        action_protocol: format!("{:?}", req.version()),
        headers: flatten_headers(req.headers()),
        remote_address,
        remote_host,
        remote_port,
    }
}

// One value per name: repeated headers are joined with ','.
fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .keys()
        .map(|name| {
            let joined = headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(",");
            (name.as_str().to_string(), joined)
        })
        .collect()
}
