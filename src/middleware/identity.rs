//! 上流 (認証 proxy) で確認済みの principal → Identity を extensions に入れる
//!
//! This service does not authenticate anyone. It trusts a header that an
//! authenticating reverse proxy sets (and strips from client input). Deploy it
//! only behind such a proxy.
//!
//! - header present and non-empty: authenticated `Identity` with a `name` claim
//! - otherwise: no `Identity` (the authz middleware then denies)

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::services::identity::Identity;
use crate::state::AppState;

pub const AUTHENTICATION_TYPE: &str = "forwarded";
pub const ISSUER: &str = "upstream-proxy";

/// Must wrap (be applied after) `middleware::authz::apply`, so it runs first.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, identity_middleware))
}

async fn identity_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let subject = req
        .headers()
        .get(&state.identity_header)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    match subject {
        Some(subject) => {
            let identity = Identity::authenticated(subject, AUTHENTICATION_TYPE, ISSUER);
            // middleware → authz / extractor への受け渡し
            req.extensions_mut().insert(identity);
        }
        None => tracing::trace!(header = %state.identity_header, "no forwarded identity"),
    }

    next.run(req).await
}
