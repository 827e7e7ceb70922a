/*
 * Responsibility
 * - Config読み込み → 依存生成 (Authorizer) → Router 組み立て
 * - Middleware の適用 (identity → authz → handler, 外側に http 共通 layer)
 * - axum::serve() で起動
 */
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{self, v1::handlers::health::health};
use crate::config::Config;
use crate::middleware;
use crate::services::policy::build_authorizer;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,opa_authz=trace,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    tracing::info!(
        "starting API in {:?} mode on {} (policy engine {})",
        config.app_env,
        config.addr,
        config.opa_url
    );

    let authorizer = build_authorizer(&config)?;
    let state = AppState::new(authorizer, config.identity_header.clone());
    let app = build_router(state, config.request_timeout);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    // ConnectInfo feeds input.context.ip / port
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

/// `/health` is open; everything under `/api/v1` goes through the policy engine.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let v1 = api::v1::routes();
    let v1 = middleware::authz::apply(v1, state.clone());
    let v1 = middleware::identity::apply(v1, state.clone());

    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", v1)
        .with_state(state);

    middleware::http::apply(router, request_timeout)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        // Keep serving; the process is then stopped externally.
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
