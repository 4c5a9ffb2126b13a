pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{Next, from_fn, from_fn_with_state},
    response::Response,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{self, admin_auth_middleware};
use crate::config::GatewayConfig;
use crate::documents;
use crate::logging::ACCESS_TARGET;
use state::AppState;

/// Access log for every request.
async fn access_log_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        target: ACCESS_TARGET,
        "{} {} -> {} ({} ms)",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

/// Assemble the full application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let auth_routes = Router::new()
        .route("/nonce", get(auth::handlers::get_nonce))
        .route("/login", post(auth::handlers::login));

    // Admin only
    let admin_document_routes = Router::new()
        .route("/", get(documents::handlers::list_files))
        .route(
            "/groups",
            get(documents::handlers::list_groups).post(documents::handlers::create_group),
        )
        .route_layer(from_fn_with_state(state.clone(), admin_auth_middleware));

    let public_document_routes =
        Router::new().route("/{cid}", get(documents::handlers::get_document));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/auth", auth_routes)
        .nest(
            "/documents",
            admin_document_routes.merge(public_document_routes),
        )
        .with_state(state)
        // Stateless, added after with_state
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(from_fn(access_log_middleware))
}

/// Bind and serve until ctrl-c.
pub async fn run_server(config: &GatewayConfig, state: Arc<AppState>) -> std::io::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        tracing::error!(
            "Failed to bind to {}: {} (port {} may already be in use)",
            addr,
            e,
            config.port
        );
        e
    })?;

    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("API Docs: http://{}/docs", addr);

    let sweeper = tokio::spawn(sweep_nonces(state.clone()));
    let served = axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;
    sweeper.abort();
    served
}

/// Periodically drop expired login nonces.
async fn sweep_nonces(state: Arc<AppState>) {
    let mut ticker = tokio::time::interval(state.settings.nonce_sweep_interval());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let purged = state.auth.nonces().purge_expired();
        if purged > 0 {
            tracing::debug!("[NONCE] swept {} expired nonces", purged);
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
