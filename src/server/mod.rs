//! HTTP server for the diagnosis flow
//!
//! Exposes the question catalog, per-answer validation, the submission
//! pipeline and proposal generation as a JSON API.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::ServerAppState;

use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue,
    },
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::utils::ResultExt;
use routes::{diagnosis_routes, proposal_routes};

/// CORS layer for the configured origins; any origin when none are set
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(allowed)
    }
}

/// Build the router with every endpoint and the CORS layer
pub fn build_router(state: ServerAppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/health", get(routes::health_handler))
        .route("/api/version", get(routes::version_handler))
        .route("/api/questions", get(diagnosis_routes::questions_handler))
        .route("/api/diagnosis/answer", post(diagnosis_routes::answer_handler))
        .route("/api/diagnosis/complete", post(diagnosis_routes::complete_handler))
        .route("/api/diagnosis/config", get(diagnosis_routes::config_handler))
        .route("/api/test-email", post(diagnosis_routes::test_email_handler))
        .route("/api/proposal/generate", post(proposal_routes::generate_handler))
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP server until shutdown is requested
pub async fn run_server(state: ServerAppState) -> Result<(), String> {
    let bind = state.config.server.bind.clone();
    let port = state.config.server.port;
    let cors_display = if state.config.server.cors_origins.is_empty() {
        "*".to_string()
    } else {
        state.config.server.cors_origins.join(", ")
    };
    let shutdown_state = state.shutdown_state.clone();

    let addr = format!("{}:{}", bind, port)
        .parse::<SocketAddr>()
        .with_context("Invalid address")?;

    let app = build_router(state);

    println!("\nDiagnosis server v{}", env!("CARGO_PKG_VERSION"));
    println!("  Server URL:   http://{}:{}", bind, port);
    println!("  CORS Origins: {}", cors_display);
    println!("  Endpoints:");
    println!("    GET  /api/questions          - Question catalog");
    println!("    POST /api/diagnosis/answer   - Validate one answer");
    println!("    POST /api/diagnosis/complete - Submit a completed diagnosis");
    println!("    POST /api/proposal/generate  - Generate a commercial proposal");
    println!("    GET  /health                 - Health check\n");

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    log::info!("[server] Listening on http://{}", addr);

    let shutdown_signal = async move {
        shutdown_state.wait().await;
        log::info!("[server] Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .with_context("Server error")
}
