//! Route handlers
//!
//! - diagnosis_routes: question catalog, answer validation, completion, config check
//! - proposal_routes: commercial proposal generation

pub mod diagnosis_routes;
pub mod proposal_routes;

use axum::Json;
use serde::Serialize;

/// Version information for the server
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub name: String,
    pub version: String,
}

/// Health check endpoint
pub async fn health_handler() -> &'static str {
    "OK"
}

/// Version endpoint
pub async fn version_handler() -> Json<VersionInfo> {
    Json(VersionInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
