//! Proposal routes
//!
//! Handles: POST /api/proposal/generate

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;

use crate::pipeline::{ProposalOutcome, ProposalRequest};
use crate::server::error::ApiError;
use crate::server::ServerAppState;

pub async fn generate_handler(
    State(state): State<ServerAppState>,
    payload: Result<Json<ProposalRequest>, JsonRejection>,
) -> Result<Json<ProposalOutcome>, ApiError> {
    let Json(req) = payload?;
    let outcome = state.proposals.generate(&req, Utc::now()).await.map_err(|e| {
        log::warn!("[server] Proposal generation failed: {}", e);
        ApiError::from(e)
    })?;
    Ok(Json(outcome))
}
