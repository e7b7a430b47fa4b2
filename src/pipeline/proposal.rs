// Commercial proposal generation for an existing lead

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use super::PipelineServices;
use crate::crm::{CrmError, InteractionOutcome, InteractionPayload};
use crate::diagnosis::DiagnosisState;
use crate::narrative::{ProposalMode, ProposalOptions};

#[derive(Debug, Error)]
pub enum ProposalError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Lead no encontrado en el CRM.")]
    LeadNotFound(String),

    #[error("Error interno al generar la propuesta: {0}")]
    Crm(#[from] CrmError),

    #[error("Failed to render proposal: {0}")]
    Render(String),
}

/// Body of `POST /api/proposal/generate`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub consultation_notes: Option<String>,
    #[serde(default, alias = "inversion")]
    pub investment: Option<String>,
    #[serde(default, alias = "tiempoEstimado")]
    pub estimated_time: Option<String>,
    /// Full diagnosis; the lead record is used when absent
    #[serde(default)]
    pub state: Option<DiagnosisState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalOutcome {
    pub success: bool,
    pub version: String,
    pub mode: ProposalMode,
    pub lead_id: String,
    pub email_sent: bool,
}

/// `v-<unix millis>`
pub fn proposal_version(at: DateTime<Utc>) -> String {
    format!("v-{}", at.timestamp_millis())
}

const MISSING_FIELDS: &str = "Email y modo (conservative/aggressive) son obligatorios.";

impl ProposalRequest {
    /// Email and mode, or the 400 error
    fn required(&self) -> Result<(&str, ProposalMode), ProposalError> {
        let email = self
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ProposalError::InvalidRequest(MISSING_FIELDS.to_string()))?;
        let mode = self
            .mode
            .as_deref()
            .and_then(ProposalMode::parse)
            .ok_or_else(|| ProposalError::InvalidRequest(MISSING_FIELDS.to_string()))?;
        Ok((email, mode))
    }
}

#[derive(Clone)]
pub struct ProposalService {
    services: Arc<PipelineServices>,
}

impl ProposalService {
    pub fn new(services: Arc<PipelineServices>) -> Self {
        Self { services }
    }

    /// Generate a proposal, register it as a CRM note and email it.
    ///
    /// The delivery email is best-effort; its failure is only logged.
    pub async fn generate(
        &self,
        request: &ProposalRequest,
        at: DateTime<Utc>,
    ) -> Result<ProposalOutcome, ProposalError> {
        let (email, mode) = request.required()?;
        let services = &self.services;

        let lead = services
            .crm
            .search_lead_by_email(email)
            .await?
            .ok_or_else(|| ProposalError::LeadNotFound(email.to_string()))?;

        let state = request.state.clone().unwrap_or_else(|| lead.to_state());
        let version = proposal_version(at);

        let mut options = ProposalOptions::new(mode, version.clone());
        options.consultation_notes = request.consultation_notes.clone();
        options.investment = request.investment.clone();
        options.estimated_time = request.estimated_time.clone();
        if let Some(provider) = &services.completion {
            options.pitch = Some(
                services
                    .narratives
                    .proposal_pitch(&state, mode, provider.as_ref(), at)
                    .await,
            );
        }

        let proposal = services
            .narratives
            .generate_commercial_proposal(&state, &options, at)
            .map_err(|e| ProposalError::Render(e.to_string()))?;

        services
            .crm
            .create_interaction(
                &lead.id,
                &InteractionPayload::note(proposal, InteractionOutcome::Neutral),
            )
            .await?;
        log::info!("[proposal] Generated {} version {} for: {}", mode.as_str(), version, email);

        let sent = match services.composer.proposal_email(email, &state, mode, at) {
            Ok(message) => services.email.send(&message).await.map(|_| ()),
            Err(e) => Err(e),
        };
        if let Err(e) = &sent {
            log::error!("[proposal] Email delivery failed: {}", e);
        }

        Ok(ProposalOutcome {
            success: true,
            version,
            mode,
            lead_id: lead.id,
            email_sent: sent.is_ok(),
        })
    }
}
