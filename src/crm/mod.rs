// CRM integration (Volkern API)

pub mod client;
pub mod types;

pub use client::CrmClient;
pub use types::{
    CreateLeadPayload, CrmTask, InteractionOutcome, InteractionPayload, Lead, LeadChannel,
    LeadResponse, LeadStatus, TaskKind, TaskPayload, TaskPriority,
};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrmError {
    #[error("CRM API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        details: Option<String>,
        hint: Option<String>,
    },

    #[error("CRM request failed: {0}")]
    Transport(String),

    #[error("Failed to decode CRM response: {0}")]
    Decode(String),

    #[error("VOLKERN_API_KEY no está configurada. Añádela a tus variables de entorno.")]
    MissingApiKey,

    #[error("No se pudo obtener el ID del lead del CRM")]
    MissingLeadId,
}

impl CrmError {
    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            CrmError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Extra detail for error responses
    pub fn details(&self) -> Option<String> {
        match self {
            CrmError::Api { details, hint, .. } => match (details, hint) {
                (Some(d), Some(h)) => Some(format!("{} ({})", d, h)),
                (Some(d), None) => Some(d.clone()),
                (None, Some(h)) => Some(h.clone()),
                (None, None) => None,
            },
            _ => None,
        }
    }
}

/// CRM operations used by the pipeline and the proposal flow
#[async_trait]
pub trait CrmApi: Send + Sync {
    /// Create a lead, or update the one with the same email
    async fn create_or_update_lead(&self, payload: &CreateLeadPayload) -> Result<Lead, CrmError>;

    /// Attach an interaction to a lead; returns its id when the CRM reports one
    async fn create_interaction(
        &self,
        lead_id: &str,
        payload: &InteractionPayload,
    ) -> Result<Option<String>, CrmError>;

    /// Schedule a task on a lead; returns its id when the CRM reports one
    async fn create_task(
        &self,
        lead_id: &str,
        payload: &TaskPayload,
    ) -> Result<Option<String>, CrmError>;

    async fn search_lead_by_email(&self, email: &str) -> Result<Option<Lead>, CrmError>;

    async fn get_lead(&self, lead_id: &str) -> Result<Lead, CrmError>;

    async fn update_lead_status(&self, lead_id: &str, status: LeadStatus)
        -> Result<Lead, CrmError>;

    async fn list_lead_tasks(&self, lead_id: &str) -> Result<Vec<CrmTask>, CrmError>;

    async fn complete_task(&self, task_id: &str) -> Result<(), CrmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_details_combine_hint() {
        let err = CrmError::Api {
            status: 422,
            message: "Invalid email".to_string(),
            details: Some("email malformed".to_string()),
            hint: Some("check the address".to_string()),
        };
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.details().as_deref(), Some("email malformed (check the address)"));
        assert_eq!(err.to_string(), "CRM API error (422): Invalid email");
        assert_eq!(CrmError::MissingApiKey.status(), None);
    }
}
