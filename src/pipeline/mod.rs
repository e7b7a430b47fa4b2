// Submission pipeline and proposal generation

pub mod leads;
pub mod proposal;
pub mod submission;

pub use leads::{LeadOverview, LeadService};
pub use proposal::{ProposalError, ProposalOutcome, ProposalRequest, ProposalService};
pub use submission::{SubmissionOutcome, SubmissionPipeline};

use anyhow::Result;
use std::sync::Arc;
use thiserror::Error;

use crate::completion::{AnthropicProvider, CompletionProvider};
use crate::config::AppConfig;
use crate::crm::{CrmApi, CrmClient, CrmError};
use crate::diagnosis::DiagnosisField;
use crate::email::{EmailComposer, EmailSender, ResendClient};
use crate::narrative::NarrativeGenerator;

/// Fatal pipeline failures; soft step failures live in `SubmissionOutcome`
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{message}")]
    MissingField {
        field: DiagnosisField,
        message: &'static str,
    },

    #[error("Failed to generate narrative: {0}")]
    Narrative(String),

    #[error("Error al procesar el diagnóstico: {0}")]
    LeadCreation(#[source] CrmError),
}

/// Outcome of one soft step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome<T = ()> {
    pub success: bool,
    pub value: Option<T>,
    pub error: Option<String>,
}

impl<T> StepOutcome<T> {
    pub fn ok(value: T) -> Self {
        Self {
            success: true,
            value: Some(value),
            error: None,
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            success: false,
            value: None,
            error: Some(error),
        }
    }
}

impl StepOutcome<()> {
    /// Successful when no sub-operation failed
    pub fn from_failures(failures: Vec<String>) -> Self {
        if failures.is_empty() {
            Self::ok(())
        } else {
            Self::failed(failures.join("; "))
        }
    }
}

/// Collaborators shared by the pipeline and the proposal service.
///
/// Built once at start-up and passed explicitly.
pub struct PipelineServices {
    pub crm: Arc<dyn CrmApi>,
    pub email: Arc<dyn EmailSender>,
    pub completion: Option<Arc<dyn CompletionProvider>>,
    pub narratives: NarrativeGenerator,
    pub composer: EmailComposer,
}

impl PipelineServices {
    /// Real HTTP clients from resolved configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let engine = Arc::new(crate::templates::load_engine(
            config.templates.templates_dir.as_deref(),
        )?);

        let completion = AnthropicProvider::from_config(&config.completion)
            .map(|p| Arc::new(p) as Arc<dyn CompletionProvider>);
        if completion.is_none() {
            log::info!("[pipeline] No completion API key; AI recommendations disabled");
        }

        Ok(Self {
            crm: Arc::new(CrmClient::from_config(&config.crm)),
            email: Arc::new(ResendClient::from_config(&config.email)),
            completion,
            narratives: NarrativeGenerator::new(engine.clone()),
            composer: EmailComposer::new(engine, config.email.clone(), config.crm.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_outcome_from_failures() {
        assert!(StepOutcome::from_failures(Vec::new()).success);

        let failed = StepOutcome::from_failures(vec!["a".to_string(), "b".to_string()]);
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("a; b"));
    }

    #[test]
    fn test_services_from_default_config() {
        let services = PipelineServices::from_config(&AppConfig::default()).unwrap();
        assert!(services.completion.is_none());
    }
}
