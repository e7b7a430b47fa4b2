//! Server application state shared across handlers

use crate::config::AppConfig;
use crate::pipeline::{PipelineServices, ProposalService, SubmissionPipeline};
use crate::shutdown::ShutdownState;
use std::sync::Arc;

/// Shared state for the server: the collaborators built once at start-up
#[derive(Clone)]
pub struct ServerAppState {
    /// Submission pipeline for completed diagnoses
    pub pipeline: SubmissionPipeline,

    /// Commercial proposal generation
    pub proposals: ProposalService,

    /// CRM, email and completion clients
    pub services: Arc<PipelineServices>,

    /// Resolved configuration
    pub config: Arc<AppConfig>,

    /// Shutdown state
    pub shutdown_state: ShutdownState,
}

impl ServerAppState {
    pub fn new(config: AppConfig, services: PipelineServices, shutdown_state: ShutdownState) -> Self {
        let services = Arc::new(services);
        Self {
            pipeline: SubmissionPipeline::new(services.clone()),
            proposals: ProposalService::new(services.clone()),
            services,
            config: Arc::new(config),
            shutdown_state,
        }
    }
}
