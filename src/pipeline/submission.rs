// Submission pipeline
//
// 1. lead upsert (fatal on failure, every later step needs the lead id)
// 2. narrative notes
// 3. follow-up task
// 4. emails
//
// Steps 2-4 run in order but each failure is recorded and the next step still
// runs. Nothing is retried here; the caller owns retry.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;

use super::{PipelineError, PipelineServices, StepOutcome};
use crate::crm::{
    CreateLeadPayload, InteractionOutcome, InteractionPayload, TaskKind, TaskPayload, TaskPriority,
};
use crate::diagnosis::{DiagnosisField, DiagnosisState};

/// Hours between submission and the follow-up call
pub const FOLLOW_UP_HOURS: i64 = 24;

/// Result of one pipeline run whose lead step succeeded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub success: bool,
    pub lead_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    pub note_success: bool,
    pub task_success: bool,
    pub email_sent: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    pub message: String,
}

impl SubmissionOutcome {
    fn from_steps(
        lead_id: String,
        notes: StepOutcome,
        task: StepOutcome<Option<String>>,
        email: StepOutcome,
    ) -> Self {
        let mut errors = Vec::new();
        if let Some(e) = &notes.error {
            errors.push(format!("notas: {}", e));
        }
        if let Some(e) = &task.error {
            errors.push(format!("tarea: {}", e));
        }
        if let Some(e) = &email.error {
            errors.push(format!("email: {}", e));
        }

        let message = if errors.is_empty() {
            "Diagnóstico guardado con éxito (Lead, Notas y Tarea creados)".to_string()
        } else {
            "Diagnóstico guardado; algunos pasos no se completaron".to_string()
        };

        Self {
            success: true,
            lead_id,
            task_id: task.value.flatten(),
            note_success: notes.success,
            task_success: task.success,
            email_sent: email.success,
            errors,
            message,
        }
    }

    pub fn is_fully_successful(&self) -> bool {
        self.note_success && self.task_success && self.email_sent
    }
}

/// Narratives rendered for the notes and reused by the client email
struct EmailNarratives {
    executive: Option<String>,
    plans: String,
}

/// Orchestrates a completed diagnosis across CRM, email and completion
#[derive(Clone)]
pub struct SubmissionPipeline {
    services: Arc<PipelineServices>,
}

impl SubmissionPipeline {
    pub fn new(services: Arc<PipelineServices>) -> Self {
        Self { services }
    }

    /// Run every step for a diagnosis submitted at `submitted_at`
    pub async fn submit(
        &self,
        state: &DiagnosisState,
        submitted_at: DateTime<Utc>,
    ) -> Result<SubmissionOutcome, PipelineError> {
        validate_submission(state)?;
        let services = &self.services;

        // Step 1: lead upsert
        let project_context = services
            .narratives
            .generate_project_context(state, submitted_at)
            .map_err(|e| PipelineError::Narrative(e.to_string()))?;
        let payload = CreateLeadPayload::from_state(state, project_context);

        log::info!("[pipeline] Processing lead for {}", state.text(DiagnosisField::Email));
        let lead = services.crm.create_or_update_lead(&payload).await.map_err(|e| {
            log::error!("[pipeline] Lead creation failed: {}", e);
            PipelineError::LeadCreation(e)
        })?;
        let lead_id = lead.id;

        // Step 2: narrative notes
        let (notes, narratives) = self.register_notes(state, &lead_id, submitted_at).await;

        // Step 3: follow-up task
        let task = self.create_follow_up(state, &lead_id, submitted_at).await;

        // Step 4: emails
        let email = self
            .send_emails(state, &lead_id, &narratives, submitted_at)
            .await;

        let outcome = SubmissionOutcome::from_steps(lead_id, notes, task, email);
        log::info!(
            "[pipeline] Lead {} done: notes={} task={} email={}",
            outcome.lead_id,
            outcome.note_success,
            outcome.task_success,
            outcome.email_sent
        );
        Ok(outcome)
    }

    /// Post every narrative as a note. Returns the step outcome and the texts
    /// the client email reuses.
    async fn register_notes(
        &self,
        state: &DiagnosisState,
        lead_id: &str,
        at: DateTime<Utc>,
    ) -> (StepOutcome, EmailNarratives) {
        let services = &self.services;
        let mut failures = Vec::new();
        let mut notes = Vec::new();

        let executive = match services.narratives.generate_executive_diagnosis(state, at) {
            Ok(text) => {
                notes.push(text.clone());
                Some(text)
            }
            Err(e) => {
                failures.push(format!("diagnóstico ejecutivo: {}", e));
                None
            }
        };

        let action_plans = match services.narratives.generate_action_plans(state, at) {
            Ok(text) => {
                notes.push(text.clone());
                text
            }
            Err(e) => {
                failures.push(format!("planes de acción: {}", e));
                String::new()
            }
        };

        let plans = match &services.completion {
            Some(provider) => {
                let text = services
                    .narratives
                    .ai_recommendations(state, provider.as_ref(), at)
                    .await;
                notes.push(text.clone());
                text
            }
            None => action_plans,
        };

        for content in notes {
            let payload = InteractionPayload::note(content, InteractionOutcome::Positivo);
            if let Err(e) = services.crm.create_interaction(lead_id, &payload).await {
                log::warn!("[pipeline] Note registration failed for lead {}: {}", lead_id, e);
                failures.push(e.to_string());
            }
        }

        (
            StepOutcome::from_failures(failures),
            EmailNarratives { executive, plans },
        )
    }

    async fn create_follow_up(
        &self,
        state: &DiagnosisState,
        lead_id: &str,
        at: DateTime<Utc>,
    ) -> StepOutcome<Option<String>> {
        let payload = follow_up_task(state, at);
        match self.services.crm.create_task(lead_id, &payload).await {
            Ok(task_id) => StepOutcome::ok(task_id),
            Err(e) => {
                log::warn!("[pipeline] Task creation failed for lead {}: {}", lead_id, e);
                StepOutcome::failed(e.to_string())
            }
        }
    }

    /// Client email and internal notification; the step succeeds only if both do.
    ///
    /// Without an executive diagnosis the client email is not sent.
    async fn send_emails(
        &self,
        state: &DiagnosisState,
        lead_id: &str,
        narratives: &EmailNarratives,
        at: DateTime<Utc>,
    ) -> StepOutcome {
        let services = &self.services;
        let mut failures = Vec::new();
        let mut messages = Vec::with_capacity(2);

        match &narratives.executive {
            Some(executive) => messages.push(services.composer.diagnosis_email(
                state,
                executive,
                &narratives.plans,
                at,
            )),
            None => {
                failures.push("diagnóstico ejecutivo no disponible para el cliente".to_string())
            }
        }
        messages.push(services.composer.internal_notification(state, lead_id, at));

        for message in messages {
            let result = match message {
                Ok(message) => services.email.send(&message).await.map(|_| ()),
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                log::warn!("[pipeline] Email failed for lead {}: {}", lead_id, e);
                failures.push(e.to_string());
            }
        }

        StepOutcome::from_failures(failures)
    }
}

/// Name and email are required before anything reaches the CRM
pub fn validate_submission(state: &DiagnosisState) -> Result<(), PipelineError> {
    if !state.is_answered(DiagnosisField::Name) {
        return Err(PipelineError::MissingField {
            field: DiagnosisField::Name,
            message: "El nombre es requerido",
        });
    }
    if !state.is_answered(DiagnosisField::Email) {
        return Err(PipelineError::MissingField {
            field: DiagnosisField::Email,
            message: "El email es requerido",
        });
    }
    Ok(())
}

/// Follow-up call due `FOLLOW_UP_HOURS` after submission
pub fn follow_up_task(state: &DiagnosisState, submitted_at: DateTime<Utc>) -> TaskPayload {
    let name = state.text(DiagnosisField::Name);
    let company = state.answer(DiagnosisField::Company).unwrap_or("sin empresa");
    TaskPayload {
        kind: TaskKind::Llamada,
        title: format!("Llamada seguimiento: {}", name),
        description: format!(
            "RECORDATORIO DE LLAMADA (24h): Contactar a {} ({}) para revisar diagnóstico \
             ejecutivo y planes de acción de automatización.",
            name, company
        ),
        priority: TaskPriority::from_score(state.priority_score()),
        due_at: submitted_at + Duration::hours(FOLLOW_UP_HOURS),
    }
}
