//! Diagnosis routes
//!
//! Handles: GET /api/questions, POST /api/diagnosis/answer,
//! POST /api/diagnosis/complete, GET /api/diagnosis/config, POST /api/test-email

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::diagnosis::{
    self, AnswerResult, DiagnosisState, QuestionDescriptor, QUESTIONS, TOTAL_QUESTIONS,
};
use crate::pipeline::SubmissionOutcome;
use crate::server::error::ApiError;
use crate::server::ServerAppState;
use crate::utils::mask_secret;

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub state: DiagnosisState,
    pub answer: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub current: usize,
    pub total: usize,
    pub percentage: u8,
}

impl Progress {
    fn of(state: &DiagnosisState) -> Self {
        Self {
            current: diagnosis::current_question_number(state),
            total: TOTAL_QUESTIONS,
            percentage: diagnosis::progress_percentage(state),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<DiagnosisState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question: Option<&'static QuestionDescriptor>,
    pub complete: bool,
    pub progress: Progress,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigCheck {
    pub base_url: String,
    pub key_configured: bool,
    pub key_preview: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestEmailResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// The question catalog, in interview order
pub async fn questions_handler() -> Json<&'static [QuestionDescriptor]> {
    Json(QUESTIONS)
}

/// Validate one answer against the pending question of `state`
pub async fn answer_handler(
    payload: Result<Json<AnswerRequest>, JsonRejection>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let Json(req) = payload?;
    let response = match diagnosis::submit_answer(&req.state, &req.answer)? {
        AnswerResult::Invalid { error } => AnswerResponse {
            valid: false,
            error: Some(error),
            state: None,
            next_question: diagnosis::next_question(&req.state),
            complete: false,
            progress: Progress::of(&req.state),
        },
        AnswerResult::Accepted { updated_state } => AnswerResponse {
            valid: true,
            error: None,
            next_question: diagnosis::next_question(&updated_state),
            complete: diagnosis::is_complete(&updated_state),
            progress: Progress::of(&updated_state),
            state: Some(updated_state),
        },
    };
    Ok(Json(response))
}

/// Run the submission pipeline for a completed diagnosis
pub async fn complete_handler(
    State(state): State<ServerAppState>,
    payload: Result<Json<DiagnosisState>, JsonRejection>,
) -> Result<Json<SubmissionOutcome>, ApiError> {
    let Json(diagnosis) = payload?;
    let outcome = state.pipeline.submit(&diagnosis, Utc::now()).await?;
    if !outcome.is_fully_successful() {
        log::warn!(
            "[server] Lead {} saved with failed steps: {:?}",
            outcome.lead_id,
            outcome.errors
        );
    }
    Ok(Json(outcome))
}

/// CRM configuration check with a masked key
pub async fn config_handler(State(state): State<ServerAppState>) -> Json<ConfigCheck> {
    let crm = &state.config.crm;
    Json(ConfigCheck {
        base_url: crm.base_url.clone(),
        key_configured: crm.api_key.is_some(),
        key_preview: mask_secret(crm.api_key.as_deref()),
    })
}

/// Send a test email to the consultant address
pub async fn test_email_handler(
    State(state): State<ServerAppState>,
) -> Result<Json<TestEmailResponse>, ApiError> {
    let message = state.services.composer.test_email(Utc::now())?;
    let id = state.services.email.send(&message).await?;
    log::info!("[server] Test email sent to {}", message.to.join(", "));

    Ok(Json(TestEmailResponse {
        success: true,
        message: format!("Email de prueba enviado a {}", message.to.join(", ")),
        id,
    }))
}
