//! JSON error responses

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::diagnosis::FlowError;
use crate::email::EmailError;
use crate::pipeline::{PipelineError, ProposalError};

/// Error body: `{error, details?, field?}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Error type for route handlers
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.into(),
                details: None,
                field: None,
            },
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.body.details = Some(details.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.body.field = Some(field.into());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Malformed or mistyped request bodies keep axum's status with a JSON body
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        log::debug!("[server] Rejected request body: {}", rejection.body_text());
        ApiError::new(rejection.status(), "Cuerpo de la petición inválido")
            .with_details(rejection.body_text())
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::MissingField { field, message } => {
                ApiError::new(StatusCode::BAD_REQUEST, message).with_field(field.key())
            }
            PipelineError::Narrative(e) => {
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Error al procesar el diagnóstico")
                    .with_details(e)
            }
            PipelineError::LeadCreation(e) => {
                let details = match e.details() {
                    Some(extra) => format!("{} - {}", e, extra),
                    None => e.to_string(),
                };
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Error al procesar el diagnóstico")
                    .with_details(details)
            }
        }
    }
}

impl From<ProposalError> for ApiError {
    fn from(err: ProposalError) -> Self {
        let message = err.to_string();
        match err {
            ProposalError::InvalidRequest(_) => ApiError::new(StatusCode::BAD_REQUEST, message),
            ProposalError::LeadNotFound(email) => {
                ApiError::new(StatusCode::NOT_FOUND, message).with_details(email)
            }
            ProposalError::Crm(e) => {
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Error interno al generar la propuesta.")
                    .with_details(e.to_string())
            }
            ProposalError::Render(e) => {
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Error interno al generar la propuesta.")
                    .with_details(e)
            }
        }
    }
}

impl From<FlowError> for ApiError {
    fn from(err: FlowError) -> Self {
        ApiError::new(StatusCode::CONFLICT, err.to_string())
    }
}

impl From<EmailError> for ApiError {
    fn from(err: EmailError) -> Self {
        let status = match err {
            EmailError::MissingApiKey | EmailError::MissingRecipient(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, "Error al enviar el email").with_details(err.to_string())
    }
}
