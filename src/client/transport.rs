// Transport from the conversational client to the diagnosis server

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::diagnosis::DiagnosisState;

/// The submission could not be processed by the server
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("No se pudo conectar con el servidor: {0}")]
    Connection(String),

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Respuesta inválida del servidor: {0}")]
    Decode(String),
}

/// What the server reported for a processed submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmissionReceipt {
    pub success: bool,
    pub lead_id: Option<String>,
    pub task_id: Option<String>,
    pub note_success: bool,
    pub task_success: bool,
    pub email_sent: bool,
    pub errors: Vec<String>,
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerErrorBody {
    error: Option<String>,
}

#[async_trait]
pub trait DiagnosisTransport: Send + Sync {
    /// Hand a completed diagnosis to the submission pipeline
    async fn submit(&self, state: &DiagnosisState) -> Result<SubmissionReceipt, TransportError>;
}

/// POSTs to `<server>/api/diagnosis/complete`
pub struct HttpTransport {
    http: reqwest::Client,
    server_url: String,
}

impl HttpTransport {
    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url: String = server_url.into();
        Self {
            http: reqwest::Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.server_url.clone())
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/diagnosis/complete", self.server_url)
    }
}

#[async_trait]
impl DiagnosisTransport for HttpTransport {
    async fn submit(&self, state: &DiagnosisState) -> Result<SubmissionReceipt, TransportError> {
        let response = self
            .http
            .post(self.endpoint())
            .json(state)
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body: ServerErrorBody = serde_json::from_str(&text).unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: body
                    .error
                    .unwrap_or_else(|| "Error al guardar".to_string()),
            });
        }

        response
            .json::<SubmissionReceipt>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}
