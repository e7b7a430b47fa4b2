// Conversational driver over the diagnosis flow

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::diagnosis::{
    self, AnswerResult, DiagnosisState, FlowError, QuestionDescriptor, TOTAL_QUESTIONS,
};

pub const WELCOME_MESSAGE: &str = "¡Hola! 👋 Soy tu asistente de diagnóstico empresarial. \
Voy a hacerte algunas preguntas para entender mejor tu negocio y cómo podemos ayudarte con \
automatizaciones e IA.";

pub const COMPLETION_MESSAGE: &str = "¡Excelente! He recopilado toda la información necesaria. \
Ahora te muestro el resumen de tu diagnóstico y lo guardaré en nuestro sistema.";

pub const SUCCESS_MESSAGE: &str = "✅ Tu información ha sido guardada correctamente en el CRM. \
Un miembro de nuestro equipo se pondrá en contacto contigo en las próximas 24 horas para \
revisar tu diagnóstico.";

pub const SYNCING_MESSAGE: &str =
    "🔄 Detectamos un diagnóstico pendiente. Intentando sincronizar con el CRM...";

pub const RETRY_PROMPT: &str = "Por favor, intenta de nuevo.";

/// Message shown when the submission could not reach the CRM
pub fn saved_locally_message(error: &str) -> String {
    format!(
        "⚠️ Hubo un problema al guardar tu información: \"{}\". Tu diagnóstico ha sido guardado \
         localmente. Puedes intentar sincronizarlo de nuevo cuando el problema se resuelva.",
        error
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    Assistant,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }
}

/// Result of one user turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// Answer rejected; the same question stays pending
    Invalid { error: String },
    /// Answer accepted; this question comes next
    Next(&'static QuestionDescriptor),
    /// Last answer accepted; ready to submit
    Complete,
}

/// One conversation: the accumulated state and the transcript
#[derive(Debug, Clone)]
pub struct Conversation {
    state: DiagnosisState,
    messages: Vec<ChatMessage>,
    submitted: bool,
}

impl Conversation {
    /// Start a conversation with the welcome message and the first question
    pub fn start() -> Self {
        Self::resume(DiagnosisState::new())
    }

    /// Continue from a partially answered state
    pub fn resume(state: DiagnosisState) -> Self {
        let mut conversation = Self {
            state,
            messages: vec![ChatMessage::assistant(WELCOME_MESSAGE)],
            submitted: false,
        };
        match diagnosis::next_question(&conversation.state) {
            Some(question) => conversation.say(question.prompt),
            None => conversation.say(COMPLETION_MESSAGE),
        }
        conversation
    }

    pub fn state(&self) -> &DiagnosisState {
        &self.state
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn is_complete(&self) -> bool {
        diagnosis::is_complete(&self.state)
    }

    /// Whether the completed state has already been handed off
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub(crate) fn mark_submitted(&mut self) {
        self.submitted = true;
    }

    pub fn pending_question(&self) -> Option<&'static QuestionDescriptor> {
        diagnosis::next_question(&self.state)
    }

    /// "n de 13 preguntas"
    pub fn progress_label(&self) -> String {
        format!(
            "{} de {} preguntas",
            diagnosis::current_question_number(&self.state),
            TOTAL_QUESTIONS
        )
    }

    /// Append an assistant message
    pub fn say(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }

    /// Record a user answer and advance the flow
    pub fn answer(&mut self, raw: &str) -> Result<Turn, FlowError> {
        let result = diagnosis::submit_answer(&self.state, raw)?;
        self.messages.push(ChatMessage::user(raw.trim()));

        match result {
            AnswerResult::Invalid { error } => {
                let shown = if error.is_empty() {
                    RETRY_PROMPT.to_string()
                } else {
                    error.clone()
                };
                self.say(shown);
                Ok(Turn::Invalid { error })
            }
            AnswerResult::Accepted { updated_state } => {
                self.state = updated_state;
                match diagnosis::next_question(&self.state) {
                    Some(question) => {
                        self.say(question.prompt);
                        Ok(Turn::Next(question))
                    }
                    None => {
                        self.say(COMPLETION_MESSAGE);
                        Ok(Turn::Complete)
                    }
                }
            }
        }
    }
}
