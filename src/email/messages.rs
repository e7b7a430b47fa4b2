// Email message builders

use chrono::{DateTime, Utc};
use reqwest::Url;
use std::sync::Arc;

use super::{EmailError, EmailMessage};
use crate::config::{CrmConfig, EmailConfig};
use crate::diagnosis::{DiagnosisField, DiagnosisState};
use crate::narrative::{markdown_to_html, ProposalMode};
use crate::templates::{builtin, TemplateContext, TemplateEngine};

/// Builds the outgoing emails from templates and config
#[derive(Clone)]
pub struct EmailComposer {
    engine: Arc<TemplateEngine>,
    email: EmailConfig,
    crm: CrmConfig,
}

impl EmailComposer {
    pub fn new(engine: Arc<TemplateEngine>, email: EmailConfig, crm: CrmConfig) -> Self {
        Self { engine, email, crm }
    }

    fn render(&self, name: &str, ctx: &TemplateContext) -> Result<String, EmailError> {
        self.engine
            .render(name, ctx)
            .map_err(|e| EmailError::Render(e.to_string()))
    }

    fn consultant(&self) -> Result<&str, EmailError> {
        self.email
            .consultant_email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or(EmailError::MissingRecipient("CONSULTANT_EMAIL"))
    }

    /// Personalised diagnosis email to the submitter
    pub fn diagnosis_email(
        &self,
        state: &DiagnosisState,
        executive_diagnosis: &str,
        plans_markdown: &str,
        at: DateTime<Utc>,
    ) -> Result<EmailMessage, EmailError> {
        let to = state
            .answer(DiagnosisField::Email)
            .ok_or(EmailError::MissingRecipient("diagnosis email"))?;

        let ctx = TemplateContext::from_state(state, at)
            .with("executive_html", &markdown_to_html(executive_diagnosis))
            .with("plans_html", &markdown_to_html(plans_markdown))
            .with("booking_url", self.email.booking_url.as_str());

        let html = self.render(builtin::DIAGNOSIS_EMAIL, &ctx)?;
        let subject = format!(
            "Hoja de Ruta Estratégica: Transformación para {}",
            state.text(DiagnosisField::Name)
        );

        Ok(EmailMessage::new(to, subject, html).with_from(self.email.from.clone()))
    }

    /// New-lead alert to the consultant, linking to the CRM record
    pub fn internal_notification(
        &self,
        state: &DiagnosisState,
        lead_id: &str,
        at: DateTime<Utc>,
    ) -> Result<EmailMessage, EmailError> {
        let to = self.consultant()?;
        let ctx = TemplateContext::from_state(state, at)
            .with("lead_url", &self.crm.lead_url(lead_id));

        let html = self.render(builtin::INTERNAL_NOTIFICATION_EMAIL, &ctx)?;
        let subject = format!(
            "NUEVO LEAD CALIFICADO: {} ({}/10)",
            state.text(DiagnosisField::Company),
            state.text(DiagnosisField::Priority)
        );

        Ok(EmailMessage::new(to, subject, html).with_from(self.email.alerts_from.clone()))
    }

    /// Proposal delivery email with a link to the full proposal
    pub fn proposal_email(
        &self,
        to: &str,
        state: &DiagnosisState,
        mode: ProposalMode,
        at: DateTime<Utc>,
    ) -> Result<EmailMessage, EmailError> {
        let company = state.answer(DiagnosisField::Company).unwrap_or("su empresa");
        let preview = match mode {
            ProposalMode::Aggressive => "Propuesta de Alto Impacto: Transformación con IA",
            ProposalMode::Conservative => "Propuesta de Eficiencia: Optimización de Procesos",
        };

        let ctx = TemplateContext::from_state(state, at)
            .with("company", company)
            .with("preview", preview)
            .with("view_url", &self.proposal_view_url(to));

        let html = self.render(builtin::PROPOSAL_EMAIL, &ctx)?;
        let subject = match mode {
            ProposalMode::Aggressive => {
                format!("Propuesta de Alto Impacto: Transformación con IA para {}", company)
            }
            ProposalMode::Conservative => {
                format!("Propuesta de Eficiencia: Optimización para {}", company)
            }
        };

        Ok(EmailMessage::new(to, subject, html).with_from(self.email.from.clone()))
    }

    /// Configuration check sent to the consultant
    pub fn test_email(&self, at: DateTime<Utc>) -> Result<EmailMessage, EmailError> {
        let to = self.consultant()?;
        let html = self.render(builtin::TEST_EMAIL, &TemplateContext::new(at))?;
        Ok(EmailMessage::new(to, "Volkern Diagnosis - TEST EMAIL", html))
    }

    pub fn consultant_email(&self) -> Option<&str> {
        self.consultant().ok()
    }

    fn proposal_view_url(&self, email: &str) -> String {
        let base = format!("{}/propuestas/view", self.email.app_url.trim_end_matches('/'));
        match Url::parse_with_params(&base, &[("email", email)]) {
            Ok(url) => url.to_string(),
            Err(_) => base,
        }
    }
}
