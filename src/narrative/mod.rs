//! Narrative reports built from a diagnosis
//!
//! Every generator is a pure function of the answers and a timestamp,
//! rendered through the template engine. The AI-assisted variants are
//! best-effort and fall back to fixed text.

pub mod markdown;

pub use markdown::markdown_to_html;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::completion::CompletionProvider;
use crate::diagnosis::DiagnosisState;
use crate::templates::{builtin, TemplateContext, TemplateEngine};

/// Used when the completion provider cannot produce recommendations
pub const RECOMMENDATIONS_FALLBACK: &str = "### Hoja de ruta en preparación\n\n\
Un especialista de nuestro equipo revisará tu diagnóstico y preparará \
recomendaciones personalizadas para tu empresa. Te contactaremos en las \
próximas 24 horas.";

const CONSERVATIVE_PITCH_FALLBACK: &str = "Proponemos un camino gradual: eliminar primero \
las tareas manuales de mayor frecuencia, medir el ahorro de tiempo obtenido y reinvertirlo \
en la siguiente automatización. Cada etapa se valida antes de avanzar.";

const AGGRESSIVE_PITCH_FALLBACK: &str = "Proponemos una transformación completa del ciclo \
comercial apoyada en agentes de IA, para que el crecimiento deje de depender del tamaño \
del equipo y la operación escale sin fricción.";

/// Commercial proposal approach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalMode {
    Conservative,
    Aggressive,
}

impl ProposalMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "conservative" => Some(ProposalMode::Conservative),
            "aggressive" => Some(ProposalMode::Aggressive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalMode::Conservative => "conservative",
            ProposalMode::Aggressive => "aggressive",
        }
    }

    pub fn is_aggressive(&self) -> bool {
        matches!(self, ProposalMode::Aggressive)
    }

    fn fallback_pitch(&self) -> &'static str {
        match self {
            ProposalMode::Conservative => CONSERVATIVE_PITCH_FALLBACK,
            ProposalMode::Aggressive => AGGRESSIVE_PITCH_FALLBACK,
        }
    }
}

/// Inputs of a commercial proposal beyond the diagnosis answers
#[derive(Debug, Clone)]
pub struct ProposalOptions {
    pub mode: ProposalMode,
    pub version: String,
    pub consultation_notes: Option<String>,
    pub investment: Option<String>,
    pub estimated_time: Option<String>,
    /// Strategic vision paragraph; the mode's stock text when absent
    pub pitch: Option<String>,
}

impl ProposalOptions {
    pub fn new(mode: ProposalMode, version: impl Into<String>) -> Self {
        Self {
            mode,
            version: version.into(),
            consultation_notes: None,
            investment: None,
            estimated_time: None,
            pitch: None,
        }
    }
}

/// Renders narrative reports from diagnosis answers
#[derive(Clone)]
pub struct NarrativeGenerator {
    engine: Arc<TemplateEngine>,
}

impl NarrativeGenerator {
    pub fn new(engine: Arc<TemplateEngine>) -> Self {
        Self { engine }
    }

    /// Generator over the builtin templates only
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(Arc::new(crate::templates::load_engine(None)?)))
    }

    pub fn engine(&self) -> &Arc<TemplateEngine> {
        &self.engine
    }

    /// Markdown summary of every answer, shown to the user at completion
    pub fn generate_summary(&self, state: &DiagnosisState, at: DateTime<Utc>) -> Result<String> {
        self.render(builtin::SUMMARY, TemplateContext::from_state(state, at))
    }

    /// Plain-text executive diagnosis, registered as a CRM note
    pub fn generate_executive_diagnosis(
        &self,
        state: &DiagnosisState,
        at: DateTime<Utc>,
    ) -> Result<String> {
        self.render(builtin::EXECUTIVE_DIAGNOSIS, TemplateContext::from_state(state, at))
    }

    /// The three staged automation plans (A/B/C)
    pub fn generate_action_plans(
        &self,
        state: &DiagnosisState,
        at: DateTime<Utc>,
    ) -> Result<String> {
        self.render(builtin::ACTION_PLANS, TemplateContext::from_state(state, at))
    }

    /// Project context stored on the CRM lead
    pub fn generate_project_context(
        &self,
        state: &DiagnosisState,
        at: DateTime<Utc>,
    ) -> Result<String> {
        self.render(builtin::PROJECT_CONTEXT, TemplateContext::from_state(state, at))
    }

    /// Markdown commercial proposal
    pub fn generate_commercial_proposal(
        &self,
        state: &DiagnosisState,
        options: &ProposalOptions,
        at: DateTime<Utc>,
    ) -> Result<String> {
        let notes = options.consultation_notes.as_deref().unwrap_or("").trim();
        let ctx = TemplateContext::from_state(state, at)
            .with("aggressive", &options.mode.is_aggressive())
            .with("version", options.version.as_str())
            .with(
                "pitch",
                options.pitch.as_deref().unwrap_or(options.mode.fallback_pitch()),
            )
            .with("consultation_notes", notes)
            .with(
                "investment_display",
                options.investment.as_deref().unwrap_or("A definir según alcance"),
            )
            .with(
                "time_display",
                options.estimated_time.as_deref().unwrap_or("A definir"),
            );
        self.render(builtin::COMMERCIAL_PROPOSAL, ctx)
    }

    /// Ask the completion provider for a tailored roadmap.
    ///
    /// Never fails: any rendering or provider error yields
    /// [`RECOMMENDATIONS_FALLBACK`].
    pub async fn ai_recommendations(
        &self,
        state: &DiagnosisState,
        provider: &dyn CompletionProvider,
        at: DateTime<Utc>,
    ) -> String {
        let ctx = TemplateContext::from_state(state, at);
        let prompts = self
            .render(builtin::RECOMMENDATIONS_SYSTEM, ctx.clone())
            .and_then(|system| Ok((system, self.render(builtin::RECOMMENDATIONS_USER, ctx)?)));

        let (system, user) = match prompts {
            Ok(p) => p,
            Err(e) => {
                log::warn!("[narrative] Failed to render recommendation prompts: {}", e);
                return RECOMMENDATIONS_FALLBACK.to_string();
            }
        };

        match provider.complete(&system, &user).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!(
                    "[narrative] {} recommendations failed, using fallback: {}",
                    provider.name(),
                    e
                );
                RECOMMENDATIONS_FALLBACK.to_string()
            }
        }
    }

    /// Strategic vision paragraph for a proposal; the mode's stock text on failure
    pub async fn proposal_pitch(
        &self,
        state: &DiagnosisState,
        mode: ProposalMode,
        provider: &dyn CompletionProvider,
        at: DateTime<Utc>,
    ) -> String {
        let ctx = TemplateContext::from_state(state, at).with("aggressive", &mode.is_aggressive());
        let prompts = self
            .render(builtin::PROPOSAL_PITCH_SYSTEM, ctx.clone())
            .and_then(|system| Ok((system, self.render(builtin::RECOMMENDATIONS_USER, ctx)?)));

        let result = match prompts {
            Ok((system, user)) => provider.complete(&system, &user).await.map_err(anyhow::Error::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(text) => text,
            Err(e) => {
                log::warn!("[narrative] Proposal pitch failed, using stock text: {}", e);
                mode.fallback_pitch().to_string()
            }
        }
    }

    fn render(&self, name: &str, ctx: TemplateContext) -> Result<String> {
        self.engine.render(name, &ctx)
    }
}
