//! Accumulated diagnosis answers
//!
//! A field is answered iff its value is present and non-empty after
//! trimming. The JSON form uses camelCase English keys and accepts the
//! Spanish keys of earlier web clients as aliases.

use serde::{Deserialize, Serialize};

use super::questions::DiagnosisField;
use super::validators::parse_priority;

/// Stored for an optional question the user chose to skip
pub const SKIPPED_ANSWER: &str = "No proporcionado";

/// Priority at or above which a lead is flagged as urgent
pub const URGENT_PRIORITY: i64 = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisState {
    #[serde(default, alias = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, alias = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, alias = "empresa", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, alias = "industria", skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, alias = "procesoActual", skip_serializing_if = "Option::is_none")]
    pub current_process: Option<String>,
    #[serde(default, alias = "procesosManuales", skip_serializing_if = "Option::is_none")]
    pub manual_tasks: Option<String>,
    #[serde(default, alias = "dolorPrincipal", skip_serializing_if = "Option::is_none")]
    pub main_pain_point: Option<String>,
    #[serde(default, alias = "perdidasActuales", skip_serializing_if = "Option::is_none")]
    pub current_losses: Option<String>,
    #[serde(default, alias = "consecuencia6Meses", skip_serializing_if = "Option::is_none")]
    pub six_month_consequence: Option<String>,
    #[serde(default, alias = "objetivoNegocio", skip_serializing_if = "Option::is_none")]
    pub business_objective: Option<String>,
    #[serde(default, alias = "prioridad", skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, alias = "terminosYCondiciones", skip_serializing_if = "Option::is_none")]
    pub terms_acceptance: Option<String>,
}

impl DiagnosisState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value of a field, answered or not
    pub fn get(&self, field: DiagnosisField) -> Option<&str> {
        let value = match field {
            DiagnosisField::Name => &self.name,
            DiagnosisField::Email => &self.email,
            DiagnosisField::Phone => &self.phone,
            DiagnosisField::Company => &self.company,
            DiagnosisField::Industry => &self.industry,
            DiagnosisField::CurrentProcess => &self.current_process,
            DiagnosisField::ManualTasks => &self.manual_tasks,
            DiagnosisField::MainPainPoint => &self.main_pain_point,
            DiagnosisField::CurrentLosses => &self.current_losses,
            DiagnosisField::SixMonthConsequence => &self.six_month_consequence,
            DiagnosisField::BusinessObjective => &self.business_objective,
            DiagnosisField::Priority => &self.priority,
            DiagnosisField::TermsAcceptance => &self.terms_acceptance,
        };
        value.as_deref()
    }

    fn slot_mut(&mut self, field: DiagnosisField) -> &mut Option<String> {
        match field {
            DiagnosisField::Name => &mut self.name,
            DiagnosisField::Email => &mut self.email,
            DiagnosisField::Phone => &mut self.phone,
            DiagnosisField::Company => &mut self.company,
            DiagnosisField::Industry => &mut self.industry,
            DiagnosisField::CurrentProcess => &mut self.current_process,
            DiagnosisField::ManualTasks => &mut self.manual_tasks,
            DiagnosisField::MainPainPoint => &mut self.main_pain_point,
            DiagnosisField::CurrentLosses => &mut self.current_losses,
            DiagnosisField::SixMonthConsequence => &mut self.six_month_consequence,
            DiagnosisField::BusinessObjective => &mut self.business_objective,
            DiagnosisField::Priority => &mut self.priority,
            DiagnosisField::TermsAcceptance => &mut self.terms_acceptance,
        }
    }

    /// Return a copy with one field set
    pub fn with(&self, field: DiagnosisField, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        *next.slot_mut(field) = Some(value.into());
        next
    }

    /// Value of a field if it is answered, trimmed
    pub fn answer(&self, field: DiagnosisField) -> Option<&str> {
        self.get(field).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn is_answered(&self, field: DiagnosisField) -> bool {
        self.answer(field).is_some()
    }

    /// Answer text, or an empty string
    pub fn text(&self, field: DiagnosisField) -> &str {
        self.answer(field).unwrap_or("")
    }

    /// Phone number, unless missing or skipped
    pub fn phone_number(&self) -> Option<&str> {
        self.answer(DiagnosisField::Phone)
            .filter(|p| *p != SKIPPED_ANSWER)
    }

    pub fn priority_score(&self) -> Option<i64> {
        self.answer(DiagnosisField::Priority).and_then(parse_priority)
    }

    /// Urgency of 8 or more
    pub fn is_urgent(&self) -> bool {
        self.priority_score()
            .map(|p| p >= URGENT_PRIORITY)
            .unwrap_or(false)
    }

    /// Fields answered so far, in catalog order
    pub fn answered_fields(&self) -> Vec<DiagnosisField> {
        DiagnosisField::all()
            .iter()
            .copied()
            .filter(|f| self.is_answered(*f))
            .collect()
    }
}
