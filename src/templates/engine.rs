// Template rendering engine using Tera

use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::sync::Mutex;
use tera::{Context, Tera};

use crate::diagnosis::{DiagnosisField, DiagnosisState, SKIPPED_ANSWER};

/// Variables available to a template
#[derive(Debug, Clone)]
pub struct TemplateContext {
    vars: Context,
}

impl TemplateContext {
    /// Empty context with date variables for `at`
    pub fn new(at: DateTime<Utc>) -> Self {
        let mut vars = Context::new();
        vars.insert("date", &at.format("%d/%m/%Y").to_string());
        vars.insert("timestamp", &at.to_rfc3339());
        vars.insert("year", &at.year());
        Self { vars }
    }

    /// Context carrying every answer of a diagnosis.
    ///
    /// Each field is available under its wire key (`company`,
    /// `mainPainPoint`, ...) as trimmed text, empty when unanswered. The
    /// `*_display` variables carry the wording used when an answer is missing.
    pub fn from_state(state: &DiagnosisState, at: DateTime<Utc>) -> Self {
        let mut ctx = Self::new(at);

        for field in DiagnosisField::all() {
            ctx.vars.insert(field.key(), state.text(*field));
        }

        let or = |field: DiagnosisField, fallback: &str| -> String {
            state.answer(field).unwrap_or(fallback).to_string()
        };

        ctx.vars.insert("phone_display", state.phone_number().unwrap_or(SKIPPED_ANSWER));
        ctx.vars.insert("terms_display", &or(DiagnosisField::TermsAcceptance, "No aceptados"));
        ctx.vars.insert("urgent", &state.is_urgent());
        ctx.vars.insert("company_display", &or(DiagnosisField::Company, "Empresa"));
        ctx.vars.insert(
            "company_upper",
            &or(DiagnosisField::Company, "Empresa").to_uppercase(),
        );
        ctx.vars.insert("industry_display", &or(DiagnosisField::Industry, "no especificado"));
        ctx.vars.insert("pain_display", &or(DiagnosisField::MainPainPoint, "procesos manuales"));
        ctx.vars.insert("process_display", &or(DiagnosisField::CurrentProcess, "operaciones"));
        ctx.vars.insert(
            "objective_display",
            &or(DiagnosisField::BusinessObjective, "Crecimiento inteligente"),
        );
        ctx
    }

    /// Add or replace a variable
    pub fn with<T: Serialize + ?Sized>(mut self, key: &str, value: &T) -> Self {
        self.vars.insert(key, value);
        self
    }

    pub fn insert<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        self.vars.insert(key, value);
    }

    fn to_tera_context(&self) -> &Context {
        &self.vars
    }
}

/// Template engine
///
/// Templates whose name ends in `.html` are autoescaped.
pub struct TemplateEngine {
    tera: Mutex<Tera>,
}

impl TemplateEngine {
    /// Create a new template engine
    pub fn new() -> Self {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);
        Self {
            tera: Mutex::new(tera),
        }
    }

    /// Add a template from string
    pub fn add_template(&self, name: &str, template: &str) -> Result<()> {
        let mut tera = self.tera.lock().map_err(|e| anyhow!("Lock error: {}", e))?;
        tera.add_raw_template(name, template)
            .map_err(|e| anyhow!("Failed to add template '{}': {}", name, e))?;
        Ok(())
    }

    /// Render a template with context
    pub fn render(&self, template_name: &str, context: &TemplateContext) -> Result<String> {
        let tera = self.tera.lock().map_err(|e| anyhow!("Lock error: {}", e))?;
        tera.render(template_name, context.to_tera_context())
            .map_err(|e| anyhow!("Failed to render template '{}': {}", template_name, e))
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}
