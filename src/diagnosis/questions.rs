//! Fixed question catalog
//!
//! The order of `QUESTIONS` is the interview order. It never changes at
//! runtime and there is no branching: every conversation asks the same
//! questions in the same sequence.

use serde::{Deserialize, Serialize};

/// Fields collected by the diagnosis flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosisField {
    Name,
    Email,
    Phone,
    Company,
    Industry,
    CurrentProcess,
    ManualTasks,
    MainPainPoint,
    CurrentLosses,
    SixMonthConsequence,
    BusinessObjective,
    Priority,
    TermsAcceptance,
}

impl DiagnosisField {
    /// Get all fields in catalog order
    pub fn all() -> &'static [DiagnosisField] {
        &[
            DiagnosisField::Name,
            DiagnosisField::Email,
            DiagnosisField::Phone,
            DiagnosisField::Company,
            DiagnosisField::Industry,
            DiagnosisField::CurrentProcess,
            DiagnosisField::ManualTasks,
            DiagnosisField::MainPainPoint,
            DiagnosisField::CurrentLosses,
            DiagnosisField::SixMonthConsequence,
            DiagnosisField::BusinessObjective,
            DiagnosisField::Priority,
            DiagnosisField::TermsAcceptance,
        ]
    }

    /// JSON key used on the wire
    pub fn key(&self) -> &'static str {
        match self {
            DiagnosisField::Name => "name",
            DiagnosisField::Email => "email",
            DiagnosisField::Phone => "phone",
            DiagnosisField::Company => "company",
            DiagnosisField::Industry => "industry",
            DiagnosisField::CurrentProcess => "currentProcess",
            DiagnosisField::ManualTasks => "manualTasks",
            DiagnosisField::MainPainPoint => "mainPainPoint",
            DiagnosisField::CurrentLosses => "currentLosses",
            DiagnosisField::SixMonthConsequence => "sixMonthConsequence",
            DiagnosisField::BusinessObjective => "businessObjective",
            DiagnosisField::Priority => "priority",
            DiagnosisField::TermsAcceptance => "termsAcceptance",
        }
    }

    /// Human label used in summaries
    pub fn label(&self) -> &'static str {
        match self {
            DiagnosisField::Name => "Nombre",
            DiagnosisField::Email => "Email",
            DiagnosisField::Phone => "Teléfono",
            DiagnosisField::Company => "Empresa",
            DiagnosisField::Industry => "Industria",
            DiagnosisField::CurrentProcess => "Proceso actual",
            DiagnosisField::ManualTasks => "Tareas manuales",
            DiagnosisField::MainPainPoint => "Dolor principal",
            DiagnosisField::CurrentLosses => "Pérdidas actuales",
            DiagnosisField::SixMonthConsequence => "Consecuencia a 6 meses",
            DiagnosisField::BusinessObjective => "Objetivo de negocio",
            DiagnosisField::Priority => "Prioridad",
            DiagnosisField::TermsAcceptance => "Términos y Condiciones",
        }
    }
}

/// How a raw answer is validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationKind {
    /// Non-empty after trimming
    Required,
    /// `local@domain.tld`
    Email,
    /// Optional international phone number
    Phone,
    /// Integer from 1 to 10
    Priority,
}

impl ValidationKind {
    /// Message shown when an answer fails this kind of validation
    pub fn error_message(&self) -> &'static str {
        match self {
            ValidationKind::Required => "Por favor, responde a esta pregunta para continuar",
            ValidationKind::Email => {
                "Por favor, ingresa un correo electrónico válido (ej: tu@email.com)"
            }
            ValidationKind::Phone => {
                "Por favor, ingresa un número de teléfono válido (mínimo 8 dígitos)"
            }
            ValidationKind::Priority => "Por favor, ingresa un número del 1 al 10",
        }
    }

    /// Whether an empty answer is acceptable
    pub fn is_optional(&self) -> bool {
        matches!(self, ValidationKind::Phone)
    }
}

/// Immutable catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDescriptor {
    pub id: &'static str,
    pub field: DiagnosisField,
    pub prompt: &'static str,
    pub validation: ValidationKind,
    pub placeholder: Option<&'static str>,
}

/// The interview, in order
pub static QUESTIONS: &[QuestionDescriptor] = &[
    QuestionDescriptor {
        id: "q1",
        field: DiagnosisField::Name,
        prompt: "¿Cuál es tu nombre?",
        validation: ValidationKind::Required,
        placeholder: Some("Tu nombre completo"),
    },
    QuestionDescriptor {
        id: "q2",
        field: DiagnosisField::Email,
        prompt: "¿Cuál es tu correo electrónico? Lo usaremos para enviarte el diagnóstico.",
        validation: ValidationKind::Email,
        placeholder: Some("tu@email.com"),
    },
    QuestionDescriptor {
        id: "q_phone",
        field: DiagnosisField::Phone,
        prompt: "¿Cuál es tu número de teléfono / WhatsApp? (Opcional)",
        validation: ValidationKind::Phone,
        placeholder: Some("+52 55 1234 5678"),
    },
    QuestionDescriptor {
        id: "q3",
        field: DiagnosisField::Company,
        prompt: "¿Cuál es el nombre de tu empresa?",
        validation: ValidationKind::Required,
        placeholder: Some("Nombre de tu empresa"),
    },
    QuestionDescriptor {
        id: "q4",
        field: DiagnosisField::Industry,
        prompt: "¿En qué industria o sector opera tu negocio?",
        validation: ValidationKind::Required,
        placeholder: Some("Ej: Tecnología, Retail, Servicios..."),
    },
    QuestionDescriptor {
        id: "q5",
        field: DiagnosisField::CurrentProcess,
        prompt: "¿Cómo funciona actualmente tu proceso de ventas o atención al cliente? Cuéntame brevemente.",
        validation: ValidationKind::Required,
        placeholder: Some("Describe tu proceso actual"),
    },
    QuestionDescriptor {
        id: "q6",
        field: DiagnosisField::ManualTasks,
        prompt: "¿Qué tareas realizas de forma manual y repetitiva cada día o semana?",
        validation: ValidationKind::Required,
        placeholder: Some("Ej: responder emails, agendar citas, seguimiento..."),
    },
    QuestionDescriptor {
        id: "q7",
        field: DiagnosisField::MainPainPoint,
        prompt: "¿Cuál es tu principal frustración operativa o el problema que más te quita tiempo?",
        validation: ValidationKind::Required,
        placeholder: Some("Tu mayor dolor de cabeza"),
    },
    QuestionDescriptor {
        id: "q8",
        field: DiagnosisField::CurrentLosses,
        prompt: "¿Estás perdiendo clientes, tiempo o dinero por esta situación? ¿Cuánto aproximadamente?",
        validation: ValidationKind::Required,
        placeholder: Some("Impacto actual en tu negocio"),
    },
    QuestionDescriptor {
        id: "q9",
        field: DiagnosisField::SixMonthConsequence,
        prompt: "¿Qué pasará en 6 meses si no mejoras esta situación?",
        validation: ValidationKind::Required,
        placeholder: Some("Consecuencias de no actuar"),
    },
    QuestionDescriptor {
        id: "q10",
        field: DiagnosisField::BusinessObjective,
        prompt: "¿Cuál es tu objetivo de negocio a corto plazo (próximos 3-6 meses)?",
        validation: ValidationKind::Required,
        placeholder: Some("Tu meta principal"),
    },
    QuestionDescriptor {
        id: "q11",
        field: DiagnosisField::Priority,
        prompt: "Del 1 al 10, ¿qué tan urgente es para ti resolver esto? (1 = poco urgente, 10 = crítico)",
        validation: ValidationKind::Priority,
        placeholder: Some("Un número del 1 al 10"),
    },
    QuestionDescriptor {
        id: "q12",
        field: DiagnosisField::TermsAcceptance,
        prompt: "Para finalizar, ¿aceptas nuestros términos y condiciones? Esto nos permite enviarte el diagnóstico por email y que un especialista te contacte en las próximas 24 horas para ayudarte. (Escribe \"Acepto\" para continuar)",
        validation: ValidationKind::Required,
        placeholder: Some("Escribe \"Acepto\""),
    },
];

/// Number of questions in the catalog
pub const TOTAL_QUESTIONS: usize = 13;

/// Find a question by its identifier
pub fn question_by_id(id: &str) -> Option<&'static QuestionDescriptor> {
    QUESTIONS.iter().find(|q| q.id == id)
}

/// Find the question that fills a given field
pub fn question_for_field(field: DiagnosisField) -> &'static QuestionDescriptor {
    // Every field has exactly one question; the test below guards that.
    QUESTIONS
        .iter()
        .find(|q| q.field == field)
        .unwrap_or(&QUESTIONS[0])
}
