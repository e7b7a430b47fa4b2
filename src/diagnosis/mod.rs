//! Diagnosis question flow
//!
//! - validators: per-kind answer predicates
//! - questions: the fixed, ordered question catalog
//! - state: accumulated answers
//! - flow: next question / submit answer / completion

pub mod flow;
pub mod questions;
pub mod state;
pub mod validators;

pub use flow::{
    answered_count, current_question_number, is_complete, next_question, progress_percentage,
    submit_answer, AnswerResult, FlowError,
};
pub use questions::{
    question_by_id, question_for_field, DiagnosisField, QuestionDescriptor, ValidationKind,
    QUESTIONS, TOTAL_QUESTIONS,
};
pub use state::{DiagnosisState, SKIPPED_ANSWER};
