// Diagnosis question flow
//
// Linear state machine over the "answered" flags of the catalog fields. The
// only transition is answering the pending question; the only terminal state
// is every field answered. There is no way back and no branching.

use thiserror::Error;

use super::questions::{QuestionDescriptor, ValidationKind, QUESTIONS, TOTAL_QUESTIONS};
use super::state::{DiagnosisState, SKIPPED_ANSWER};
use super::validators::{validate_email, validate_phone, validate_priority, validate_required};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("No hay más preguntas pendientes.")]
    FlowComplete,
}

/// Outcome of validating one raw answer against the pending question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerResult {
    Invalid { error: String },
    Accepted { updated_state: DiagnosisState },
}

impl AnswerResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, AnswerResult::Accepted { .. })
    }
}

/// First catalog question whose field is unanswered, or `None` when done
pub fn next_question(state: &DiagnosisState) -> Option<&'static QuestionDescriptor> {
    QUESTIONS.iter().find(|q| !state.is_answered(q.field))
}

/// Check if every catalog field is answered
pub fn is_complete(state: &DiagnosisState) -> bool {
    next_question(state).is_none()
}

/// Validate a trimmed answer against a validation kind
pub fn validate_answer(kind: ValidationKind, answer: &str) -> bool {
    match kind {
        ValidationKind::Required => validate_required(answer),
        ValidationKind::Email => validate_email(answer),
        ValidationKind::Phone => validate_phone(answer),
        ValidationKind::Priority => validate_priority(answer),
    }
}

/// Validate a raw answer for the pending question and apply it.
///
/// The input state is never modified; an accepted answer comes back as a new
/// state with exactly one more answered field.
pub fn submit_answer(state: &DiagnosisState, raw_answer: &str) -> Result<AnswerResult, FlowError> {
    let question = next_question(state).ok_or(FlowError::FlowComplete)?;
    let answer = raw_answer.trim();

    if !validate_answer(question.validation, answer) {
        log::debug!(
            "[flow] Rejected answer for {}: {:?}",
            question.id,
            question.validation
        );
        return Ok(AnswerResult::Invalid {
            error: question.validation.error_message().to_string(),
        });
    }

    // An empty answer only gets here for optional questions
    let value = if answer.is_empty() {
        SKIPPED_ANSWER
    } else {
        answer
    };

    Ok(AnswerResult::Accepted {
        updated_state: state.with(question.field, value),
    })
}

/// Number of answered catalog fields
pub fn answered_count(state: &DiagnosisState) -> usize {
    QUESTIONS
        .iter()
        .filter(|q| state.is_answered(q.field))
        .count()
}

/// 1-based number of the pending question, capped at the catalog size
pub fn current_question_number(state: &DiagnosisState) -> usize {
    (answered_count(state) + 1).min(TOTAL_QUESTIONS)
}

/// Completion percentage (0-100)
pub fn progress_percentage(state: &DiagnosisState) -> u8 {
    ((answered_count(state) * 100) / TOTAL_QUESTIONS) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnosis::questions::DiagnosisField;

    fn accept(state: &DiagnosisState, answer: &str) -> DiagnosisState {
        match submit_answer(state, answer).unwrap() {
            AnswerResult::Accepted { updated_state } => updated_state,
            AnswerResult::Invalid { error } => panic!("answer {:?} rejected: {}", answer, error),
        }
    }

    #[test]
    fn test_first_question_is_name() {
        let q = next_question(&DiagnosisState::new()).unwrap();
        assert_eq!(q.field, DiagnosisField::Name);
        assert_eq!(current_question_number(&DiagnosisState::new()), 1);
    }

    #[test]
    fn test_accepted_answer_is_trimmed() {
        let state = accept(&DiagnosisState::new(), "  Ana López  ");
        assert_eq!(state.name.as_deref(), Some("Ana López"));
        assert_eq!(next_question(&state).unwrap().field, DiagnosisField::Email);
    }

    #[test]
    fn test_invalid_answer_returns_kind_message() {
        let state = accept(&DiagnosisState::new(), "Ana");
        let result = submit_answer(&state, "not-an-email").unwrap();
        assert_eq!(
            result,
            AnswerResult::Invalid {
                error: ValidationKind::Email.error_message().to_string()
            }
        );
        assert!(!result.is_valid());
    }

    #[test]
    fn test_empty_required_answer_rejected() {
        let result = submit_answer(&DiagnosisState::new(), "   ").unwrap();
        assert!(!result.is_valid());
    }

    #[test]
    fn test_skipping_phone_advances_flow() {
        let state = accept(&DiagnosisState::new(), "Ana");
        let state = accept(&state, "ana@acme.com");
        let state = accept(&state, "");
        assert_eq!(state.phone.as_deref(), Some(SKIPPED_ANSWER));
        assert_eq!(next_question(&state).unwrap().field, DiagnosisField::Company);
        assert_eq!(answered_count(&state), 3);
    }

    #[test]
    fn test_order_ignores_out_of_order_answers() {
        // A later field being present does not let the flow skip earlier ones
        let state = DiagnosisState::new().with(DiagnosisField::Priority, "5");
        assert_eq!(next_question(&state).unwrap().field, DiagnosisField::Name);
    }

    #[test]
    fn test_complete_state_rejects_answers() {
        let mut state = DiagnosisState::new();
        for field in DiagnosisField::all() {
            state = state.with(*field, "x");
        }
        assert!(is_complete(&state));
        assert_eq!(submit_answer(&state, "más"), Err(FlowError::FlowComplete));
        assert_eq!(current_question_number(&state), TOTAL_QUESTIONS);
        assert_eq!(progress_percentage(&state), 100);
    }
}
