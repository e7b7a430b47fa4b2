// Integration tests for the diagnosis question flow

mod common;

#[cfg(test)]
mod flow_integration_tests {
    use super::common::{complete_state, ANSWERS};
    use diagnosis_lib::diagnosis::{
        answered_count, is_complete, next_question, progress_percentage, submit_answer,
        AnswerResult, DiagnosisField, DiagnosisState, FlowError, QUESTIONS, TOTAL_QUESTIONS,
    };

    #[test]
    fn test_answering_every_question_completes_the_flow() {
        let state = complete_state();

        assert!(is_complete(&state));
        assert!(next_question(&state).is_none());
        assert_eq!(answered_count(&state), 13);
        assert_eq!(state.answered_fields().len(), TOTAL_QUESTIONS);
        assert_eq!(progress_percentage(&state), 100);
        assert_eq!(state.answer(DiagnosisField::Phone), Some("+34 600 123 456"));
        assert_eq!(state.priority_score(), Some(9));
    }

    #[test]
    fn test_each_accepted_answer_adds_exactly_one_field() {
        let mut state = DiagnosisState::new();
        for (i, answer) in ANSWERS.iter().enumerate() {
            assert_eq!(answered_count(&state), i);
            let pending = next_question(&state).unwrap();
            assert_eq!(pending.id, QUESTIONS[i].id);

            state = match submit_answer(&state, &format!("  {}  ", answer)).unwrap() {
                AnswerResult::Accepted { updated_state } => updated_state,
                AnswerResult::Invalid { error } => panic!("rejected: {}", error),
            };
            assert_eq!(state.answer(pending.field), Some(*answer));
        }
        assert!(is_complete(&state));
    }

    #[test]
    fn test_completion_matches_next_question_for_partial_states() {
        let mut state = DiagnosisState::new();
        for answer in ANSWERS {
            assert_eq!(is_complete(&state), next_question(&state).is_none());
            if let Ok(AnswerResult::Accepted { updated_state }) = submit_answer(&state, answer) {
                state = updated_state;
            }
        }
        assert_eq!(is_complete(&state), next_question(&state).is_none());
    }

    #[test]
    fn test_submitting_to_complete_state_fails_without_mutation() {
        let state = complete_state();
        let before = state.clone();

        assert_eq!(submit_answer(&state, "otra"), Err(FlowError::FlowComplete));
        assert_eq!(state, before);
    }

    #[test]
    fn test_invalid_answer_leaves_state_unchanged() {
        let state = DiagnosisState::new().with(DiagnosisField::Name, "Ana");
        let result = submit_answer(&state, "not-an-email").unwrap();

        assert!(!result.is_valid());
        assert_eq!(next_question(&state).unwrap().field, DiagnosisField::Email);
        assert_eq!(answered_count(&state), 1);
    }

    #[test]
    fn test_skipped_phone_still_advances() {
        let state = DiagnosisState::new()
            .with(DiagnosisField::Name, "Ana")
            .with(DiagnosisField::Email, "ana@acme.com");

        let state = match submit_answer(&state, "   ").unwrap() {
            AnswerResult::Accepted { updated_state } => updated_state,
            AnswerResult::Invalid { error } => panic!("rejected: {}", error),
        };
        assert!(state.is_answered(DiagnosisField::Phone));
        assert_eq!(state.phone_number(), None);
        assert_eq!(next_question(&state).unwrap().field, DiagnosisField::Company);
    }

    #[test]
    fn test_state_json_accepts_spanish_keys() {
        let state: DiagnosisState = serde_json::from_str(
            r#"{"nombre":"Ana","email":"ana@acme.com","empresa":"Acme","prioridad":"7"}"#,
        )
        .unwrap();
        assert_eq!(state.answer(DiagnosisField::Company), Some("Acme"));
        assert_eq!(state.priority_score(), Some(7));
        assert_eq!(next_question(&state).unwrap().field, DiagnosisField::Phone);
    }
}
