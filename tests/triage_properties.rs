//! Property-based tests for the triage domain.
//!
//! These tests check the safety and routing guarantees over generated input:
//! - An emergency phrase closes the conversation from any open phase
//! - No follow-up question is ever asked twice
//! - Recommendations are capped and carry the requested urgency
//! - Handoff notes never mention fields that were not collected
//! - Assessment is deterministic for the same context and history

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

use care_triage::domain::conversation::{
    ConversationPhase, FixedPicker, MessageContent, TriageConversation, TriageEngine, TurnInput,
    TurnStep,
};
use care_triage::domain::triage::{
    prefilled_notes, HealthContext, QuestionSequencer, QuestionType, QuestionsAsked,
    RedFlagTable, SeedContext, Severity, SymptomDuration, UrgencyAssessor, UrgencyLevel,
    ServiceRouter,
};

fn engine() -> TriageEngine {
    TriageEngine::new().with_picker(Arc::new(FixedPicker(0)))
}

/// Applies a turn, finishing any assessment without guidance prose.
fn apply(engine: &TriageEngine, conversation: &mut TriageConversation, input: TurnInput) {
    match engine.process_turn(conversation, input) {
        Ok(TurnStep::AwaitingGuidance(pending)) => {
            engine.complete_guidance(conversation, pending, None);
        }
        Ok(TurnStep::Done(_)) | Err(_) => {}
    }
}

fn emergency_keywords() -> Vec<String> {
    RedFlagTable::default()
        .rules
        .into_iter()
        .filter(|rule| rule.urgency == UrgencyLevel::Emergency)
        .flat_map(|rule| rule.keywords)
        .collect()
}

fn durations() -> impl Strategy<Value = Option<SymptomDuration>> {
    prop_oneof![
        Just(None),
        Just(Some(SymptomDuration::Today)),
        Just(Some(SymptomDuration::FewDays)),
        Just(Some(SymptomDuration::AboutAWeek)),
        Just(Some(SymptomDuration::Weeks)),
        Just(Some(SymptomDuration::Months)),
    ]
}

fn context(symptom: &str, severity: Option<u8>, duration: Option<SymptomDuration>) -> HealthContext {
    let mut ctx = HealthContext::new();
    ctx.primary_symptom = symptom.to_string();
    ctx.severity = severity.and_then(|s| Severity::new(s).ok());
    ctx.duration = duration;
    ctx
}

const SYMPTOMS: &[&str] = &["Headache", "Cough", "Rash", "Back pain", "Sore throat", "Anxiety"];

proptest! {
    #[test]
    fn emergency_phrase_closes_from_any_open_phase(
        keyword_index in any::<prop::sample::Index>(),
        prefix in "[a-z ]{0,20}",
        suffix in "[a-z ]{0,20}",
        answers_first in 0usize..4,
    ) {
        let keywords = emergency_keywords();
        let keyword = keyword_index.get(&keywords);
        let engine = engine();
        let mut conversation = TriageConversation::new(SeedContext::default());

        if answers_first > 0 {
            apply(&engine, &mut conversation, TurnInput::Text("I have a cough".to_string()));
            for _ in 1..answers_first {
                apply(&engine, &mut conversation, TurnInput::Text("not sure".to_string()));
            }
        }
        prop_assume!(!conversation.is_closed());

        let text = format!("{} {} {}", prefix, keyword, suffix);
        apply(&engine, &mut conversation, TurnInput::Text(text));

        prop_assert_eq!(conversation.phase(), ConversationPhase::Completed);
        prop_assert_eq!(conversation.urgency(), Some(UrgencyLevel::Emergency));
        let emergency_messages = conversation
            .messages()
            .iter()
            .filter(|m| matches!(m.content, MessageContent::Emergency { .. }))
            .count();
        prop_assert_eq!(emergency_messages, 1);
    }

    #[test]
    fn no_question_is_asked_twice(
        replies in prop::collection::vec(
            prop_oneof![
                Just("1-3 days".to_string()),
                Just("Severe (8-10)".to_string()),
                Just("Comes and goes".to_string()),
                Just("None of these".to_string()),
                Just("not sure".to_string()),
                "[a-z ]{0,15}",
            ],
            0..10,
        ),
    ) {
        let engine = engine();
        let mut conversation = TriageConversation::new(SeedContext::default());
        apply(&engine, &mut conversation, TurnInput::Text("I have a headache".to_string()));

        for reply in replies {
            if conversation.phase() != ConversationPhase::Gathering {
                break;
            }
            apply(&engine, &mut conversation, TurnInput::Text(reply));
        }

        let questions: Vec<QuestionType> = conversation
            .messages()
            .iter()
            .filter_map(|m| match &m.content {
                MessageContent::Question { question, .. } => Some(*question),
                _ => None,
            })
            .collect();
        let unique: HashSet<_> = questions.iter().copied().collect();
        prop_assert_eq!(unique.len(), questions.len());
    }

    #[test]
    fn sequencer_skips_asked_questions(
        asked_mask in prop::collection::vec(any::<bool>(), 6),
        duration in durations(),
    ) {
        let sequencer = QuestionSequencer::default();
        let mut asked = QuestionsAsked::new();
        for (question, was_asked) in QuestionType::DEFAULT_PRIORITY.iter().zip(&asked_mask) {
            if *was_asked {
                asked.insert(*question);
            }
        }
        let ctx = context("Headache", None, duration);

        if let Some(next) = sequencer.next_question(&ctx, &asked) {
            prop_assert!(!asked.contains(next));
            if duration.is_some() {
                prop_assert_ne!(next, QuestionType::Duration);
            }
        }
    }

    #[test]
    fn recommendations_are_capped_and_match_urgency(
        urgency_index in 0usize..UrgencyLevel::ALL.len(),
        symptom in prop::sample::select(SYMPTOMS),
        severity in prop::option::of(1u8..=10),
    ) {
        let urgency = UrgencyLevel::ALL[urgency_index];
        let router = ServiceRouter::default();
        let recommendations = router.recommend(&context(symptom, severity, None), urgency);

        prop_assert!(!recommendations.is_empty());
        prop_assert!(recommendations.len() <= 3);
        for rec in &recommendations {
            prop_assert_eq!(rec.urgency, urgency);
            let service = router.catalog().service(&rec.service_id);
            prop_assert!(service.map(|s| s.serves(urgency)).unwrap_or(false));
        }
    }

    #[test]
    fn notes_only_mention_collected_fields(
        symptom in prop::sample::select(SYMPTOMS),
        severity in prop::option::of(1u8..=10),
        duration in durations(),
    ) {
        let notes = prefilled_notes(&context(symptom, severity, duration));

        prop_assert!(notes.contains(symptom));
        prop_assert_eq!(notes.contains("Severity:"), severity.is_some());
        prop_assert_eq!(notes.contains("Duration:"), duration.is_some());
        prop_assert!(!notes.contains("Frequency:"));
        prop_assert!(!notes.contains("Allergies:"));
    }

    #[test]
    fn assessment_is_deterministic(
        symptom in prop::sample::select(SYMPTOMS),
        severity in prop::option::of(1u8..=10),
        duration in durations(),
        history in prop::collection::vec("[a-z ]{0,20}", 0..4),
    ) {
        let assessor = UrgencyAssessor::default();
        let ctx = context(symptom, severity, duration);

        let first = assessor.assess(&ctx, &history);
        let second = assessor.assess(&ctx, &history);
        prop_assert_eq!(&first, &second);
        prop_assert!(first.urgency >= assessor.table_urgency(&ctx));
    }
}
