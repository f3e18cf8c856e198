//! Turn-by-turn triage orchestration.
//!
//! [`TriageEngine`] drives a [`TriageConversation`] through its phases. It
//! is synchronous; the one collaborator call (guidance prose) is handed back
//! to the caller as [`TurnStep::AwaitingGuidance`] so the application layer
//! can run it with a timeout and then finish the turn with
//! [`TriageEngine::complete_guidance`].
//!
//! The red-flag check runs first on every text turn, whatever the phase.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::triage::{
    normalize, AssessmentThresholds, ContextParser, QuestionSequencer, RedFlagClassifier,
    RedFlagDetection, RedFlagTable, SequencerPolicy, ServiceCatalog, ServiceRouter, TriageError,
    UrgencyAssessor, UrgencyLevel,
};

use super::acknowledgment::{acknowledgment, PhrasePicker, RandomPicker};
use super::aggregate::TriageConversation;
use super::follow_up::follow_up_reply;
use super::guidance::{Guidance, GuidanceRequest};
use super::message::{Message, MessageContent};
use super::phase::ConversationPhase;

const REPROMPT: &str =
    "Could you tell me a little about what's going on? For example: \"I've had a sore throat since yesterday.\"";
const EMERGENCY_LEAD: &str = "What you're describing could be a medical emergency.";
const FALLBACK_EMERGENCY_ADVICE: &str =
    "Call emergency services (911) or go to the nearest emergency room now.";
const OPEN_ENDED: &str =
    "Is there anything else you'd like to know? You can also choose one of the options above.";
const CLOSING: &str = "Take care. If anything changes or you start to feel worse, come back any time, \
     and call 911 in an emergency.";

/// One user turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TurnInput {
    /// Free text typed by the user.
    Text(String),
    /// A quick-reply button label.
    QuickOption(String),
    /// A recommended service the user picked.
    SelectService(String),
    /// The user is done.
    Finish,
}

/// A turn waiting on guidance prose.
#[derive(Debug, Clone)]
pub struct PendingGuidance {
    request: GuidanceRequest,
    turn_start: usize,
}

impl PendingGuidance {
    pub fn request(&self) -> &GuidanceRequest {
        &self.request
    }
}

#[derive(Debug, Clone)]
pub enum TurnStep {
    /// The turn is complete; these are the assistant messages it produced.
    Done(Vec<Message>),
    /// Assessment is done; call the synthesizer, then `complete_guidance`.
    AwaitingGuidance(PendingGuidance),
}

/// Stateless orchestrator shared by every conversation.
#[derive(Debug, Clone)]
pub struct TriageEngine {
    classifier: RedFlagClassifier,
    parser: ContextParser,
    sequencer: QuestionSequencer,
    assessor: UrgencyAssessor,
    router: ServiceRouter,
    picker: Arc<dyn PhrasePicker>,
}

impl Default for TriageEngine {
    fn default() -> Self {
        let classifier = RedFlagClassifier::default();
        Self {
            assessor: UrgencyAssessor::new(AssessmentThresholds::default(), classifier.clone()),
            classifier,
            parser: ContextParser::new(),
            sequencer: QuestionSequencer::default(),
            router: ServiceRouter::default(),
            picker: Arc::new(RandomPicker::from_entropy()),
        }
    }
}

impl TriageEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_red_flags(mut self, table: RedFlagTable) -> Self {
        self.classifier = RedFlagClassifier::new(table);
        self.assessor = UrgencyAssessor::new(*self.assessor.thresholds(), self.classifier.clone());
        self
    }

    pub fn with_thresholds(mut self, thresholds: AssessmentThresholds) -> Self {
        self.assessor = UrgencyAssessor::new(thresholds, self.classifier.clone());
        self
    }

    pub fn with_policy(mut self, policy: SequencerPolicy) -> Self {
        self.sequencer = QuestionSequencer::new(policy);
        self
    }

    pub fn with_catalog(mut self, catalog: ServiceCatalog, max_recommendations: usize) -> Self {
        self.router = ServiceRouter::new(catalog, max_recommendations);
        self
    }

    pub fn with_picker(mut self, picker: Arc<dyn PhrasePicker>) -> Self {
        self.picker = picker;
        self
    }

    pub fn classifier(&self) -> &RedFlagClassifier {
        &self.classifier
    }

    pub fn sequencer(&self) -> &QuestionSequencer {
        &self.sequencer
    }

    pub fn router(&self) -> &ServiceRouter {
        &self.router
    }

    /// Applies one user turn.
    ///
    /// # Errors
    ///
    /// - `ConversationClosed` if the conversation is already completed
    /// - `UnknownService` if a selected service was not recommended
    pub fn process_turn(
        &self,
        conversation: &mut TriageConversation,
        input: TurnInput,
    ) -> Result<TurnStep, TriageError> {
        conversation.ensure_open()?;
        let turn_start = conversation.messages().len();

        match input {
            TurnInput::Text(raw) | TurnInput::QuickOption(raw) => {
                if let Some(pending) = self.handle_text(conversation, &raw, turn_start)? {
                    return Ok(TurnStep::AwaitingGuidance(pending));
                }
            }
            TurnInput::SelectService(service_id) => {
                let selected = conversation.select_service(&service_id)?;
                conversation.advance(ConversationPhase::ServiceRouting)?;
                conversation.push(Message::assistant(MessageContent::ServiceHandoff {
                    service_id: selected.service_id,
                    title: selected.title.clone(),
                    prefilled_notes: selected.prefilled_notes,
                }));
                conversation.push(Message::assistant(MessageContent::text(format!(
                    "I've passed your summary to {} so you won't have to start from scratch.",
                    selected.title
                ))));
            }
            TurnInput::Finish => {
                conversation.push(Message::assistant(MessageContent::text(CLOSING)));
                conversation.advance(ConversationPhase::Completed)?;
            }
        }

        Ok(TurnStep::Done(assistant_messages_since(conversation, turn_start)))
    }

    /// Finishes a turn that produced an assessment.
    ///
    /// `guidance` is `None` when the synthesizer failed or timed out; the
    /// recommendations are delivered either way.
    pub fn complete_guidance(
        &self,
        conversation: &mut TriageConversation,
        pending: PendingGuidance,
        guidance: Option<Guidance>,
    ) -> Vec<Message> {
        if let Some(guidance) = guidance.filter(|g| !g.is_empty()) {
            conversation.push(Message::assistant(MessageContent::Guidance(guidance)));
        }
        if let Some(top) = conversation.recommendations().first().cloned() {
            conversation.push(Message::assistant(MessageContent::Recommendation(top)));
        }
        conversation.push(Message::assistant(MessageContent::text(OPEN_ENDED)));

        assistant_messages_since(conversation, pending.turn_start)
    }

    fn handle_text(
        &self,
        conversation: &mut TriageConversation,
        raw: &str,
        turn_start: usize,
    ) -> Result<Option<PendingGuidance>, TriageError> {
        let normalized = normalize(raw);
        conversation.record_user_text(raw, normalized.clone());

        let detection = self.classifier.detect(&normalized);
        if detection.is_emergency {
            self.respond_to_emergency(conversation, &normalized, detection)?;
            return Ok(None);
        }

        match conversation.phase() {
            ConversationPhase::Initial => self.open(conversation, &normalized, turn_start),
            ConversationPhase::Gathering => self.gather(conversation, raw, &normalized, turn_start),
            ConversationPhase::Guidance | ConversationPhase::ServiceRouting => {
                let reply = follow_up_reply(
                    &normalized,
                    conversation.context(),
                    conversation.urgency(),
                    conversation.recommendations(),
                );
                conversation.push(Message::assistant(MessageContent::text(reply)));
                Ok(None)
            }
            ConversationPhase::Completed => Err(TriageError::ConversationClosed(conversation.id())),
        }
    }

    fn open(
        &self,
        conversation: &mut TriageConversation,
        normalized: &str,
        turn_start: usize,
    ) -> Result<Option<PendingGuidance>, TriageError> {
        let update = self.parser.parse_initial(normalized);
        if update.primary_symptom.is_none() {
            conversation.push(Message::assistant(MessageContent::text(REPROMPT)));
            return Ok(None);
        }

        conversation.context_mut().apply(update);
        let ack = acknowledgment(self.picker.as_ref(), &conversation.context().primary_symptom);
        conversation.push(Message::assistant(MessageContent::text(ack)));
        conversation.advance(ConversationPhase::Gathering)?;

        self.ask_or_assess(conversation, turn_start)
    }

    fn gather(
        &self,
        conversation: &mut TriageConversation,
        raw: &str,
        normalized: &str,
        turn_start: usize,
    ) -> Result<Option<PendingGuidance>, TriageError> {
        let update = conversation
            .last_question()
            .map(|question| self.parser.parse_answer(normalized, question))
            .unwrap_or_default();

        if update.is_empty() {
            conversation.context_mut().append_note(raw);
        } else {
            conversation.context_mut().apply(update);
        }

        self.ask_or_assess(conversation, turn_start)
    }

    fn ask_or_assess(
        &self,
        conversation: &mut TriageConversation,
        turn_start: usize,
    ) -> Result<Option<PendingGuidance>, TriageError> {
        let context = conversation.context();
        let asked = conversation.asked();
        let skip = conversation.skipped_questions();
        let next = if self.sequencer.should_ask_more_skipping(context, asked, skip) {
            self.sequencer.next_question_skipping(context, asked, skip)
        } else {
            None
        };

        if let Some(question) = next {
            conversation.record_question(question);
            conversation.push(Message::assistant(MessageContent::question(question)));
            return Ok(None);
        }

        self.assess(conversation, turn_start).map(Some)
    }

    fn assess(
        &self,
        conversation: &mut TriageConversation,
        turn_start: usize,
    ) -> Result<PendingGuidance, TriageError> {
        let assessment = self
            .assessor
            .assess(conversation.context(), conversation.user_texts());
        let urgency = assessment.urgency;
        let recommendations = self.router.recommend(conversation.context(), urgency);

        conversation.push(Message::assistant(MessageContent::Assessment {
            urgency,
            summary: urgency.summary().to_string(),
            red_flags: assessment.red_flags_detected.clone(),
        }));

        let request = GuidanceRequest {
            urgency,
            context: conversation.context().clone(),
            red_flags: assessment.red_flags_detected.clone(),
            age: conversation.seed().age,
            relationship: conversation.seed().relationship,
        };

        conversation.set_assessment(assessment);
        conversation.set_recommendations(recommendations);
        conversation.advance(ConversationPhase::Guidance)?;

        Ok(PendingGuidance { request, turn_start })
    }

    fn respond_to_emergency(
        &self,
        conversation: &mut TriageConversation,
        normalized: &str,
        detection: RedFlagDetection,
    ) -> Result<(), TriageError> {
        if conversation.phase() == ConversationPhase::Initial {
            let update = self.parser.parse_initial(normalized);
            conversation.context_mut().apply(update);
        }
        if conversation.assessment().is_none() {
            let assessment = self
                .assessor
                .assess(conversation.context(), conversation.user_texts());
            conversation.set_assessment(assessment);
        }

        let recommendations = self
            .router
            .recommend(conversation.context(), UrgencyLevel::Emergency);
        conversation.set_recommendations(recommendations);

        let advice = detection
            .emergency_advice()
            .unwrap_or(FALLBACK_EMERGENCY_ADVICE);
        conversation.push(Message::assistant(MessageContent::Emergency {
            prompt: format!("{} {}", EMERGENCY_LEAD, advice),
            detected_symptoms: detection.detected_symptoms.clone(),
            categories: detection.rule_ids().iter().map(|id| id.to_string()).collect(),
        }));
        if let Some(top) = conversation.recommendations().first().cloned() {
            conversation.push(Message::assistant(MessageContent::Recommendation(top)));
        }

        conversation.set_emergency(detection);
        conversation.advance(ConversationPhase::Completed)
    }
}

fn assistant_messages_since(conversation: &TriageConversation, start: usize) -> Vec<Message> {
    conversation
        .messages()
        .iter()
        .skip(start)
        .filter(|message| message.is_assistant())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::triage::{QuestionType, SeedContext, SymptomDuration};
    use crate::domain::conversation::FixedPicker;

    fn engine() -> TriageEngine {
        TriageEngine::new().with_picker(Arc::new(FixedPicker(0)))
    }

    fn text(s: &str) -> TurnInput {
        TurnInput::Text(s.to_string())
    }

    fn done(step: TurnStep) -> Vec<Message> {
        match step {
            TurnStep::Done(messages) => messages,
            TurnStep::AwaitingGuidance(_) => panic!("expected a finished turn"),
        }
    }

    fn pending(step: TurnStep) -> PendingGuidance {
        match step {
            TurnStep::AwaitingGuidance(pending) => pending,
            TurnStep::Done(messages) => panic!("expected guidance step, got {:?}", messages),
        }
    }

    fn asked_question(messages: &[Message]) -> Option<QuestionType> {
        messages.iter().find_map(|m| match &m.content {
            MessageContent::Question { question, .. } => Some(*question),
            _ => None,
        })
    }

    mod opening {
        use super::*;

        #[test]
        fn chest_pain_is_terminal_emergency() {
            let engine = engine();
            let mut conv = TriageConversation::new(SeedContext::default());
            let messages = done(engine.process_turn(&mut conv, text("I have chest pain")).unwrap());

            match &messages[0].content {
                MessageContent::Emergency {
                    detected_symptoms,
                    categories,
                    ..
                } => {
                    assert_eq!(detected_symptoms, &vec!["chest pain".to_string()]);
                    assert_eq!(categories, &vec!["cardiac".to_string()]);
                }
                other => panic!("expected emergency, got {:?}", other),
            }
            assert_eq!(conv.phase(), ConversationPhase::Completed);
            assert!(conv.asked().is_empty());
            assert!(asked_question(&messages).is_none());
            assert_eq!(conv.urgency(), Some(UrgencyLevel::Emergency));
            assert_eq!(conv.recommendations()[0].service_id, "emergency_services");
        }

        #[test]
        fn first_turn_acknowledges_and_asks_duration() {
            let engine = engine();
            let mut conv = TriageConversation::new(SeedContext::default());
            let messages = done(engine.process_turn(&mut conv, text("I'm having a headache")).unwrap());

            assert_eq!(
                messages[0].as_text(),
                Some("Thanks for letting me know about the headache.")
            );
            assert_eq!(asked_question(&messages), Some(QuestionType::Duration));
            assert_eq!(conv.phase(), ConversationPhase::Gathering);
            assert_eq!(conv.context().primary_symptom, "Headache");
        }

        #[test]
        fn known_duration_starts_with_severity() {
            let engine = engine();
            let seed = SeedContext {
                duration: Some(SymptomDuration::FewDays),
                ..Default::default()
            };
            let mut conv = TriageConversation::new(seed);
            let messages = done(engine.process_turn(&mut conv, text("a cough")).unwrap());
            assert_eq!(asked_question(&messages), Some(QuestionType::Severity));
        }

        #[test]
        fn duration_in_first_message_is_not_asked_again() {
            let engine = engine();
            let mut conv = TriageConversation::new(SeedContext::default());
            let messages =
                done(engine.process_turn(&mut conv, text("I've had a rash for weeks")).unwrap());
            assert_eq!(asked_question(&messages), Some(QuestionType::Severity));
            assert_eq!(conv.context().duration, Some(SymptomDuration::Weeks));
        }

        #[test]
        fn empty_first_turn_reprompts() {
            let engine = engine();
            let mut conv = TriageConversation::new(SeedContext::default());
            let messages = done(engine.process_turn(&mut conv, text("   ")).unwrap());
            assert_eq!(messages.len(), 1);
            assert_eq!(messages[0].as_text(), Some(REPROMPT));
            assert_eq!(conv.phase(), ConversationPhase::Initial);
            assert!(conv.user_texts().is_empty());
        }

        #[test]
        fn nothing_to_ask_goes_straight_to_assessment() {
            let engine = engine();
            let seed = SeedContext {
                skip_questions: QuestionType::DEFAULT_PRIORITY.to_vec(),
                ..Default::default()
            };
            let mut conv = TriageConversation::new(seed);
            let step = engine.process_turn(&mut conv, text("sore knee")).unwrap();
            let pending = pending(step);
            assert_eq!(pending.request().urgency, UrgencyLevel::Monitor);
            assert_eq!(conv.phase(), ConversationPhase::Guidance);
        }
    }

    mod gathering {
        use super::*;

        fn capped_engine() -> TriageEngine {
            engine().with_policy(SequencerPolicy::default().with_max_questions(2))
        }

        #[test]
        fn severe_today_headache_is_urgent_with_urgent_care_first() {
            let engine = capped_engine();
            let mut conv = TriageConversation::new(SeedContext::default());
            engine.process_turn(&mut conv, text("I have a headache")).unwrap();
            engine
                .process_turn(&mut conv, TurnInput::QuickOption("Started today".to_string()))
                .unwrap();
            let step = engine
                .process_turn(&mut conv, TurnInput::QuickOption("Severe (8-10)".to_string()))
                .unwrap();

            let pending = pending(step);
            assert_eq!(pending.request().urgency, UrgencyLevel::Urgent);
            let messages = engine.complete_guidance(&mut conv, pending, None);

            assert!(matches!(
                messages[0].content,
                MessageContent::Assessment {
                    urgency: UrgencyLevel::Urgent,
                    ..
                }
            ));
            assert!(matches!(
                &messages[1].content,
                MessageContent::Recommendation(rec) if rec.service_id == "urgent_care"
            ));
            assert_eq!(messages.last().and_then(|m| m.as_text()), Some(OPEN_ENDED));
            assert_eq!(conv.phase(), ConversationPhase::Guidance);
            assert_eq!(conv.urgency(), Some(UrgencyLevel::Urgent));
        }

        #[test]
        fn guidance_is_inserted_after_assessment() {
            let engine = engine().with_policy(SequencerPolicy::default().with_max_questions(1));
            let mut conv = TriageConversation::new(SeedContext::default());
            engine.process_turn(&mut conv, text("a cold")).unwrap();
            let pending = pending(engine.process_turn(&mut conv, text("1-3 days")).unwrap());

            let guidance = Guidance {
                possible_causes: vec!["A viral infection".to_string()],
                immediate_actions: vec!["Rest".to_string()],
                when_to_seek_help: vec!["If you develop a high fever".to_string()],
            };
            let messages = engine.complete_guidance(&mut conv, pending, Some(guidance));
            let kinds: Vec<_> = messages.iter().map(|m| m.content.kind()).collect();
            assert_eq!(kinds, vec!["assessment", "guidance", "recommendation", "text"]);
        }

        #[test]
        fn unparseable_answer_is_kept_as_note_and_flow_moves_on() {
            let engine = engine();
            let mut conv = TriageConversation::new(SeedContext::default());
            engine.process_turn(&mut conv, text("back pain")).unwrap();
            let messages = done(engine.process_turn(&mut conv, text("hard to say really")).unwrap());

            assert_eq!(conv.context().duration, None);
            assert_eq!(conv.context().additional_notes, "hard to say really");
            assert_eq!(asked_question(&messages), Some(QuestionType::Severity));
        }

        #[test]
        fn never_repeats_a_question() {
            let engine = engine();
            let mut conv = TriageConversation::new(SeedContext::default());
            let mut step = engine.process_turn(&mut conv, text("stomach ache")).unwrap();
            let mut seen = Vec::new();
            while let TurnStep::Done(messages) = step {
                if let Some(q) = asked_question(&messages) {
                    assert!(!seen.contains(&q));
                    seen.push(q);
                }
                step = engine.process_turn(&mut conv, text("not sure")).unwrap();
            }
            assert_eq!(seen.len(), QuestionType::DEFAULT_PRIORITY.len());
        }

        #[test]
        fn emergency_mid_gathering_closes() {
            let engine = engine();
            let mut conv = TriageConversation::new(SeedContext::default());
            engine.process_turn(&mut conv, text("headache")).unwrap();
            let messages =
                done(engine.process_turn(&mut conv, text("now I have slurred speech")).unwrap());
            assert_eq!(messages[0].content.kind(), "emergency");
            assert_eq!(conv.phase(), ConversationPhase::Completed);
            assert_eq!(conv.assessment().map(|a| a.urgency), Some(UrgencyLevel::Emergency));
        }
    }

    mod after_guidance {
        use super::*;

        fn in_guidance(engine: &TriageEngine) -> TriageConversation {
            let mut conv = TriageConversation::new(SeedContext::default());
            engine.process_turn(&mut conv, text("sore throat")).unwrap();
            let pending = pending(engine.process_turn(&mut conv, text("about a week")).unwrap());
            engine.complete_guidance(&mut conv, pending, None);
            conv
        }

        fn capped() -> TriageEngine {
            engine().with_policy(SequencerPolicy::default().with_max_questions(1))
        }

        #[test]
        fn follow_up_keeps_phase() {
            let engine = capped();
            let mut conv = in_guidance(&engine);
            let messages = done(engine.process_turn(&mut conv, text("thanks!")).unwrap());
            assert!(messages[0].as_text().unwrap().starts_with("You're welcome"));
            assert_eq!(conv.phase(), ConversationPhase::Guidance);
        }

        #[test]
        fn emergency_after_guidance_escalates() {
            let engine = capped();
            let mut conv = in_guidance(&engine);
            let before = conv.assessment().cloned();
            done(engine.process_turn(&mut conv, text("now i can't breathe")).unwrap());
            assert_eq!(conv.phase(), ConversationPhase::Completed);
            assert_eq!(conv.urgency(), Some(UrgencyLevel::Emergency));
            assert_eq!(conv.assessment().cloned(), before);
        }

        #[test]
        fn selecting_a_service_hands_off() {
            let engine = capped();
            let mut conv = in_guidance(&engine);
            let service_id = conv.recommendations()[0].service_id.clone();
            let messages = done(
                engine
                    .process_turn(&mut conv, TurnInput::SelectService(service_id.clone()))
                    .unwrap(),
            );
            match &messages[0].content {
                MessageContent::ServiceHandoff {
                    service_id: id,
                    prefilled_notes,
                    ..
                } => {
                    assert_eq!(id, &service_id);
                    assert!(prefilled_notes.starts_with("Chief complaint: Sore throat"));
                }
                other => panic!("expected handoff, got {:?}", other),
            }
            assert_eq!(conv.phase(), ConversationPhase::ServiceRouting);
            assert_eq!(conv.selected_service(), Some(service_id.as_str()));
        }

        #[test]
        fn unknown_service_is_rejected() {
            let engine = capped();
            let mut conv = in_guidance(&engine);
            let result = engine.process_turn(&mut conv, TurnInput::SelectService("dentist".to_string()));
            assert!(matches!(result, Err(TriageError::UnknownService(_))));
            assert_eq!(conv.phase(), ConversationPhase::Guidance);
        }

        #[test]
        fn finish_closes_and_later_turns_fail() {
            let engine = capped();
            let mut conv = in_guidance(&engine);
            done(engine.process_turn(&mut conv, TurnInput::Finish).unwrap());
            assert_eq!(conv.phase(), ConversationPhase::Completed);

            let result = engine.process_turn(&mut conv, text("one more thing"));
            assert_eq!(result.err(), Some(TriageError::ConversationClosed(conv.id())));
        }
    }

    #[test]
    fn turn_input_serializes_adjacently_tagged() {
        let json = serde_json::to_value(TurnInput::QuickOption("Fever".to_string())).unwrap();
        assert_eq!(json["type"], "quick_option");
        assert_eq!(json["value"], "Fever");
        let finish: TurnInput = serde_json::from_str(r#"{"type":"finish"}"#).unwrap();
        assert_eq!(finish, TurnInput::Finish);
    }
}
