//! The triage conversation aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConversationId, MemberId, StateMachine, Timestamp};
use crate::domain::triage::{
    HealthContext, QuestionType, QuestionsAsked, RedFlagDetection, SafetyAssessment, SeedContext,
    ServiceRecommendation, TriageError, UrgencyLevel,
};

use super::message::Message;
use super::phase::ConversationPhase;

/// One triage episode.
///
/// Owns the health context, the questions asked so far, the transcript and
/// the assessment once there is one. State changes go through
/// [`TriageEngine`](super::TriageEngine).
#[derive(Debug, Clone)]
pub struct TriageConversation {
    id: ConversationId,
    member_id: Option<MemberId>,
    seed: SeedContext,
    context: HealthContext,
    asked: QuestionsAsked,
    phase: ConversationPhase,
    messages: Vec<Message>,
    user_texts: Vec<String>,
    assessment: Option<SafetyAssessment>,
    emergency: Option<RedFlagDetection>,
    recommendations: Vec<ServiceRecommendation>,
    selected_service: Option<String>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl TriageConversation {
    pub fn new(seed: SeedContext) -> Self {
        let now = Timestamp::now();
        Self {
            id: ConversationId::new(),
            member_id: None,
            context: HealthContext::from_seed(&seed),
            seed,
            asked: QuestionsAsked::new(),
            phase: ConversationPhase::Initial,
            messages: Vec::new(),
            user_texts: Vec::new(),
            assessment: None,
            emergency: None,
            recommendations: Vec::new(),
            selected_service: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn for_member(member_id: MemberId, seed: SeedContext) -> Self {
        Self {
            member_id: Some(member_id),
            ..Self::new(seed)
        }
    }

    // === Accessors ===

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn member_id(&self) -> Option<&MemberId> {
        self.member_id.as_ref()
    }

    pub fn seed(&self) -> &SeedContext {
        &self.seed
    }

    pub fn context(&self) -> &HealthContext {
        &self.context
    }

    pub fn asked(&self) -> &QuestionsAsked {
        &self.asked
    }

    pub fn phase(&self) -> ConversationPhase {
        self.phase
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Every normalized user text, in order.
    pub fn user_texts(&self) -> &[String] {
        &self.user_texts
    }

    pub fn assessment(&self) -> Option<&SafetyAssessment> {
        self.assessment.as_ref()
    }

    /// The red flags that closed the conversation, if it ended in an emergency.
    pub fn emergency(&self) -> Option<&RedFlagDetection> {
        self.emergency.as_ref()
    }

    pub fn recommendations(&self) -> &[ServiceRecommendation] {
        &self.recommendations
    }

    pub fn selected_service(&self) -> Option<&str> {
        self.selected_service.as_deref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Current urgency: emergency if one was detected, else the assessment's.
    pub fn urgency(&self) -> Option<UrgencyLevel> {
        if self.emergency.is_some() {
            return Some(UrgencyLevel::Emergency);
        }
        self.assessment.as_ref().map(|a| a.urgency)
    }

    /// Question types the profile already covers.
    pub fn skipped_questions(&self) -> &[QuestionType] {
        &self.seed.skip_questions
    }

    /// The question the next gathering reply answers.
    pub fn last_question(&self) -> Option<QuestionType> {
        self.asked.last()
    }

    pub fn is_closed(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot {
            id: self.id,
            phase: self.phase,
            urgency: self.urgency(),
            context: self.context.clone(),
            messages: self.messages.clone(),
            recommendations: self.recommendations.clone(),
            selected_service: self.selected_service.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    // === Mutations (engine only) ===

    pub(super) fn ensure_open(&self) -> Result<(), TriageError> {
        if self.is_closed() {
            return Err(TriageError::ConversationClosed(self.id));
        }
        Ok(())
    }

    pub(super) fn advance(&mut self, target: ConversationPhase) -> Result<(), TriageError> {
        if self.phase == target {
            return Ok(());
        }
        let current = self.phase;
        self.phase = current
            .transition_to(target)
            .map_err(|_| TriageError::invalid_transition(current, target))?;
        self.touch();
        Ok(())
    }

    pub(super) fn context_mut(&mut self) -> &mut HealthContext {
        &mut self.context
    }

    pub(super) fn record_question(&mut self, question: QuestionType) -> bool {
        self.asked.insert(question)
    }

    /// Appends the user's turn. Blank input leaves no trace.
    pub(super) fn record_user_text(&mut self, raw: &str, normalized: String) {
        if normalized.is_empty() {
            return;
        }
        self.messages.push(Message::user(raw.trim()));
        self.user_texts.push(normalized);
        self.touch();
    }

    pub(super) fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.touch();
    }

    /// Stores the assessment. Later calls leave the first one in place.
    pub(super) fn set_assessment(&mut self, assessment: SafetyAssessment) {
        if self.assessment.is_none() {
            self.assessment = Some(assessment);
        }
    }

    pub(super) fn set_emergency(&mut self, detection: RedFlagDetection) {
        self.emergency = Some(detection);
    }

    pub(super) fn set_recommendations(&mut self, recommendations: Vec<ServiceRecommendation>) {
        self.recommendations = recommendations;
    }

    pub(super) fn select_service(&mut self, service_id: &str) -> Result<ServiceRecommendation, TriageError> {
        let recommendation = self
            .recommendations
            .iter()
            .find(|r| r.service_id == service_id)
            .cloned()
            .ok_or_else(|| TriageError::UnknownService(service_id.to_string()))?;
        self.selected_service = Some(recommendation.service_id.clone());
        Ok(recommendation)
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

/// Read-only view of a conversation for callers outside the domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSnapshot {
    pub id: ConversationId,
    pub phase: ConversationPhase,
    pub urgency: Option<UrgencyLevel>,
    pub context: HealthContext,
    pub messages: Vec<Message>,
    pub recommendations: Vec<ServiceRecommendation>,
    pub selected_service: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
