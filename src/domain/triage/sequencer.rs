//! Follow-up question sequencing.
//!
//! The sequencer decides which question to ask next, or that enough is known
//! to move on to assessment. It never asks the same question type twice.

use serde::{Deserialize, Serialize};

use super::context::HealthContext;
use super::question::QuestionType;
use crate::domain::foundation::ValidationError;

/// Asking order and the optional cap on how many questions to ask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerPolicy {
    pub priority: Vec<QuestionType>,
    /// `None` asks until every applicable question has been asked.
    pub max_questions: Option<usize>,
}

impl Default for SequencerPolicy {
    fn default() -> Self {
        Self {
            priority: QuestionType::DEFAULT_PRIORITY.to_vec(),
            max_questions: None,
        }
    }
}

impl SequencerPolicy {
    pub fn with_max_questions(mut self, max: usize) -> Self {
        self.max_questions = Some(max);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.priority.is_empty() {
            return Err(ValidationError::empty_field("priority"));
        }
        for (i, question) in self.priority.iter().enumerate() {
            if self.priority[..i].contains(question) {
                return Err(ValidationError::invalid_format(
                    "priority",
                    format!("'{}' is listed more than once", question),
                ));
            }
        }
        if self.max_questions == Some(0) {
            return Err(ValidationError::out_of_range("max_questions", 1, i32::MAX, 0));
        }
        Ok(())
    }
}

/// Questions already asked in a conversation, in asking order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionsAsked(Vec<QuestionType>);

impl QuestionsAsked {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a question. Returns false if it was already recorded.
    pub fn insert(&mut self, question: QuestionType) -> bool {
        if self.contains(question) {
            return false;
        }
        self.0.push(question);
        true
    }

    pub fn contains(&self, question: QuestionType) -> bool {
        self.0.contains(&question)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<QuestionType> {
        self.0.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = QuestionType> + '_ {
        self.0.iter().copied()
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuestionSequencer {
    policy: SequencerPolicy,
}

impl QuestionSequencer {
    pub fn new(policy: SequencerPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SequencerPolicy {
        &self.policy
    }

    /// Next question in priority order that is neither asked nor answered.
    pub fn next_question(&self, context: &HealthContext, asked: &QuestionsAsked) -> Option<QuestionType> {
        self.next_question_skipping(context, asked, &[])
    }

    /// Like [`next_question`](Self::next_question), also passing over types
    /// the profile already covers.
    pub fn next_question_skipping(
        &self,
        context: &HealthContext,
        asked: &QuestionsAsked,
        skip: &[QuestionType],
    ) -> Option<QuestionType> {
        self.policy
            .priority
            .iter()
            .copied()
            .find(|question| {
                !asked.contains(*question) && !skip.contains(question) && !is_known(*question, context)
            })
    }

    /// True while there is something left to ask and the cap is not reached.
    pub fn should_ask_more_questions(&self, context: &HealthContext, asked: &QuestionsAsked) -> bool {
        self.should_ask_more_skipping(context, asked, &[])
    }

    pub fn should_ask_more_skipping(
        &self,
        context: &HealthContext,
        asked: &QuestionsAsked,
        skip: &[QuestionType],
    ) -> bool {
        let under_cap = self.policy.max_questions.map_or(true, |max| asked.len() < max);
        under_cap && self.next_question_skipping(context, asked, skip).is_some()
    }
}

fn is_known(question: QuestionType, context: &HealthContext) -> bool {
    match question {
        QuestionType::Duration => context.duration.is_some(),
        QuestionType::Severity => context.severity.is_some(),
        QuestionType::Frequency => context.frequency.is_some(),
        _ => false,
    }
}
