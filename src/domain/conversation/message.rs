//! Transcript messages.
//!
//! The transcript is append-only. Each assistant message carries a typed
//! payload tagged by `content_type` so a presentation layer can render cards,
//! quick-reply buttons or plain text without parsing prose.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::Timestamp;
use crate::domain::triage::{QuestionType, ServiceRecommendation, UrgencyLevel};

use super::guidance::Guidance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "content_type", rename_all = "snake_case")]
pub enum MessageContent {
    Text {
        text: String,
    },
    Question {
        question: QuestionType,
        prompt: String,
        quick_options: Vec<String>,
        multi_select: bool,
    },
    Emergency {
        prompt: String,
        detected_symptoms: Vec<String>,
        categories: Vec<String>,
    },
    Assessment {
        urgency: UrgencyLevel,
        summary: String,
        red_flags: Vec<String>,
    },
    Guidance(Guidance),
    Recommendation(ServiceRecommendation),
    ServiceHandoff {
        service_id: String,
        title: String,
        prefilled_notes: String,
    },
}

impl MessageContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn question(question: QuestionType) -> Self {
        Self::Question {
            question,
            prompt: question.prompt().to_string(),
            quick_options: question.quick_options().iter().map(|o| o.to_string()).collect(),
            multi_select: question.is_multi_select(),
        }
    }

    /// The `content_type` tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Question { .. } => "question",
            Self::Emergency { .. } => "emergency",
            Self::Assessment { .. } => "assessment",
            Self::Guidance(_) => "guidance",
            Self::Recommendation(_) => "recommendation",
            Self::ServiceHandoff { .. } => "service_handoff",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: MessageContent,
    pub created_at: Timestamp,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, MessageContent::text(text))
    }

    pub fn assistant(content: MessageContent) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    fn new(role: MessageRole, content: MessageContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            created_at: Timestamp::now(),
        }
    }

    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }

    /// Plain text body, if this is a text message.
    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text { text } => Some(text),
            _ => None,
        }
    }
}
