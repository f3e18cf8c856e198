//! Conversation phase state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Where a triage conversation is in its lifecycle.
///
/// - `Initial`: waiting for the first description of the problem
/// - `Gathering`: asking follow-up questions
/// - `Guidance`: assessment delivered, answering follow-ups
/// - `ServiceRouting`: the user picked a service to hand off to
/// - `Completed`: read-only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationPhase {
    #[default]
    Initial,
    Gathering,
    Guidance,
    ServiceRouting,
    Completed,
}

impl ConversationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Gathering => "gathering",
            Self::Guidance => "guidance",
            Self::ServiceRouting => "service_routing",
            Self::Completed => "completed",
        }
    }

    /// Returns true if the user can still send turns.
    pub fn accepts_input(&self) -> bool {
        !matches!(self, Self::Completed)
    }

    /// Returns true once an assessment has been delivered.
    pub fn is_post_assessment(&self) -> bool {
        matches!(self, Self::Guidance | Self::ServiceRouting)
    }
}

impl fmt::Display for ConversationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StateMachine for ConversationPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConversationPhase::*;
        matches!(
            (self, target),
            (Initial, Gathering)
                | (Initial, Completed)
                | (Gathering, Guidance)
                | (Gathering, Completed)
                | (Guidance, ServiceRouting)
                | (Guidance, Completed)
                | (ServiceRouting, Completed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConversationPhase::*;
        match self {
            Initial => vec![Gathering, Completed],
            Gathering => vec![Guidance, Completed],
            Guidance => vec![ServiceRouting, Completed],
            ServiceRouting => vec![Completed],
            Completed => vec![],
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod definition {
        use super::*;

        #[test]
        fn default_is_initial() {
            assert_eq!(ConversationPhase::default(), ConversationPhase::Initial);
        }

        #[test]
        fn serializes_to_snake_case() {
            let json = serde_json::to_string(&ConversationPhase::ServiceRouting).unwrap();
            assert_eq!(json, "\"service_routing\"");
        }

        #[test]
        fn only_completed_rejects_input() {
            assert!(ConversationPhase::Initial.accepts_input());
            assert!(ConversationPhase::Guidance.accepts_input());
            assert!(!ConversationPhase::Completed.accepts_input());
        }
    }

    mod transitions {
        use super::*;

        #[test]
        fn happy_path() {
            let phase = ConversationPhase::Initial
                .transition_to(ConversationPhase::Gathering)
                .and_then(|p| p.transition_to(ConversationPhase::Guidance))
                .and_then(|p| p.transition_to(ConversationPhase::ServiceRouting))
                .and_then(|p| p.transition_to(ConversationPhase::Completed));
            assert_eq!(phase, Ok(ConversationPhase::Completed));
        }

        #[test]
        fn emergency_escape_from_every_open_phase() {
            for phase in [
                ConversationPhase::Initial,
                ConversationPhase::Gathering,
                ConversationPhase::Guidance,
                ConversationPhase::ServiceRouting,
            ] {
                assert!(phase.can_transition_to(&ConversationPhase::Completed));
            }
        }

        #[test]
        fn no_backward_edges() {
            assert!(!ConversationPhase::Gathering.can_transition_to(&ConversationPhase::Initial));
            assert!(!ConversationPhase::Guidance.can_transition_to(&ConversationPhase::Gathering));
            assert!(!ConversationPhase::Initial.can_transition_to(&ConversationPhase::Guidance));
        }

        #[test]
        fn completed_is_terminal() {
            assert!(ConversationPhase::Completed.is_terminal());
            assert!(ConversationPhase::Completed.valid_transitions().is_empty());
            assert!(ConversationPhase::Completed
                .transition_to(ConversationPhase::Gathering)
                .is_err());
        }

        #[test]
        fn valid_transitions_agree_with_can_transition() {
            use ConversationPhase::*;
            for from in [Initial, Gathering, Guidance, ServiceRouting, Completed] {
                for to in from.valid_transitions() {
                    assert!(from.can_transition_to(&to));
                }
            }
        }
    }
}
