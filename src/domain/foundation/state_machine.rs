//! State machine trait for status enums.
//!
//! Provides a consistent interface for validating and performing state transitions
//! across lifecycle enums such as the conversation phase.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors define valid state transitions and get validated
/// transition methods for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for ConversationPhase {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         self.valid_transitions().contains(target)
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Initial => vec![Gathering, Completed],
///             Gathering => vec![Guidance, Completed],
///             // ... etc
///         }
///     }
/// }
///
/// // Usage:
/// let next = phase.transition_to(ConversationPhase::Guidance)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    ///
    /// This is the preferred way to change state, as it ensures
    /// the transition is valid according to the state machine rules.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Visit {
        Queued,
        InRoom,
        Discharged,
    }

    impl StateMachine for Visit {
        fn can_transition_to(&self, target: &Self) -> bool {
            self.valid_transitions().contains(target)
        }

        fn valid_transitions(&self) -> Vec<Self> {
            match self {
                Visit::Queued => vec![Visit::InRoom, Visit::Discharged],
                Visit::InRoom => vec![Visit::Discharged],
                Visit::Discharged => vec![],
            }
        }
    }

    #[test]
    fn listed_transition_returns_target() {
        assert_eq!(Visit::Queued.transition_to(Visit::InRoom), Ok(Visit::InRoom));
    }

    #[test]
    fn unlisted_transition_names_both_states() {
        let err = Visit::InRoom.transition_to(Visit::Queued).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("InRoom"));
        assert!(message.contains("Queued"));
    }

    #[test]
    fn state_without_exits_is_terminal() {
        assert!(Visit::Discharged.is_terminal());
        assert!(!Visit::Queued.is_terminal());
        assert!(Visit::Discharged.transition_to(Visit::Discharged).is_err());
    }
}
