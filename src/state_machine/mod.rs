// Copyright (c) 2026 - Soldr Project Developers
//! Finite State Machine Abstractions
//!
//! Generic state machine trait used to model the realization lifecycle.
//! Transitions are pure functions: no side effects, every valid
//! transition explicitly enumerated, invalid transitions rejected with
//! a typed error.

pub mod realization;

pub use realization::{EngineSignal, RealizationState};

/// Result of a state transition
pub type TransitionResult<S> = Result<S, TransitionError>;

/// Errors that can occur during state transitions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Transition from current state to target state is not allowed
    #[error("Invalid transition from {from} on {input}")]
    InvalidTransition { from: String, input: String },
}

/// Trait for finite state machines
///
/// Implement this trait to define a state machine with typed states
/// and inputs.
pub trait StateMachine: Sized + Clone {
    /// Input type that triggers transitions
    type Input;

    /// Attempt to transition to a new state given an input
    fn transition(&self, input: &Self::Input) -> TransitionResult<Self>;

    /// Check if a transition is valid without performing it
    fn can_transition(&self, input: &Self::Input) -> bool {
        self.transition(input).is_ok()
    }

    /// Get all valid inputs from the current state
    fn valid_inputs(&self) -> Vec<Self::Input>
    where
        Self::Input: Clone,
    {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal FSM to exercise the trait defaults
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Door {
        Open,
        Closed,
    }

    #[derive(Debug, Clone)]
    enum Push {
        Toggle,
    }

    impl StateMachine for Door {
        type Input = Push;

        fn transition(&self, input: &Self::Input) -> TransitionResult<Self> {
            match (self, input) {
                (Door::Open, Push::Toggle) => Ok(Door::Closed),
                (Door::Closed, Push::Toggle) => Ok(Door::Open),
            }
        }
    }

    #[test]
    fn test_transition_and_can_transition() {
        let door = Door::Closed;
        assert!(door.can_transition(&Push::Toggle));
        assert_eq!(door.transition(&Push::Toggle).unwrap(), Door::Open);
    }
}
