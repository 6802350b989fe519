// Copyright (c) 2026 - Soldr Project Developers
//! Realization Lifecycle State Machine
//!
//! Tracks a single resource node through the convergence engine's
//! lifecycle:
//!
//! ```text
//! Pending --Schedule--> Creating --Materialized--> Created
//!                            \
//!                             --Errored--> Failed
//! ```
//!
//! `Created` and `Failed` are terminal. The engine owns retries and
//! diffing; this machine only records the observed progression and
//! rejects impossible transitions.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{StateMachine, TransitionError, TransitionResult};

/// Lifecycle state of a resource node during convergence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RealizationState {
    /// Declared, not yet picked up by the engine
    Pending,

    /// The engine is creating the resource
    Creating,

    /// The resource exists; realized attributes are available
    Created,

    /// Creation failed (terminal)
    Failed,
}

impl RealizationState {
    /// Whether no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, RealizationState::Created | RealizationState::Failed)
    }
}

impl fmt::Display for RealizationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RealizationState::Pending => write!(f, "pending"),
            RealizationState::Creating => write!(f, "creating"),
            RealizationState::Created => write!(f, "created"),
            RealizationState::Failed => write!(f, "failed"),
        }
    }
}

/// Engine progress signal (FSM input)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineSignal {
    /// The engine picked the node up for creation
    Schedule,

    /// The resource was created and its attributes realized
    Materialized,

    /// Creation failed
    Errored,
}

impl fmt::Display for EngineSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineSignal::Schedule => write!(f, "schedule"),
            EngineSignal::Materialized => write!(f, "materialized"),
            EngineSignal::Errored => write!(f, "errored"),
        }
    }
}

impl StateMachine for RealizationState {
    type Input = EngineSignal;

    fn transition(&self, input: &Self::Input) -> TransitionResult<Self> {
        use EngineSignal::*;
        use RealizationState::*;

        match (self, input) {
            (Pending, Schedule) => Ok(Creating),
            (Creating, Materialized) => Ok(Created),
            (Creating, Errored) => Ok(Failed),
            _ => Err(TransitionError::InvalidTransition {
                from: self.to_string(),
                input: input.to_string(),
            }),
        }
    }

    fn valid_inputs(&self) -> Vec<Self::Input> {
        use EngineSignal::*;
        use RealizationState::*;

        match self {
            Pending => vec![Schedule],
            Creating => vec![Materialized, Errored],
            Created | Failed => Vec::new(),
        }
    }
}
