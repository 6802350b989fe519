// Copyright (c) 2026 - Soldr Project Developers
//! Error types for provisioning operations

use thiserror::Error;

use crate::domain::{CidrError, NameError, PortError};
use crate::graph::GraphError;
use crate::output::OutputError;
use crate::state_machine::TransitionError;

/// Errors that can occur while declaring or converging a resource graph
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Configuration error (bad override, unparseable value)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid resource name
    #[error("Invalid resource name: {0}")]
    InvalidName(#[from] NameError),

    /// Invalid CIDR block
    #[error("Invalid CIDR block: {0}")]
    InvalidCidr(#[from] CidrError),

    /// Invalid port
    #[error("Invalid port: {0}")]
    InvalidPort(#[from] PortError),

    /// Graph declaration error
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// The engine failed to realize a resource
    #[error("Failed to realize {resource}: {reason}")]
    Realization { resource: String, reason: String },

    /// A resource was scheduled before one of its dependencies was realized
    #[error("Dependency of {resource} not realized: {dependency}")]
    MissingDependency {
        resource: String,
        dependency: String,
    },

    /// Derived output error
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// Observed engine signal did not fit the realization lifecycle
    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] TransitionError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for provisioning operations
pub type ProvisionResult<T> = Result<T, ProvisionError>;

impl From<serde_json::Error> for ProvisionError {
    fn from(err: serde_json::Error) -> Self {
        ProvisionError::Serialization(err.to_string())
    }
}
