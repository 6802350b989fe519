// Copyright (c) 2026 - Soldr Project Developers
//! Declarative resource-graph provisioning for soldr benchmark environments
//!
//! This crate models a provisioning run as a typed desired-state graph:
//! a network, a subnet, a firewall rule, and a compute instance, wired
//! together by implicit (reference) and explicit (`depends_on`) dependencies.
//! The graph is handed to a convergence engine, and values that only exist
//! after convergence (the instance's public address) are exposed as one-shot
//! asynchronously-resolved [`output::Output`]s.

pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod graph;
pub mod output;
pub mod resources;
pub mod stack;
pub mod state_machine;

// Re-export commonly used types
pub use config::StackConfig;
pub use engine::{ConvergenceEngine, Deployment, RealizedSet, SimulatedEngine};
pub use errors::{ProvisionError, ProvisionResult};
pub use graph::{GraphError, ResourceGraph, ResourceOptions};
pub use output::{Exports, Output, OutputError, OutputResolver};
pub use stack::{BenchStack, StackOutputs};
