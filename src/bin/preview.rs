// Copyright (c) 2026 - Soldr Project Developers
//! Preview a benchmark stack deployment against the simulated engine
//!
//! Declares the four-node graph from `PROVISION_*` environment
//! configuration, converges it in-process, and prints the exported
//! outputs. Useful for checking graph shape and output wiring without
//! touching a cloud account.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use soldr_provision::{BenchStack, Deployment, SimulatedEngine, StackConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = StackConfig::from_env()?;
    info!(
        machine_type = %config.machine_type,
        os_image = %config.os_image,
        instance_tag = %config.instance_tag,
        service_port = %config.service_port,
        "declaring benchmark stack"
    );

    let stack = BenchStack::declare(&config)?;
    let deployment = Deployment::new(stack.graph().clone());
    let outputs = stack.bind_outputs(&deployment);

    let engine = SimulatedEngine::new("preview");
    let realized = deployment.run(&engine).await?;
    info!(resources = realized.len(), "stack converged");

    for (name, value) in outputs.exports().resolve_all().await? {
        println!("{name} = {value}");
    }

    Ok(())
}
