// Copyright (c) 2026 - Soldr Project Developers
//! Benchmark Stack Declaration
//!
//! Declares the fixed four-node topology the soldr benchmark runs
//! against: one network, one subnet, one firewall rule, one compute
//! instance. The firewall rule always opens SSH plus the configured
//! service port, the instance carries the same tag the rule targets,
//! and the instance is explicitly ordered after the firewall rule so
//! inbound access is open by the time the startup script runs.
//!
//! The instance's public address only exists after convergence, so the
//! stack exposes it as derived outputs: `name`, `ip`, and
//! `url = http://{ip}:{service_port}`.

use crate::config::StackConfig;
use crate::domain::{CidrBlock, Port, ResourceName};
use crate::engine::{Deployment, RealizedInstance};
use crate::errors::ProvisionResult;
use crate::graph::{ResourceGraph, ResourceOptions};
use crate::output::{Exports, Output, OutputError};
use crate::resources::{
    BootDiskSpec, FirewallAllow, FirewallSpec, InstanceSpec, NetworkInterfaceSpec, NetworkSpec,
    ResourceRef, SubnetSpec,
};

/// Address range of the benchmark subnet
pub const DEFAULT_SUBNET_CIDR: &str = "10.0.1.0/24";

/// Fixed name of the benchmark service instance
///
/// Independent of the configurable instance tag; overriding the tag
/// never renames the node.
pub const SERVICE_NAME: &str = "soldr-service";

/// OAuth scope granted to the instance's service account
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

// Opaque provisioning payload; runs once on first boot.
const SERVICE_STARTUP_SCRIPT: &str = r#"#!/bin/bash
apt update && apt install -y git build-essential pkg-config libssl-dev
curl https://sh.rustup.rs -sSf | sh -s -- -y
source "$HOME/.cargo/env"
git clone https://github.com/hjr3/soldr.git
"#;

/// The declared benchmark stack: graph plus typed handles to its nodes
pub struct BenchStack {
    graph: ResourceGraph,
    network: ResourceRef<NetworkSpec>,
    subnet: ResourceRef<SubnetSpec>,
    firewall: ResourceRef<FirewallSpec>,
    instance: ResourceRef<InstanceSpec>,
    service_port: Port,
}

impl BenchStack {
    /// Declare the benchmark resource graph from a configuration bundle
    ///
    /// Declaration order doubles as dependency order: network first,
    /// then subnet and firewall (both reference the network), then the
    /// instance with an explicit `depends_on` the firewall rule.
    pub fn declare(config: &StackConfig) -> ProvisionResult<Self> {
        let mut graph = ResourceGraph::new();

        let network = graph.add_network(NetworkSpec::new(ResourceName::new("network")?))?;

        let subnet = graph.add_subnet(SubnetSpec::new(
            ResourceName::new("subnet")?,
            CidrBlock::new(DEFAULT_SUBNET_CIDR)?,
            network,
        ))?;

        // Network tags follow the same naming rules as resources, so a
        // bad override is caught here rather than at convergence.
        let tag = ResourceName::new(config.instance_tag.as_str())?;

        // SSH stays open regardless of overrides; the service port is
        // added alongside it (the set collapses them when equal).
        let firewall = graph.add_firewall(FirewallSpec::ingress(
            ResourceName::new("firewall")?,
            network,
            vec![FirewallAllow::tcp([Port::SSH, config.service_port])],
            vec![tag.to_string()],
        ))?;

        let instance = graph.add_instance(
            InstanceSpec::builder(
                ResourceName::new(SERVICE_NAME)?,
                config.machine_type.as_str(),
            )
            .boot_disk(BootDiskSpec::ssd(config.os_image.as_str()))
            .network_interface(NetworkInterfaceSpec::with_public_address(network, subnet))
            .service_account_scope(CLOUD_PLATFORM_SCOPE)
            .allow_stopping_for_update(true)
            .tag(tag.as_str())
            .startup_script(SERVICE_STARTUP_SCRIPT)
            .build(),
            ResourceOptions::depends_on(firewall),
        )?;

        Ok(Self {
            graph,
            network,
            subnet,
            firewall,
            instance,
            service_port: config.service_port,
        })
    }

    /// The declared graph
    pub fn graph(&self) -> &ResourceGraph {
        &self.graph
    }

    /// Handle to the declared network
    pub fn network(&self) -> ResourceRef<NetworkSpec> {
        self.network
    }

    /// Handle to the declared subnet
    pub fn subnet(&self) -> ResourceRef<SubnetSpec> {
        self.subnet
    }

    /// Handle to the declared firewall rule
    pub fn firewall(&self) -> ResourceRef<FirewallSpec> {
        self.firewall
    }

    /// Handle to the declared instance
    pub fn instance(&self) -> ResourceRef<InstanceSpec> {
        self.instance
    }

    /// Bind the stack's derived outputs to a deployment of its graph
    pub fn bind_outputs(&self, deployment: &Deployment) -> StackOutputs {
        let instance = deployment.instance_output(&self.instance);

        let name = instance.map(|instance| instance.name);
        let ip = instance.apply(|instance| public_ip(&instance));
        let port = self.service_port;
        let url = ip.map(move |ip| service_url(&ip, port));

        StackOutputs { name, ip, url }
    }
}

/// Derived outputs of a benchmark stack deployment
pub struct StackOutputs {
    /// Realized instance identifier
    pub name: Output<String>,

    /// Assigned public address
    pub ip: Output<String>,

    /// Benchmark target URL, `http://{ip}:{service_port}`
    pub url: Output<String>,
}

impl StackOutputs {
    /// Package the outputs for the export sink
    pub fn exports(&self) -> Exports {
        let mut exports = Exports::new();
        exports.export("name", self.name.clone());
        exports.export("ip", self.ip.clone());
        exports.export("url", self.url.clone());
        exports
    }
}

/// Project the public address out of a realized instance
///
/// Follows `network_interfaces[0].access_configs[0].nat_ip`. A missing
/// interface, access config, or address is a configuration error and
/// fails the projection; it never falls back to a default address.
pub fn public_ip(instance: &RealizedInstance) -> Result<String, OutputError> {
    let interface = instance.network_interfaces.first().ok_or_else(|| {
        OutputError::Projection(format!("instance {} has no network interfaces", instance.name))
    })?;

    let access_config = interface.access_configs.first().ok_or_else(|| {
        OutputError::Projection(format!("instance {} has no access config", instance.name))
    })?;

    access_config.nat_ip.clone().ok_or_else(|| {
        OutputError::Projection(format!("instance {} has no public address", instance.name))
    })
}

/// Format the benchmark target URL for an address and port
pub fn service_url(ip: &str, port: Port) -> String {
    format!("http://{ip}:{port}")
}
