// Copyright (c) 2026 - Soldr Project Developers
//! Convergence Engine Seam and Deployment Driver
//!
//! The [`ConvergenceEngine`] trait is the boundary between this crate's
//! declarative graph and whatever actually creates infrastructure. A
//! [`Deployment`] walks the graph in topological order, asks the engine
//! to realize one node at a time, tracks each node through the
//! realization lifecycle, and settles the per-node [`Output`]s as
//! realized state becomes available.
//!
//! Convergence semantics stay with the engine: no retries, no diffing,
//! and no partial-failure recovery happen here. The first realization
//! failure aborts the run and fails every still-pending output.
//!
//! [`SimulatedEngine`] is the in-process implementation used by tests
//! and the preview binary; it allocates deterministic addresses instead
//! of talking to a cloud API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use tracing::{debug, error, info};

use crate::domain::CidrBlock;
use crate::errors::{ProvisionError, ProvisionResult};
use crate::graph::{ResourceGraph, ResourceNode, ResourceSpec};
use crate::output::{Output, OutputError, OutputResolver};
use crate::resources::{InstanceSpec, NodeId, ResourceKind, ResourceRef};
use crate::state_machine::{EngineSignal, RealizationState, StateMachine};

/// Realized state of a network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealizedNetwork {
    pub name: String,
    pub self_link: String,
}

/// Realized state of a subnet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealizedSubnet {
    pub name: String,
    pub self_link: String,
    pub ip_cidr_range: String,
    pub network: String,
}

/// Realized state of a firewall rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealizedFirewall {
    pub name: String,
    pub network: String,
}

/// Public address assignment on a realized interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Assigned public address, if the provider granted one
    pub nat_ip: Option<String>,
}

/// Realized network interface of an instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub network: String,
    pub subnetwork: String,
    pub internal_ip: String,
    pub access_configs: Vec<AccessConfig>,
}

/// Realized state of a compute instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealizedInstance {
    pub name: String,
    pub network_interfaces: Vec<NetworkInterface>,
}

/// Realized state of any resource kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RealizedResource {
    Network(RealizedNetwork),
    Subnet(RealizedSubnet),
    Firewall(RealizedFirewall),
    Instance(RealizedInstance),
}

impl RealizedResource {
    /// Kind of the realized resource
    pub fn kind(&self) -> ResourceKind {
        match self {
            RealizedResource::Network(_) => ResourceKind::Network,
            RealizedResource::Subnet(_) => ResourceKind::Subnet,
            RealizedResource::Firewall(_) => ResourceKind::Firewall,
            RealizedResource::Instance(_) => ResourceKind::Instance,
        }
    }

    /// Name of the realized resource
    pub fn name(&self) -> &str {
        match self {
            RealizedResource::Network(r) => &r.name,
            RealizedResource::Subnet(r) => &r.name,
            RealizedResource::Firewall(r) => &r.name,
            RealizedResource::Instance(r) => &r.name,
        }
    }
}

/// A realized resource plus when the engine reported it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealizedRecord {
    pub resource: RealizedResource,
    pub realized_at: DateTime<Utc>,
}

impl RealizedRecord {
    fn new(resource: RealizedResource) -> Self {
        Self {
            resource,
            realized_at: Utc::now(),
        }
    }
}

/// Realized state of a (partially) converged graph, keyed by node
#[derive(Debug, Clone, Default)]
pub struct RealizedSet {
    records: HashMap<NodeId, RealizedRecord>,
}

impl RealizedSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, id: NodeId, resource: RealizedResource) {
        self.records.insert(id, RealizedRecord::new(resource));
    }

    /// Whether the node has been realized
    pub fn contains(&self, id: NodeId) -> bool {
        self.records.contains_key(&id)
    }

    /// Get the record for a node
    pub fn get(&self, id: NodeId) -> Option<&RealizedRecord> {
        self.records.get(&id)
    }

    /// Realized network behind a node, if it is one
    pub fn network(&self, id: NodeId) -> Option<&RealizedNetwork> {
        match self.records.get(&id).map(|r| &r.resource) {
            Some(RealizedResource::Network(network)) => Some(network),
            _ => None,
        }
    }

    /// Realized subnet behind a node, if it is one
    pub fn subnet(&self, id: NodeId) -> Option<&RealizedSubnet> {
        match self.records.get(&id).map(|r| &r.resource) {
            Some(RealizedResource::Subnet(subnet)) => Some(subnet),
            _ => None,
        }
    }

    /// Realized instance behind a node, if it is one
    pub fn instance(&self, id: NodeId) -> Option<&RealizedInstance> {
        match self.records.get(&id).map(|r| &r.resource) {
            Some(RealizedResource::Instance(instance)) => Some(instance),
            _ => None,
        }
    }

    /// Number of realized resources
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been realized
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Boundary to the system that diffs desired state against real
/// infrastructure and applies changes
#[async_trait]
pub trait ConvergenceEngine: Send + Sync {
    /// Realize one node, given the realized state of its dependencies
    async fn realize(
        &self,
        node: &ResourceNode,
        realized: &RealizedSet,
    ) -> ProvisionResult<RealizedResource>;
}

struct OutputSlot {
    resolver: Option<OutputResolver<RealizedResource>>,
    output: Output<RealizedResource>,
}

/// Drives a resource graph through an engine
///
/// Outputs must be bound before [`Deployment::run`] consumes the
/// deployment; they resolve as the run progresses.
pub struct Deployment {
    graph: ResourceGraph,
    slots: HashMap<NodeId, OutputSlot>,
}

impl Deployment {
    /// Prepare a deployment for the given graph
    pub fn new(graph: ResourceGraph) -> Self {
        let mut slots = HashMap::new();
        for node in graph.nodes() {
            let (resolver, output) = Output::pending();
            slots.insert(
                node.id,
                OutputSlot {
                    resolver: Some(resolver),
                    output,
                },
            );
        }
        Self { graph, slots }
    }

    /// The graph this deployment will converge
    pub fn graph(&self) -> &ResourceGraph {
        &self.graph
    }

    /// Output carrying the realized state of a node
    pub fn output_of(&self, id: NodeId) -> Option<Output<RealizedResource>> {
        self.slots.get(&id).map(|slot| slot.output.clone())
    }

    /// Output carrying the realized state of a declared instance
    pub fn instance_output(&self, instance: &ResourceRef<InstanceSpec>) -> Output<RealizedInstance> {
        match self.output_of(instance.node_id()) {
            Some(output) => output.apply(|resource| match resource {
                RealizedResource::Instance(instance) => Ok(instance),
                other => Err(OutputError::Projection(format!(
                    "expected instance, got {}",
                    other.kind()
                ))),
            }),
            None => Output::failed(OutputError::Unresolved),
        }
    }

    /// Converge the graph, resolving outputs along the way
    ///
    /// Nodes are realized one at a time in topological order. The first
    /// failure aborts the run: the failed node's output and every
    /// still-pending output are failed, and the error is returned.
    pub async fn run<E>(mut self, engine: &E) -> ProvisionResult<RealizedSet>
    where
        E: ConvergenceEngine + ?Sized,
    {
        let mut realized = RealizedSet::new();

        for id in self.graph.topological_order() {
            let node = self.graph.node(id)?.clone();
            let name = node.spec.name().to_string();

            for dep in node.dependencies() {
                if !realized.contains(dep) {
                    let dependency = self
                        .graph
                        .node(dep)
                        .map(|n| n.spec.name().to_string())
                        .unwrap_or_else(|_| dep.to_string());
                    self.fail_pending(&name);
                    return Err(ProvisionError::MissingDependency {
                        resource: name,
                        dependency,
                    });
                }
            }

            let state = RealizationState::Pending.transition(&EngineSignal::Schedule)?;
            debug!(resource = %name, kind = %node.spec.kind(), state = %state, "realizing resource");

            match engine.realize(&node, &realized).await {
                Ok(resource) => {
                    let state = state.transition(&EngineSignal::Materialized)?;
                    info!(resource = %name, kind = %node.spec.kind(), state = %state, "resource realized");

                    realized.insert(id, resource.clone());
                    if let Some(resolver) = self.take_resolver(id) {
                        resolver.resolve(resource);
                    }
                }
                Err(err) => {
                    let state = state.transition(&EngineSignal::Errored)?;
                    error!(resource = %name, state = %state, error = %err, "resource realization failed");

                    let reason = err.to_string();
                    self.fail_pending(&name);
                    return Err(ProvisionError::Realization {
                        resource: name,
                        reason,
                    });
                }
            }
        }

        Ok(realized)
    }

    fn take_resolver(&mut self, id: NodeId) -> Option<OutputResolver<RealizedResource>> {
        self.slots.get_mut(&id).and_then(|slot| slot.resolver.take())
    }

    fn fail_pending(&mut self, failed: &str) {
        for slot in self.slots.values_mut() {
            if let Some(resolver) = slot.resolver.take() {
                resolver.fail(OutputError::UpstreamFailed(failed.to_string()));
            }
        }
    }
}

/// Deterministic in-process engine for tests and previews
///
/// Allocates internal addresses from the subnet range and public
/// addresses from a fixed documentation block, in declaration order.
pub struct SimulatedEngine {
    project: String,
    assign_public_ips: bool,
    next_host: AtomicU16,
}

impl SimulatedEngine {
    /// Create an engine scoped to a project name
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            assign_public_ips: true,
            next_host: AtomicU16::new(2),
        }
    }

    /// Realize instances without assigning public addresses
    ///
    /// Models a provider that leaves requested access configs without a
    /// NAT address, which must surface as a projection failure.
    pub fn without_public_ips(mut self) -> Self {
        self.assign_public_ips = false;
        self
    }

    fn self_link(&self, collection: &str, name: &str) -> String {
        format!("projects/{}/global/{}/{}", self.project, collection, name)
    }

    fn next_host(&self) -> u16 {
        // Stay inside a /24 host range
        self.next_host.fetch_add(1, Ordering::Relaxed) % 250
    }

    fn host_address(cidr: &str, host: u16) -> String {
        match CidrBlock::new(cidr).map(|range| range.address()) {
            Ok(IpAddr::V4(base)) => {
                let octets = base.octets();
                format!("{}.{}.{}.{}", octets[0], octets[1], octets[2], host)
            }
            Ok(IpAddr::V6(base)) => format!("{base}:{host:x}"),
            Err(_) => format!("10.0.0.{host}"),
        }
    }
}

#[async_trait]
impl ConvergenceEngine for SimulatedEngine {
    async fn realize(
        &self,
        node: &ResourceNode,
        realized: &RealizedSet,
    ) -> ProvisionResult<RealizedResource> {
        let missing_dep = |dependency: &str| ProvisionError::MissingDependency {
            resource: node.spec.name().to_string(),
            dependency: dependency.to_string(),
        };

        match &node.spec {
            ResourceSpec::Network(spec) => Ok(RealizedResource::Network(RealizedNetwork {
                name: spec.name.to_string(),
                self_link: self.self_link("networks", spec.name.as_str()),
            })),

            ResourceSpec::Subnet(spec) => {
                let network = realized
                    .network(spec.network.node_id())
                    .ok_or_else(|| missing_dep("network"))?;
                Ok(RealizedResource::Subnet(RealizedSubnet {
                    name: spec.name.to_string(),
                    self_link: self.self_link("subnetworks", spec.name.as_str()),
                    ip_cidr_range: spec.ip_cidr_range.as_cidr(),
                    network: network.self_link.clone(),
                }))
            }

            ResourceSpec::Firewall(spec) => {
                let network = realized
                    .network(spec.network.node_id())
                    .ok_or_else(|| missing_dep("network"))?;
                Ok(RealizedResource::Firewall(RealizedFirewall {
                    name: spec.name.to_string(),
                    network: network.self_link.clone(),
                }))
            }

            ResourceSpec::Instance(spec) => {
                let mut interfaces = Vec::with_capacity(spec.network_interfaces.len());
                for nic in &spec.network_interfaces {
                    let network = realized
                        .network(nic.network.node_id())
                        .ok_or_else(|| missing_dep("network"))?;
                    let subnet = realized
                        .subnet(nic.subnetwork.node_id())
                        .ok_or_else(|| missing_dep("subnetwork"))?;

                    let host = self.next_host();
                    let access_configs = nic
                        .access_configs
                        .iter()
                        .map(|_| AccessConfig {
                            nat_ip: self
                                .assign_public_ips
                                .then(|| format!("203.0.113.{host}")),
                        })
                        .collect();

                    interfaces.push(NetworkInterface {
                        network: network.self_link.clone(),
                        subnetwork: subnet.self_link.clone(),
                        internal_ip: Self::host_address(&subnet.ip_cidr_range, host),
                        access_configs,
                    });
                }

                Ok(RealizedResource::Instance(RealizedInstance {
                    name: spec.name.to_string(),
                    network_interfaces: interfaces,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Port, ResourceName};
    use crate::graph::ResourceOptions;
    use crate::resources::{FirewallAllow, FirewallSpec, NetworkInterfaceSpec, NetworkSpec, SubnetSpec};

    fn name(s: &str) -> ResourceName {
        ResourceName::new(s).unwrap()
    }

    fn sample_graph() -> (ResourceGraph, ResourceRef<InstanceSpec>) {
        let mut graph = ResourceGraph::new();
        let network = graph.add_network(NetworkSpec::new(name("network"))).unwrap();
        let subnet = graph
            .add_subnet(SubnetSpec::new(
                name("subnet"),
                CidrBlock::new("10.0.1.0/24").unwrap(),
                network,
            ))
            .unwrap();
        let firewall = graph
            .add_firewall(FirewallSpec::ingress(
                name("firewall"),
                network,
                vec![FirewallAllow::tcp([Port::SSH, Port::SERVICE_DEFAULT])],
                vec!["soldr-service".to_string()],
            ))
            .unwrap();
        let instance = graph
            .add_instance(
                InstanceSpec::builder(name("soldr-service"), "n1-standard-1")
                    .network_interface(NetworkInterfaceSpec::with_public_address(network, subnet))
                    .build(),
                ResourceOptions::depends_on(firewall),
            )
            .unwrap();
        (graph, instance)
    }

    #[tokio::test]
    async fn test_run_realizes_all_nodes() {
        let (graph, instance) = sample_graph();
        let deployment = Deployment::new(graph);
        let output = deployment.instance_output(&instance);

        let engine = SimulatedEngine::new("test");
        let realized = deployment.run(&engine).await.unwrap();

        assert_eq!(realized.len(), 4);
        let instance = output.get().await.unwrap();
        assert_eq!(instance.name, "soldr-service");
        assert_eq!(instance.network_interfaces.len(), 1);
        let nat_ip = instance.network_interfaces[0].access_configs[0]
            .nat_ip
            .as_deref()
            .unwrap();
        assert!(nat_ip.starts_with("203.0.113."));
    }

    #[tokio::test]
    async fn test_internal_address_comes_from_subnet_range() {
        let (graph, instance) = sample_graph();
        let deployment = Deployment::new(graph);
        let output = deployment.instance_output(&instance);

        let engine = SimulatedEngine::new("test");
        deployment.run(&engine).await.unwrap();

        let instance = output.get().await.unwrap();
        assert!(instance.network_interfaces[0]
            .internal_ip
            .starts_with("10.0.1."));
    }

    #[tokio::test]
    async fn test_without_public_ips_leaves_nat_ip_unset() {
        let (graph, instance) = sample_graph();
        let deployment = Deployment::new(graph);
        let output = deployment.instance_output(&instance);

        let engine = SimulatedEngine::new("test").without_public_ips();
        deployment.run(&engine).await.unwrap();

        let instance = output.get().await.unwrap();
        assert_eq!(instance.network_interfaces[0].access_configs[0].nat_ip, None);
    }

    #[tokio::test]
    async fn test_failure_aborts_and_fails_pending_outputs() {
        struct FailingEngine;

        #[async_trait]
        impl ConvergenceEngine for FailingEngine {
            async fn realize(
                &self,
                node: &ResourceNode,
                _realized: &RealizedSet,
            ) -> ProvisionResult<RealizedResource> {
                Err(ProvisionError::Realization {
                    resource: node.spec.name().to_string(),
                    reason: "quota exhausted".to_string(),
                })
            }
        }

        let (graph, instance) = sample_graph();
        let deployment = Deployment::new(graph);
        let output = deployment.instance_output(&instance);

        let result = deployment.run(&FailingEngine).await;
        assert!(matches!(
            result,
            Err(ProvisionError::Realization { ref resource, .. }) if resource == "network"
        ));

        // Instance was never attempted; its output fails upstream
        assert_eq!(
            output.get().await,
            Err(OutputError::UpstreamFailed("network".to_string()))
        );
    }
}
