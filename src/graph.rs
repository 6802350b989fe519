// Copyright (c) 2026 - Soldr Project Developers
//! Desired-State Resource Graph
//!
//! An append-only collection of typed resource nodes in declaration
//! order, with dependency edges derived from two sources:
//!
//! - **Implicit**: typed references inside a spec (a subnet's parent
//!   network, an instance interface's network and subnet)
//! - **Explicit**: `depends_on` annotations in [`ResourceOptions`]
//!   (temporal ordering with no data dependency, e.g. an instance that
//!   must not boot before its firewall rule exists)
//!
//! # Invariants
//!
//! - Every reference resolves to a *previously declared* node, so the
//!   graph is acyclic by construction and declaration order is already
//!   a topological order.
//! - Node names are unique across the graph.

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::domain::ResourceName;
use crate::resources::{
    FirewallSpec, InstanceSpec, NetworkSpec, NodeId, ResourceKind, ResourceRef, SubnetSpec,
};

/// Errors raised while declaring the graph
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A spec referenced a node that has not been declared yet
    #[error("{kind} '{name}' references undeclared node {reference}")]
    UnresolvedReference {
        kind: ResourceKind,
        name: String,
        reference: NodeId,
    },

    /// Two nodes were declared with the same name
    #[error("Duplicate resource name: {0}")]
    DuplicateName(String),

    /// Lookup of a node that is not in the graph
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),
}

/// Declaration options carrying explicit ordering annotations
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourceOptions {
    /// Nodes that must be realized before this one, beyond what the
    /// spec's own references already imply
    pub depends_on: Vec<NodeId>,
}

impl ResourceOptions {
    /// Depend on a single previously declared node
    pub fn depends_on<T>(reference: ResourceRef<T>) -> Self {
        Self {
            depends_on: vec![reference.node_id()],
        }
    }
}

/// The spec payload of a declared node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceSpec {
    Network(NetworkSpec),
    Subnet(SubnetSpec),
    Firewall(FirewallSpec),
    Instance(InstanceSpec),
}

impl ResourceSpec {
    /// Resource kind of this spec
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceSpec::Network(_) => ResourceKind::Network,
            ResourceSpec::Subnet(_) => ResourceKind::Subnet,
            ResourceSpec::Firewall(_) => ResourceKind::Firewall,
            ResourceSpec::Instance(_) => ResourceKind::Instance,
        }
    }

    /// Declared name of this spec
    pub fn name(&self) -> &ResourceName {
        match self {
            ResourceSpec::Network(spec) => &spec.name,
            ResourceSpec::Subnet(spec) => &spec.name,
            ResourceSpec::Firewall(spec) => &spec.name,
            ResourceSpec::Instance(spec) => &spec.name,
        }
    }

    /// Implicit dependencies: every node this spec references
    pub fn references(&self) -> Vec<NodeId> {
        match self {
            ResourceSpec::Network(_) => Vec::new(),
            ResourceSpec::Subnet(spec) => vec![spec.network.node_id()],
            ResourceSpec::Firewall(spec) => vec![spec.network.node_id()],
            ResourceSpec::Instance(spec) => spec
                .network_interfaces
                .iter()
                .flat_map(|nic| [nic.network.node_id(), nic.subnetwork.node_id()])
                .collect(),
        }
    }
}

/// A declared node: identity, spec, and explicit ordering edges
#[derive(Debug, Clone, Serialize)]
pub struct ResourceNode {
    /// Node identity
    pub id: NodeId,

    /// Desired-state spec
    pub spec: ResourceSpec,

    /// Explicit `depends_on` edges (implicit edges live in the spec)
    pub depends_on: Vec<NodeId>,
}

impl ResourceNode {
    /// All dependencies of this node, implicit references first
    pub fn dependencies(&self) -> Vec<NodeId> {
        let mut deps = self.spec.references();
        for dep in &self.depends_on {
            if !deps.contains(dep) {
                deps.push(*dep);
            }
        }
        deps
    }
}

/// Desired-state resource graph in declaration order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourceGraph {
    nodes: Vec<ResourceNode>,
    #[serde(skip)]
    index: HashMap<NodeId, usize>,
}

impl ResourceGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a network
    pub fn add_network(&mut self, spec: NetworkSpec) -> Result<ResourceRef<NetworkSpec>, GraphError> {
        self.insert(ResourceSpec::Network(spec), ResourceOptions::default())
            .map(ResourceRef::from_node)
    }

    /// Declare a subnet on a previously declared network
    pub fn add_subnet(&mut self, spec: SubnetSpec) -> Result<ResourceRef<SubnetSpec>, GraphError> {
        self.insert(ResourceSpec::Subnet(spec), ResourceOptions::default())
            .map(ResourceRef::from_node)
    }

    /// Declare a firewall rule on a previously declared network
    pub fn add_firewall(
        &mut self,
        spec: FirewallSpec,
    ) -> Result<ResourceRef<FirewallSpec>, GraphError> {
        self.insert(ResourceSpec::Firewall(spec), ResourceOptions::default())
            .map(ResourceRef::from_node)
    }

    /// Declare a compute instance
    ///
    /// `options.depends_on` adds ordering edges on top of the implicit
    /// network/subnet references.
    pub fn add_instance(
        &mut self,
        spec: InstanceSpec,
        options: ResourceOptions,
    ) -> Result<ResourceRef<InstanceSpec>, GraphError> {
        self.insert(ResourceSpec::Instance(spec), options)
            .map(ResourceRef::from_node)
    }

    fn insert(&mut self, spec: ResourceSpec, options: ResourceOptions) -> Result<NodeId, GraphError> {
        // Invariant: names are unique
        if self
            .nodes
            .iter()
            .any(|node| node.spec.name() == spec.name())
        {
            return Err(GraphError::DuplicateName(spec.name().to_string()));
        }

        // Invariant: references resolve to previously declared nodes
        let node = ResourceNode {
            id: NodeId::new(),
            spec,
            depends_on: options.depends_on,
        };
        for dep in node.dependencies() {
            if !self.index.contains_key(&dep) {
                return Err(GraphError::UnresolvedReference {
                    kind: node.spec.kind(),
                    name: node.spec.name().to_string(),
                    reference: dep,
                });
            }
        }

        let id = node.id;
        self.index.insert(id, self.nodes.len());
        self.nodes.push(node);
        Ok(id)
    }

    /// Look up a node by identity
    pub fn node(&self, id: NodeId) -> Result<&ResourceNode, GraphError> {
        self.index
            .get(&id)
            .map(|&i| &self.nodes[i])
            .ok_or(GraphError::UnknownNode(id))
    }

    /// All nodes in declaration order
    pub fn nodes(&self) -> &[ResourceNode] {
        &self.nodes
    }

    /// All dependencies of a node (implicit and explicit)
    pub fn dependencies_of(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        self.node(id).map(ResourceNode::dependencies)
    }

    /// Topological order of the graph
    ///
    /// References only point backwards, so declaration order is a valid
    /// topological order.
    pub fn topological_order(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|node| node.id).collect()
    }

    /// Number of declared nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Count nodes of a given kind
    pub fn count_kind(&self, kind: ResourceKind) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.spec.kind() == kind)
            .count()
    }

    /// Iterate declared networks
    pub fn networks(&self) -> impl Iterator<Item = (&ResourceNode, &NetworkSpec)> {
        self.nodes.iter().filter_map(|node| match &node.spec {
            ResourceSpec::Network(spec) => Some((node, spec)),
            _ => None,
        })
    }

    /// Iterate declared subnets
    pub fn subnets(&self) -> impl Iterator<Item = (&ResourceNode, &SubnetSpec)> {
        self.nodes.iter().filter_map(|node| match &node.spec {
            ResourceSpec::Subnet(spec) => Some((node, spec)),
            _ => None,
        })
    }

    /// Iterate declared firewall rules
    pub fn firewalls(&self) -> impl Iterator<Item = (&ResourceNode, &FirewallSpec)> {
        self.nodes.iter().filter_map(|node| match &node.spec {
            ResourceSpec::Firewall(spec) => Some((node, spec)),
            _ => None,
        })
    }

    /// Iterate declared instances
    pub fn instances(&self) -> impl Iterator<Item = (&ResourceNode, &InstanceSpec)> {
        self.nodes.iter().filter_map(|node| match &node.spec {
            ResourceSpec::Instance(spec) => Some((node, spec)),
            _ => None,
        })
    }
}
