// Copyright (c) 2026 - Soldr Project Developers
//! Typed Resource Specifications
//!
//! Desired-state descriptions for the four resource kinds the stack
//! declares. Each spec is a plain serializable value; identity and
//! dependency wiring live in [`crate::graph`].
//!
//! References between resources are typed [`ResourceRef`]s, so a subnet
//! can only point at a network and an instance interface can only point
//! at a network and a subnet.

pub mod firewall;
pub mod instance;
pub mod network;
pub mod subnet;

pub use firewall::{Direction, FirewallAllow, FirewallSpec};
pub use instance::{
    AccessConfigSpec, BootDiskSpec, InstanceSpec, InstanceSpecBuilder, NetworkInterfaceSpec,
};
pub use network::NetworkSpec;
pub use subnet::SubnetSpec;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use uuid::Uuid;

/// Untyped identity of a declared graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Mint a fresh node identity
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typed handle to a declared resource node
///
/// A `ResourceRef<NetworkSpec>` can only be produced by declaring a
/// network, so holding one proves the referenced node exists and has the
/// expected kind. The phantom type is erased on the wire.
pub struct ResourceRef<T> {
    node: NodeId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ResourceRef<T> {
    /// Wrap an existing node identity
    pub(crate) fn from_node(node: NodeId) -> Self {
        Self {
            node,
            _marker: PhantomData,
        }
    }

    /// Get the underlying untyped node identity
    pub fn node_id(&self) -> NodeId {
        self.node
    }
}

// Manual impls: derives would demand `T: Clone`/`T: Copy` bounds the
// phantom parameter does not need.
impl<T> Clone for ResourceRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ResourceRef<T> {}

impl<T> PartialEq for ResourceRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<T> Eq for ResourceRef<T> {}

impl<T> Hash for ResourceRef<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.hash(state);
    }
}

impl<T> fmt::Debug for ResourceRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResourceRef").field(&self.node).finish()
    }
}

impl<T> Serialize for ResourceRef<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.node.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for ResourceRef<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        NodeId::deserialize(deserializer).map(Self::from_node)
    }
}

/// Resource taxonomy for the graph nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Network,
    Subnet,
    Firewall,
    Instance,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Network => write!(f, "network"),
            ResourceKind::Subnet => write!(f, "subnet"),
            ResourceKind::Firewall => write!(f, "firewall"),
            ResourceKind::Instance => write!(f, "instance"),
        }
    }
}
