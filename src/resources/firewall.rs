// Copyright (c) 2026 - Soldr Project Developers
//! Firewall Rule Specification

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{NetworkSpec, ResourceRef};
use crate::domain::{CidrBlock, Port, Protocol, ResourceName};

/// Traffic direction a firewall rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Ingress,
    Egress,
}

/// One allowed (protocol, ports) pair
///
/// Ports are kept in a sorted set so rule comparison is order-insensitive
/// and duplicates collapse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallAllow {
    /// Protocol the rule allows
    pub protocol: Protocol,

    /// Ports opened for that protocol
    pub ports: BTreeSet<Port>,
}

impl FirewallAllow {
    /// Allow the given TCP ports
    pub fn tcp(ports: impl IntoIterator<Item = Port>) -> Self {
        Self {
            protocol: Protocol::Tcp,
            ports: ports.into_iter().collect(),
        }
    }

    /// Check whether a port is allowed by this entry
    pub fn allows_port(&self, port: Port) -> bool {
        self.ports.contains(&port)
    }
}

/// Desired state of a firewall rule attached to a network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallSpec {
    /// Rule name
    pub name: ResourceName,

    /// Parent network the rule applies to
    pub network: ResourceRef<NetworkSpec>,

    /// Allowed protocol/port pairs
    pub allows: Vec<FirewallAllow>,

    /// Direction of traffic the rule matches
    pub direction: Direction,

    /// Source ranges the rule accepts traffic from
    pub source_ranges: Vec<CidrBlock>,

    /// Instance tags this rule targets
    pub target_tags: Vec<String>,
}

impl FirewallSpec {
    /// Create an ingress rule open to the world for the given tags
    pub fn ingress(
        name: ResourceName,
        network: ResourceRef<NetworkSpec>,
        allows: Vec<FirewallAllow>,
        target_tags: Vec<String>,
    ) -> Self {
        Self {
            name,
            network,
            allows,
            direction: Direction::Ingress,
            source_ranges: vec![CidrBlock::any_ipv4()],
            target_tags,
        }
    }

    /// Check whether any allow entry opens the given port
    pub fn allows_port(&self, port: Port) -> bool {
        self.allows.iter().any(|allow| allow.allows_port(port))
    }
}
