// Copyright (c) 2026 - Soldr Project Developers
//! Subnet Specification

use serde::{Deserialize, Serialize};

use super::{NetworkSpec, ResourceRef};
use crate::domain::{CidrBlock, ResourceName};

/// Desired state of a subnet carved out of a declared network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetSpec {
    /// Subnet name
    pub name: ResourceName,

    /// Address range allocated to this subnet
    pub ip_cidr_range: CidrBlock,

    /// Parent network; the subnet is created after it
    pub network: ResourceRef<NetworkSpec>,
}

impl SubnetSpec {
    /// Create a subnet spec on the given network
    pub fn new(name: ResourceName, ip_cidr_range: CidrBlock, network: ResourceRef<NetworkSpec>) -> Self {
        Self {
            name,
            ip_cidr_range,
            network,
        }
    }
}
