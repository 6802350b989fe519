// Copyright (c) 2026 - Soldr Project Developers
//! Virtual Network Specification

use serde::{Deserialize, Serialize};

use crate::domain::ResourceName;

/// Desired state of an isolated virtual network
///
/// The network is the unique root of the resource graph; every other
/// node references it directly or indirectly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Network name
    pub name: ResourceName,

    /// Whether the provider should create subnets automatically.
    /// `false` means every subnet must be declared explicitly.
    pub auto_create_subnetworks: bool,
}

impl NetworkSpec {
    /// Create a network spec with explicit subnet management
    pub fn new(name: ResourceName) -> Self {
        Self {
            name,
            auto_create_subnetworks: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_disables_auto_subnets() {
        let spec = NetworkSpec::new(ResourceName::new("network").unwrap());
        assert!(!spec.auto_create_subnetworks);
        assert_eq!(spec.name.as_str(), "network");
    }
}
