// Copyright (c) 2026 - Soldr Project Developers
//! Compute Instance Specification

use serde::{Deserialize, Serialize};

use super::{NetworkSpec, ResourceRef, SubnetSpec};
use crate::domain::ResourceName;

/// Request for a public address on a network interface
///
/// An empty access config asks the provider to assign an ephemeral
/// public address at realization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessConfigSpec {}

/// Network interface attached to an instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterfaceSpec {
    /// Network the interface attaches to
    pub network: ResourceRef<NetworkSpec>,

    /// Subnet the interface draws its internal address from
    pub subnetwork: ResourceRef<SubnetSpec>,

    /// Access configs; one empty entry requests a public address
    pub access_configs: Vec<AccessConfigSpec>,
}

impl NetworkInterfaceSpec {
    /// Interface with one ephemeral public address
    pub fn with_public_address(
        network: ResourceRef<NetworkSpec>,
        subnetwork: ResourceRef<SubnetSpec>,
    ) -> Self {
        Self {
            network,
            subnetwork,
            access_configs: vec![AccessConfigSpec::default()],
        }
    }

    /// Private-only interface (no access config)
    pub fn private_only(
        network: ResourceRef<NetworkSpec>,
        subnetwork: ResourceRef<SubnetSpec>,
    ) -> Self {
        Self {
            network,
            subnetwork,
            access_configs: Vec::new(),
        }
    }
}

/// Boot disk parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootDiskSpec {
    /// OS image to initialize the disk from
    pub image: String,

    /// Disk type, e.g. `pd-ssd`
    pub disk_type: String,
}

impl BootDiskSpec {
    /// SSD-backed boot disk from the given image
    pub fn ssd(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            disk_type: "pd-ssd".to_string(),
        }
    }
}

/// Desired state of a compute instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSpec {
    /// Instance name
    pub name: ResourceName,

    /// Machine class, e.g. `n1-standard-1`
    pub machine_type: String,

    /// Boot disk parameters
    pub boot_disk: BootDiskSpec,

    /// Attached network interfaces
    pub network_interfaces: Vec<NetworkInterfaceSpec>,

    /// OAuth scopes granted to the instance's service account
    pub service_account_scopes: Vec<String>,

    /// Whether the engine may stop the instance to apply updates
    pub allow_stopping_for_update: bool,

    /// Network tags; firewall rules target instances by these
    pub tags: Vec<String>,

    /// Opaque shell script run on first boot
    pub metadata_startup_script: Option<String>,
}

impl InstanceSpec {
    /// Start building an instance spec
    pub fn builder(name: ResourceName, machine_type: impl Into<String>) -> InstanceSpecBuilder {
        InstanceSpecBuilder::new(name, machine_type)
    }
}

/// Builder for [`InstanceSpec`] with a fluent API
pub struct InstanceSpecBuilder {
    spec: InstanceSpec,
}

impl InstanceSpecBuilder {
    fn new(name: ResourceName, machine_type: impl Into<String>) -> Self {
        Self {
            spec: InstanceSpec {
                name,
                machine_type: machine_type.into(),
                boot_disk: BootDiskSpec::ssd("debian-12"),
                network_interfaces: Vec::new(),
                service_account_scopes: Vec::new(),
                allow_stopping_for_update: false,
                tags: Vec::new(),
                metadata_startup_script: None,
            },
        }
    }

    pub fn boot_disk(mut self, boot_disk: BootDiskSpec) -> Self {
        self.spec.boot_disk = boot_disk;
        self
    }

    pub fn network_interface(mut self, interface: NetworkInterfaceSpec) -> Self {
        self.spec.network_interfaces.push(interface);
        self
    }

    pub fn service_account_scope(mut self, scope: impl Into<String>) -> Self {
        self.spec.service_account_scopes.push(scope.into());
        self
    }

    pub fn allow_stopping_for_update(mut self, allow: bool) -> Self {
        self.spec.allow_stopping_for_update = allow;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.spec.tags.push(tag.into());
        self
    }

    pub fn startup_script(mut self, script: impl Into<String>) -> Self {
        self.spec.metadata_startup_script = Some(script.into());
        self
    }

    pub fn build(self) -> InstanceSpec {
        self.spec
    }
}
