// Copyright (c) 2026 - Soldr Project Developers
//! Configuration bundle for a provisioning run
//!
//! All settings are optional; absent values fall back to the documented
//! defaults. Overrides can come from the deserialized stack settings or
//! from `PROVISION_*` environment variables.

use serde::{Deserialize, Serialize};

use crate::domain::Port;
use crate::errors::{ProvisionError, ProvisionResult};

/// Configuration for the benchmark stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StackConfig {
    /// Machine class for the benchmark instance
    pub machine_type: String,

    /// Boot image for the benchmark instance
    pub os_image: String,

    /// Tag applied to the instance and targeted by the firewall rule
    pub instance_tag: String,

    /// Port the benchmarked service listens on
    pub service_port: Port,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            machine_type: "n1-standard-1".to_string(),
            os_image: "debian-12".to_string(),
            instance_tag: "soldr-service".to_string(),
            service_port: Port::SERVICE_DEFAULT,
        }
    }
}

impl StackConfig {
    /// Read configuration from `PROVISION_*` environment variables,
    /// falling back to defaults for anything unset
    pub fn from_env() -> ProvisionResult<Self> {
        let mut config = Self::default();

        if let Ok(machine_type) = std::env::var("PROVISION_MACHINE_TYPE") {
            config.machine_type = machine_type;
        }
        if let Ok(os_image) = std::env::var("PROVISION_OS_IMAGE") {
            config.os_image = os_image;
        }
        if let Ok(instance_tag) = std::env::var("PROVISION_INSTANCE_TAG") {
            config.instance_tag = instance_tag;
        }
        if let Ok(port) = std::env::var("PROVISION_SERVICE_PORT") {
            let port: u16 = port.parse().map_err(|_| {
                ProvisionError::Configuration(format!("PROVISION_SERVICE_PORT not a port: {port}"))
            })?;
            config.service_port = Port::new(port)?;
        }

        Ok(config)
    }

    /// Set the machine type
    pub fn with_machine_type(mut self, machine_type: impl Into<String>) -> Self {
        self.machine_type = machine_type.into();
        self
    }

    /// Set the OS image
    pub fn with_os_image(mut self, os_image: impl Into<String>) -> Self {
        self.os_image = os_image.into();
        self
    }

    /// Set the instance tag
    pub fn with_instance_tag(mut self, instance_tag: impl Into<String>) -> Self {
        self.instance_tag = instance_tag.into();
        self
    }

    /// Set the service port
    pub fn with_service_port(mut self, service_port: Port) -> Self {
        self.service_port = service_port;
        self
    }
}
