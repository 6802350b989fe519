// Copyright (c) 2026 - Soldr Project Developers
//! Port and Protocol Value Objects

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Port validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PortError {
    #[error("Invalid port: 0 (must be 1-65535)")]
    Zero,
}

/// TCP/UDP port value object
///
/// Invariants:
/// - Port must be 1-65535 (0 is reserved)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// Standard SSH port, always opened for the benchmark instance
    pub const SSH: Port = Port(22);

    /// Default port the benchmarked service listens on
    pub const SERVICE_DEFAULT: Port = Port(3000);

    /// Create a new port with validation
    pub fn new(port: u16) -> Result<Self, PortError> {
        if port == 0 {
            return Err(PortError::Zero);
        }
        Ok(Self(port))
    }

    /// Get the port value
    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Port> for u16 {
    fn from(value: Port) -> Self {
        value.0
    }
}

/// Firewall protocol taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
            Protocol::Udp => write!(f, "udp"),
            Protocol::Icmp => write!(f, "icmp"),
        }
    }
}
