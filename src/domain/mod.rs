// Copyright (c) 2026 - Soldr Project Developers
//! Provisioning Domain Value Objects
//!
//! Validated value objects used throughout the resource graph:
//!
//! - [`CidrBlock`] - IPv4/IPv6 address range in CIDR notation
//! - [`ResourceName`] - cloud resource naming rules
//! - [`Port`] - TCP/UDP port (1-65535)
//! - [`Protocol`] - firewall protocol taxonomy
//!
//! Invalid values are rejected at construction so the graph builder never
//! has to re-validate raw strings downstream.

pub mod cidr;
pub mod name;
pub mod port;

pub use cidr::{CidrBlock, CidrError};
pub use name::{NameError, ResourceName};
pub use port::{Port, PortError, Protocol};
