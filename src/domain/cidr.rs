// Copyright (c) 2026 - Soldr Project Developers
//! CIDR Block Value Object with Validation Invariants

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use thiserror::Error;

/// CIDR validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CidrError {
    #[error("Invalid IP address format: {0}")]
    InvalidIpAddress(String),

    #[error("Missing prefix length in CIDR notation: {0}")]
    MissingPrefix(String),

    #[error("Invalid CIDR notation: {0}")]
    InvalidNotation(String),

    #[error("Invalid prefix length: {0} (must be 0-32 for IPv4, 0-128 for IPv6)")]
    InvalidPrefixLength(u8),
}

/// Address range in CIDR notation value object
///
/// Represents an IPv4 or IPv6 range such as `10.0.1.0/24`.
/// Invariants:
/// - Valid IP address format
/// - Prefix length present and within range for the IP version
///
/// # Examples
///
/// ```rust
/// use soldr_provision::domain::CidrBlock;
///
/// let range = CidrBlock::new("10.0.1.0/24").unwrap();
/// assert_eq!(range.address().to_string(), "10.0.1.0");
/// assert_eq!(range.prefix_length(), 24);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CidrBlock {
    address: IpAddr,
    prefix_length: u8,
}

impl CidrBlock {
    /// The unrestricted IPv4 range
    pub const ANY_IPV4: &'static str = "0.0.0.0/0";

    /// Create a new CIDR block with validation
    ///
    /// # Invariants
    /// - Valid IP address format
    /// - Prefix length 0-32 for IPv4, 0-128 for IPv6
    pub fn new(cidr: impl AsRef<str>) -> Result<Self, CidrError> {
        let cidr = cidr.as_ref();

        let (addr_str, prefix_str) = cidr
            .split_once('/')
            .ok_or_else(|| CidrError::MissingPrefix(cidr.to_string()))?;

        let address = IpAddr::from_str(addr_str)
            .map_err(|_| CidrError::InvalidIpAddress(addr_str.to_string()))?;

        let prefix_length = prefix_str
            .parse::<u8>()
            .map_err(|_| CidrError::InvalidNotation(cidr.to_string()))?;

        // Invariant: prefix length bounded by IP version
        let max_prefix = match address {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };

        if prefix_length > max_prefix {
            return Err(CidrError::InvalidPrefixLength(prefix_length));
        }

        Ok(Self {
            address,
            prefix_length,
        })
    }

    /// The unrestricted IPv4 source range (`0.0.0.0/0`)
    pub fn any_ipv4() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            prefix_length: 0,
        }
    }

    /// Get the base address
    pub fn address(&self) -> IpAddr {
        self.address
    }

    /// Get the prefix length
    pub fn prefix_length(&self) -> u8 {
        self.prefix_length
    }

    /// Check if this is an IPv4 range
    pub fn is_ipv4(&self) -> bool {
        matches!(self.address, IpAddr::V4(_))
    }

    /// Get as CIDR notation string
    pub fn as_cidr(&self) -> String {
        format!("{}/{}", self.address, self.prefix_length)
    }
}

impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_cidr())
    }
}

impl FromStr for CidrBlock {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CidrBlock {
    type Error = CidrError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CidrBlock> for String {
    fn from(value: CidrBlock) -> Self {
        value.as_cidr()
    }
}
