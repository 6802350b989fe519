// Copyright (c) 2026 - Soldr Project Developers
//! Resource Name Value Object with Cloud Naming Invariants

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Resource name validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("Resource name is empty")]
    Empty,

    #[error("Resource name exceeds maximum length of 63 characters: {0}")]
    TooLong(usize),

    #[error("Resource name must start with a lowercase letter: {0}")]
    InvalidFirstCharacter(String),

    #[error("Resource name cannot end with a hyphen: {0}")]
    TrailingHyphen(String),

    #[error("Invalid character in resource name: {0}")]
    InvalidCharacter(char),
}

/// Cloud resource name value object
///
/// Follows the naming rules shared by most resource-management APIs:
/// - 1-63 characters
/// - Lowercase letters, digits, and hyphens only
/// - Must start with a letter
/// - Cannot end with a hyphen
///
/// # Examples
///
/// ```rust
/// use soldr_provision::domain::ResourceName;
///
/// let name = ResourceName::new("soldr-service").unwrap();
/// assert_eq!(name.as_str(), "soldr-service");
///
/// assert!(ResourceName::new("").is_err());
/// assert!(ResourceName::new("3network").is_err());
/// assert!(ResourceName::new("network-").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceName(String);

impl ResourceName {
    /// Maximum length for a resource name
    pub const MAX_LENGTH: usize = 63;

    /// Create a new resource name with validation
    pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();

        // Invariant 1: Non-empty
        if name.is_empty() {
            return Err(NameError::Empty);
        }

        // Invariant 2: Maximum length
        if name.len() > Self::MAX_LENGTH {
            return Err(NameError::TooLong(name.len()));
        }

        // Invariant 3: Valid characters
        for ch in name.chars() {
            if !ch.is_ascii_lowercase() && !ch.is_ascii_digit() && ch != '-' {
                return Err(NameError::InvalidCharacter(ch));
            }
        }

        // Invariant 4: Starts with a letter
        if !name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase())
        {
            return Err(NameError::InvalidFirstCharacter(name));
        }

        // Invariant 5: No trailing hyphen
        if name.ends_with('-') {
            return Err(NameError::TrailingHyphen(name));
        }

        Ok(Self(name))
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive a suffixed name, e.g. `soldr-service` → `soldr-service-fw`
    pub fn with_suffix(&self, suffix: &str) -> Result<Self, NameError> {
        Self::new(format!("{}-{}", self.0, suffix))
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ResourceName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ResourceName {
    type Error = NameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(ResourceName::new("network").is_ok());
        assert!(ResourceName::new("soldr-service").is_ok());
        assert!(ResourceName::new("a").is_ok());
        assert!(ResourceName::new("web01").is_ok());
    }

    #[test]
    fn test_invalid_names() {
        assert!(ResourceName::new("").is_err()); // Empty
        assert!(ResourceName::new("3network").is_err()); // Starts with digit
        assert!(ResourceName::new("-network").is_err()); // Starts with hyphen
        assert!(ResourceName::new("network-").is_err()); // Trailing hyphen
        assert!(ResourceName::new("Network").is_err()); // Uppercase
        assert!(ResourceName::new("net_work").is_err()); // Underscore
    }

    #[test]
    fn test_length_limit() {
        let max = format!("a{}", "b".repeat(62));
        assert!(ResourceName::new(max).is_ok());

        let too_long = format!("a{}", "b".repeat(63));
        assert!(ResourceName::new(too_long).is_err());
    }

    #[test]
    fn test_with_suffix() {
        let name = ResourceName::new("soldr-service").unwrap();
        let suffixed = name.with_suffix("fw").unwrap();
        assert_eq!(suffixed.as_str(), "soldr-service-fw");
    }

    #[test]
    fn test_display() {
        let name = ResourceName::new("subnet").unwrap();
        assert_eq!(format!("{}", name), "subnet");
    }
}
