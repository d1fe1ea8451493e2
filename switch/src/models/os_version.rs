//! Dotted numeric OS version parsing and ordering

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error raised when an OS version string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("empty version string")]
    Empty,

    #[error("invalid version component '{0}'")]
    InvalidComponent(String),
}

/// A dotted numeric OS version such as `17.5` or `14.2.1`
///
/// Ordering is numeric per component, so `9.0` sorts before `10.0` and a
/// shorter version sorts before a longer one sharing its components
/// (`14.2` < `14.2.1`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct OsVersion {
    components: Vec<u32>,
}

impl FromStr for OsVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(VersionError::Empty);
        }

        let mut components = Vec::new();
        for part in trimmed.split('.') {
            let value: u32 = part
                .parse()
                .map_err(|_| VersionError::InvalidComponent(part.to_string()))?;
            components.push(value);
        }

        Ok(Self { components })
    }
}

impl fmt::Display for OsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.components.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}
