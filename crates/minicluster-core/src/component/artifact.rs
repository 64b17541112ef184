use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::Serialize;

use crate::config::error::ConfigError;

/// Maven-style `group:name:version` coordinates of the library backing a
/// component, as recorded under the descriptor's artifact key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub group: String,
    pub name: String,
    pub version: Version,
}

impl Artifact {
    /// Parse `value` read from configuration key `key`.
    pub fn parse(key: &str, value: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidArtifact {
            key: key.to_string(),
            value: value.to_string(),
            reason,
        };

        let parts: Vec<&str> = value.trim().split(':').collect();
        let [group, name, version] = parts.as_slice() else {
            return Err(invalid("expected 'group:name:version'".to_string()));
        };
        if group.is_empty() || name.is_empty() {
            return Err(invalid("group and name must not be empty".to_string()));
        }

        let version = parse_lenient(version).map_err(|e| invalid(e.to_string()))?;
        Ok(Self {
            group: group.to_string(),
            name: name.to_string(),
            version,
        })
    }
}

/// Artifact versions are frequently written as `3.2` or `5`; pad them out to
/// full semver before parsing.
fn parse_lenient(version: &str) -> Result<Version, semver::Error> {
    let core_len = version.find(['-', '+']).unwrap_or(version.len());
    let dots = version[..core_len].matches('.').count();
    let padded = match dots {
        0 => format!("{}.0.0{}", &version[..core_len], &version[core_len..]),
        1 => format!("{}.0{}", &version[..core_len], &version[core_len..]),
        _ => version.to_string(),
    };
    Version::parse(&padded)
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

impl FromStr for Artifact {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Artifact::parse("<inline>", s)
    }
}
