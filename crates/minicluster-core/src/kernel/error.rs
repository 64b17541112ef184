//! # minicluster Kernel Errors
//!
//! Defines the umbrella [`Error`] for structural failures: problems with the
//! registry, the dependency graph or the configuration source that make a
//! whole batch meaningless. Per-component operational failures are not
//! represented here; they travel as data inside
//! [`Outcomes`](crate::orchestrator::Outcomes).
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::component::error::ComponentSystemError;
use crate::config::error::ConfigError;
use crate::dependency::error::ResolutionError;

#[derive(Debug, ThisError)]
pub enum Error {
    /// Registry construction or lookup error
    #[error("Component system error: {0}")]
    ComponentSystem(#[from] ComponentSystemError),

    /// Start order could not be computed
    #[error("Dependency resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    /// Configuration source could not be loaded or parsed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}
