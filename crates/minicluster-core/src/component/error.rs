//! # minicluster Component System Errors
//!
//! [`ComponentSystemError`] covers registry construction and lookup.
//! [`AdapterError`] is what a [`Bootstrap`](crate::component::Bootstrap)
//! implementation reports when its underlying service misbehaves.
//! [`InvalidTransition`] guards the lifecycle state machine.
use std::path::PathBuf;

use thiserror::Error;

use crate::component::id::ComponentId;
use crate::component::lifecycle::LifecycleState;

#[derive(Debug, Error)]
pub enum ComponentSystemError {
    #[error("Unknown component '{identity}'")]
    UnknownComponent { identity: ComponentId },

    #[error("Component '{identity}' is already registered")]
    DuplicateComponent { identity: ComponentId },

    #[error("Component '{identity}' declares a dependency on itself")]
    SelfDependency { identity: ComponentId },
}

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Missing configuration key '{0}'")]
    MissingConfig(String),

    #[error("Invalid value '{value}' for configuration key '{key}': {reason}")]
    InvalidConfig {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error during operation '{operation}' on path '{path}': {source}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Service is not running")]
    NotRunning,

    #[error("Service is already running")]
    AlreadyRunning,

    #[error("{0}")]
    Other(String),
}

impl AdapterError {
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        AdapterError::Io {
            source,
            operation: operation.into(),
            path: path.into(),
        }
    }
}

/// A lifecycle transition was requested from a state that does not allow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid lifecycle transition from {from} to {to}")]
pub struct InvalidTransition {
    pub from: LifecycleState,
    pub to: LifecycleState,
}
