//! # minicluster Orchestrator Errors
//!
//! Per-component operational failures. These are recorded in an
//! [`Outcomes`](crate::orchestrator::Outcomes) report rather than returned as
//! the failure of a whole batch.
use std::time::Duration;

use thiserror::Error;

use crate::component::error::AdapterError;
use crate::component::id::ComponentId;
use crate::component::lifecycle::LifecycleState;
use crate::config::error::ConfigError;

#[derive(Debug, Error)]
pub enum StartError {
    #[error("Unknown component '{identity}'")]
    UnknownComponent { identity: ComponentId },

    #[error("Component '{identity}' not started: dependency '{dependency}' is {state}")]
    DependencyNotStarted {
        identity: ComponentId,
        dependency: ComponentId,
        state: LifecycleState,
    },

    #[error("Invalid configuration for component '{identity}': {source}")]
    Config {
        identity: ComponentId,
        #[source]
        source: ConfigError,
    },

    #[error("Component '{identity}' failed to start: {source}")]
    Adapter {
        identity: ComponentId,
        #[source]
        source: AdapterError,
    },

    #[error("Component '{identity}' did not start within {timeout:?}")]
    Timeout {
        identity: ComponentId,
        timeout: Duration,
    },

    #[error("Component '{identity}' cannot be started from state {state}")]
    InvalidState {
        identity: ComponentId,
        state: LifecycleState,
    },
}

impl StartError {
    pub fn identity(&self) -> &ComponentId {
        match self {
            StartError::UnknownComponent { identity }
            | StartError::DependencyNotStarted { identity, .. }
            | StartError::Config { identity, .. }
            | StartError::Adapter { identity, .. }
            | StartError::Timeout { identity, .. }
            | StartError::InvalidState { identity, .. } => identity,
        }
    }
}

#[derive(Debug, Error)]
pub enum StopError {
    #[error("Unknown component '{identity}'")]
    UnknownComponent { identity: ComponentId },

    #[error("Component '{identity}' failed to stop: {source}")]
    Adapter {
        identity: ComponentId,
        #[source]
        source: AdapterError,
    },

    #[error("Cleanup of component '{identity}' failed: {source}")]
    Cleanup {
        identity: ComponentId,
        #[source]
        source: AdapterError,
    },

    #[error("Component '{identity}' did not stop within {timeout:?}")]
    Timeout {
        identity: ComponentId,
        timeout: Duration,
    },

    #[error("Component '{identity}' cannot be stopped from state {state}")]
    InvalidState {
        identity: ComponentId,
        state: LifecycleState,
    },

    #[error("Component '{identity}' is stuck in {state}; reset it to release its resources")]
    NeedsReset {
        identity: ComponentId,
        state: LifecycleState,
    },
}

impl StopError {
    pub fn identity(&self) -> &ComponentId {
        match self {
            StopError::UnknownComponent { identity }
            | StopError::Adapter { identity, .. }
            | StopError::Cleanup { identity, .. }
            | StopError::Timeout { identity, .. }
            | StopError::InvalidState { identity, .. }
            | StopError::NeedsReset { identity, .. } => identity,
        }
    }
}
