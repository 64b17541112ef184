use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::component::error::AdapterError;
use crate::config::Configuration;

/// Capability interface implemented once per service kind.
///
/// An adapter is constructed by its descriptor's [`BootstrapFactory`] with
/// the instance's resolved configuration, and is owned by the orchestrator
/// from STARTING until it is back in STOPPED. Methods take `&self`; adapters
/// keep their mutable runtime state behind their own locks.
#[async_trait]
pub trait Bootstrap: Send + Sync + Debug {
    /// Acquire resources (ports, directories) and bring the service up.
    async fn start(&self) -> Result<(), AdapterError>;

    /// Bring the service down.
    async fn stop(&self) -> Result<(), AdapterError>;

    /// Remove auxiliary on-disk state. Called after every `stop`, including
    /// failed ones.
    async fn cleanup(&self) -> Result<(), AdapterError> {
        Ok(())
    }

    /// Human readable summary, diagnostic only.
    fn properties(&self) -> String;

    /// Settings as resolved after start, e.g. the bound port when `0` asked
    /// for an ephemeral one. Dependents read their connection parameters
    /// from here.
    fn configuration(&self) -> Configuration;
}

/// Builds the adapter for one instance from its resolved configuration.
pub type BootstrapFactory =
    Arc<dyn Fn(&Configuration) -> Result<Arc<dyn Bootstrap>, AdapterError> + Send + Sync>;
