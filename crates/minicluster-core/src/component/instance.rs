use std::sync::Arc;

use crate::component::artifact::Artifact;
use crate::component::bootstrap::Bootstrap;
use crate::component::descriptor::ComponentDescriptor;
use crate::component::error::{AdapterError, InvalidTransition};
use crate::component::id::ComponentId;
use crate::component::lifecycle::{Lifecycle, LifecycleState};
use crate::config::Configuration;

/// A descriptor bound to resolved configuration and runtime state.
///
/// Invariant: `handle` is present iff the state is not STOPPED. The
/// transition methods are crate-private; only the orchestrator drives them.
#[derive(Debug, Clone)]
pub struct ComponentInstance {
    descriptor: Arc<ComponentDescriptor>,
    resolved_config: Configuration,
    artifact: Option<Artifact>,
    lifecycle: Lifecycle,
    handle: Option<Arc<dyn Bootstrap>>,
    // Snapshot of handle.configuration() taken when STARTED was reached
    runtime_config: Configuration,
    last_error: Option<String>,
}

impl ComponentInstance {
    pub fn new(
        descriptor: Arc<ComponentDescriptor>,
        resolved_config: Configuration,
        artifact: Option<Artifact>,
    ) -> Self {
        Self {
            descriptor,
            resolved_config,
            artifact,
            lifecycle: Lifecycle::new(),
            handle: None,
            runtime_config: Configuration::new(),
            last_error: None,
        }
    }

    pub fn id(&self) -> &ComponentId {
        self.descriptor.id()
    }

    pub fn descriptor(&self) -> &Arc<ComponentDescriptor> {
        &self.descriptor
    }

    /// Configuration the adapter was constructed with
    pub fn resolved_config(&self) -> &Configuration {
        &self.resolved_config
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        self.artifact.as_ref()
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn is_started(&self) -> bool {
        self.state() == LifecycleState::Started
    }

    pub fn handle(&self) -> Option<&Arc<dyn Bootstrap>> {
        self.handle.as_ref()
    }

    /// Settings dependents should connect with: the adapter's post-start
    /// configuration layered over the resolved one. Only the resolved
    /// configuration is available before STARTED.
    pub fn configuration(&self) -> Configuration {
        let mut merged = self.resolved_config.clone();
        merged.extend(
            self.runtime_config
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        merged
    }

    /// Adapter diagnostics, if an adapter exists
    pub fn properties(&self) -> Option<String> {
        self.handle.as_ref().map(|handle| handle.properties())
    }

    /// Message of the most recent failed transition, cleared on success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// STOPPED -> STARTING: builds the adapter and returns it for the
    /// caller to start. `Ok(None)` when not STOPPED (no-op). On factory
    /// failure the instance stays STOPPED with no handle.
    pub(crate) fn begin_start(&mut self) -> Result<Option<Arc<dyn Bootstrap>>, AdapterError> {
        if self.state() != LifecycleState::Stopped {
            return Ok(None);
        }
        let handle = self.descriptor.instantiate(&self.resolved_config)?;
        self.lifecycle.begin_start();
        self.handle = Some(handle.clone());
        Ok(Some(handle))
    }

    /// STARTING -> STARTED, capturing the adapter's resolved settings.
    pub(crate) fn complete_start(&mut self) -> Result<(), InvalidTransition> {
        self.lifecycle.complete_start()?;
        if let Some(handle) = &self.handle {
            self.runtime_config = handle.configuration();
        }
        self.last_error = None;
        Ok(())
    }

    /// STARTED -> STOPPING. Returns the adapter to stop, or `None` when not
    /// STARTED (no-op).
    pub(crate) fn begin_stop(&mut self) -> Option<Arc<dyn Bootstrap>> {
        if !self.lifecycle.begin_stop() {
            return None;
        }
        self.handle.clone()
    }

    /// Back to STOPPED from any state, dropping the adapter.
    pub(crate) fn complete_stop(&mut self) {
        if self.lifecycle.complete_stop().is_err() {
            log::warn!(
                "Forcing component {} from {} to {}",
                self.id(),
                self.state(),
                LifecycleState::Stopped
            );
            self.lifecycle.force_stopped();
        }
        self.handle = None;
        self.runtime_config.clear();
    }

    pub(crate) fn record_failure(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }
}
