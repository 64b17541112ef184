use std::collections::HashMap;
use std::time::Duration;

use crate::component::id::ComponentId;

/// Knobs for an [`Orchestrator`](crate::orchestrator::Orchestrator).
///
/// Adapter calls have no timeout unless one is configured here. A start
/// timeout set for a specific identity takes precedence over the default.
#[derive(Debug, Clone, Default)]
pub struct OrchestratorSettings {
    pub start_timeout: Option<Duration>,
    pub stop_timeout: Option<Duration>,
    pub component_start_timeouts: HashMap<ComponentId, Duration>,
}

impl OrchestratorSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_timeout(mut self, timeout: Duration) -> Self {
        self.start_timeout = Some(timeout);
        self
    }

    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = Some(timeout);
        self
    }

    pub fn with_component_start_timeout(mut self, id: impl Into<ComponentId>, timeout: Duration) -> Self {
        self.component_start_timeouts.insert(id.into(), timeout);
        self
    }

    pub fn start_timeout_for(&self, id: &str) -> Option<Duration> {
        self.component_start_timeouts
            .get(id)
            .copied()
            .or(self.start_timeout)
    }
}
