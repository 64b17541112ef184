use std::fmt;

use serde::Serialize;

use crate::component::error::InvalidTransition;

/// The four states of one component instance. STOPPED is both the initial
/// and the terminal state; instances may loop through all four any number of
/// times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    #[default]
    Stopped,
    Starting,
    Started,
    Stopping,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Stopped => "STOPPED",
            LifecycleState::Starting => "STARTING",
            LifecycleState::Started => "STARTED",
            LifecycleState::Stopping => "STOPPING",
        };
        f.write_str(name)
    }
}

/// State machine for one instance.
///
/// ```text
/// STOPPED --begin_start--> STARTING --complete_start--> STARTED
/// STARTED --begin_stop---> STOPPING --complete_stop---> STOPPED
/// ```
///
/// `begin_*` requests from the wrong state are no-ops reporting `false`.
/// A failed start leaves the machine in STARTING; only [`force_stopped`]
/// leaves that state without a successful start.
///
/// [`force_stopped`]: Lifecycle::force_stopped
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    state: LifecycleState,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// STOPPED -> STARTING. Returns `false` and changes nothing otherwise.
    pub fn begin_start(&mut self) -> bool {
        if self.state != LifecycleState::Stopped {
            return false;
        }
        self.state = LifecycleState::Starting;
        true
    }

    /// STARTING -> STARTED
    pub fn complete_start(&mut self) -> Result<(), InvalidTransition> {
        self.transition(LifecycleState::Starting, LifecycleState::Started)
    }

    /// STARTED -> STOPPING. Returns `false` and changes nothing otherwise.
    pub fn begin_stop(&mut self) -> bool {
        if self.state != LifecycleState::Started {
            return false;
        }
        self.state = LifecycleState::Stopping;
        true
    }

    /// STOPPING -> STOPPED
    pub fn complete_stop(&mut self) -> Result<(), InvalidTransition> {
        self.transition(LifecycleState::Stopping, LifecycleState::Stopped)
    }

    /// Any state -> STOPPED, regardless of how the adapter call went.
    pub fn force_stopped(&mut self) {
        self.state = LifecycleState::Stopped;
    }

    fn transition(&mut self, from: LifecycleState, to: LifecycleState) -> Result<(), InvalidTransition> {
        if self.state != from {
            return Err(InvalidTransition { from: self.state, to });
        }
        self.state = to;
        Ok(())
    }
}
