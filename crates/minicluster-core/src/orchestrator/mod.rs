//! # minicluster Orchestrator
//!
//! The facade tests talk to. An [`Orchestrator`] owns the instance table,
//! starts requested components (and whatever they depend on) in dependency
//! order, and stops them again in exactly the reverse order.
//!
//! Structural problems (unknown dependencies, cycles) abort a batch before
//! anything starts. Per-component failures ([`StartError`], [`StopError`]) are
//! collected into an [`Outcomes`] report and never abort the rest of the
//! batch.
pub mod error;
pub mod manager;
pub mod outcome;
pub mod settings;

pub use error::{StartError, StopError};
pub use manager::{Orchestrator, Overrides};
pub use outcome::Outcomes;
pub use settings::OrchestratorSettings;

#[cfg(test)]
mod tests;
