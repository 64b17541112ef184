//! # minicluster-core
//!
//! Boots a set of embedded data-infrastructure services inside one test
//! process, in dependency order, and tears them down again in reverse.
//!
//! The moving parts:
//!
//! - [`component`]: descriptors, the read-only [`ComponentRegistry`], the
//!   per-instance lifecycle state machine and the [`Bootstrap`] adapter trait.
//! - [`config`]: configuration sources and the override-wins-if-non-empty
//!   [`ConfigOverlay`].
//! - [`dependency`]: the [`DependencyResolver`] producing start order.
//! - [`orchestrator`]: the [`Orchestrator`] facade driving whole batches.
//! - [`embedded`]: a port-holding helper shared by adapter crates.
pub mod component;
pub mod config;
pub mod dependency;
pub mod embedded;
pub mod kernel;
pub mod orchestrator;
pub mod utils;

pub use component::{
    Bootstrap, ComponentDescriptor, ComponentId, ComponentInstance, ComponentRegistry,
    LifecycleState, RegistryBuilder,
};
pub use config::{ConfigOverlay, ConfigSource, Configuration, parse_override};
pub use dependency::DependencyResolver;
pub use kernel::error::Error as KernelError;
pub use orchestrator::{Orchestrator, OrchestratorSettings, Outcomes, StartError, StopError};

#[cfg(test)]
mod tests;
