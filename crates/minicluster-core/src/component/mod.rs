//! # minicluster Component System
//!
//! Static metadata about the service kinds that can be booted, and the
//! runtime bookkeeping for one booted service.
//!
//! ## Key Submodules and Responsibilities:
//!
//! - **[`id`]**: the [`ComponentId`] identity key.
//! - **[`descriptor`]**: [`ComponentDescriptor`], the immutable description of
//!   one service kind (identity, artifact key, dependencies, defaults,
//!   adapter factory).
//! - **[`registry`]**: the read-only [`ComponentRegistry`] and the
//!   [`RegistryBuilder`] used to populate it once at startup.
//! - **[`lifecycle`]**: the four-state [`Lifecycle`] machine.
//! - **[`bootstrap`]**: the [`Bootstrap`] adapter trait every service kind
//!   implements.
//! - **[`instance`]**: [`ComponentInstance`], a descriptor bound to resolved
//!   configuration, state and (while not STOPPED) a live adapter.
//! - **[`artifact`]**: `group:name:version` coordinates recorded per instance.
//! - **[`error`]**: registry, adapter and transition errors.
pub mod artifact;
pub mod bootstrap;
pub mod descriptor;
pub mod error;
pub mod id;
pub mod instance;
pub mod lifecycle;
pub mod registry;

pub use artifact::Artifact;
pub use bootstrap::{Bootstrap, BootstrapFactory};
pub use descriptor::ComponentDescriptor;
pub use error::{AdapterError, ComponentSystemError, InvalidTransition};
pub use id::ComponentId;
pub use instance::ComponentInstance;
pub use lifecycle::{Lifecycle, LifecycleState};
pub use registry::{ComponentRegistry, RegistryBuilder};
