//! # minicluster Configuration
//!
//! Configuration is a flat `key -> value` string mapping, namespaced per
//! component (`hive.server2.hostname`, `zookeeper.port`, ...).
//!
//! - **[`source`]**: loads a [`ConfigSource`] from `.properties`, `.json`,
//!   `.toml` or `.yaml` files.
//! - **[`overlay`]**: the [`ConfigOverlay`] merge used to layer defaults,
//!   the loaded source, dependency settings and caller overrides.
//! - **[`error`]**: [`ConfigError`](error::ConfigError).
pub mod error;
pub mod overlay;
pub mod source;

use std::collections::BTreeMap;

pub use error::ConfigError;
pub use overlay::{ConfigOverlay, parse_override};
pub use source::{ConfigFormat, ConfigSource};

/// Resolved settings for one component. Ordered so diagnostics are stable.
pub type Configuration = BTreeMap<String, String>;
