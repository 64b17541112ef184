use std::fmt;
use std::sync::Arc;

use crate::component::bootstrap::{Bootstrap, BootstrapFactory};
use crate::component::error::AdapterError;
use crate::component::id::ComponentId;
use crate::config::Configuration;

/// Static metadata for one service kind.
///
/// Descriptors are built once, registered with a
/// [`RegistryBuilder`](crate::component::RegistryBuilder) and never mutated
/// afterwards. The keys of `defaults` are the configuration keys the
/// component recognizes; overrides for any other key are ignored.
#[derive(Clone)]
pub struct ComponentDescriptor {
    id: ComponentId,
    artifact_key: String,
    dependencies: Vec<ComponentId>,
    defaults: Configuration,
    factory: BootstrapFactory,
}

impl ComponentDescriptor {
    pub fn new<F>(id: impl Into<ComponentId>, artifact_key: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Configuration) -> Result<Arc<dyn Bootstrap>, AdapterError> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            artifact_key: artifact_key.into(),
            dependencies: Vec::new(),
            defaults: Configuration::new(),
            factory: Arc::new(factory),
        }
    }

    /// Declare a dependency. Declaration order is the order the resolver
    /// visits dependencies in. Repeated declarations are ignored.
    pub fn with_dependency(mut self, dependency: impl Into<ComponentId>) -> Self {
        let dependency = dependency.into();
        if !self.dependencies.contains(&dependency) {
            self.dependencies.push(dependency);
        }
        self
    }

    pub fn with_dependencies<I, D>(self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<ComponentId>,
    {
        dependencies
            .into_iter()
            .fold(self, |descriptor, dep| descriptor.with_dependency(dep))
    }

    /// Recognize `key`, with `value` used when nothing else supplies one.
    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    pub fn with_defaults<I, K, V>(self, defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        defaults
            .into_iter()
            .fold(self, |descriptor, (k, v)| descriptor.with_default(k, v))
    }

    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    /// Configuration key under which the backing artifact is recorded
    pub fn artifact_key(&self) -> &str {
        &self.artifact_key
    }

    pub fn dependencies(&self) -> &[ComponentId] {
        &self.dependencies
    }

    pub fn defaults(&self) -> &Configuration {
        &self.defaults
    }

    pub fn recognizes(&self, key: &str) -> bool {
        self.defaults.contains_key(key)
    }

    /// Construct a fresh adapter for the given resolved configuration.
    pub fn instantiate(&self, config: &Configuration) -> Result<Arc<dyn Bootstrap>, AdapterError> {
        (self.factory)(config)
    }
}

impl fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("id", &self.id)
            .field("artifact_key", &self.artifact_key)
            .field("dependencies", &self.dependencies)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}
