use std::collections::HashMap;
use std::sync::Arc;

use crate::component::descriptor::ComponentDescriptor;
use crate::component::error::ComponentSystemError;
use crate::component::id::ComponentId;

/// Collects descriptors at startup. Consumed by [`RegistryBuilder::build`],
/// after which the set of known components is fixed.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    descriptors: HashMap<ComponentId, Arc<ComponentDescriptor>>,
    order: Vec<ComponentId>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor. Identities must be unique and a component may
    /// not depend on itself. Dependencies on components registered later (or
    /// never) are accepted here and reported by the resolver.
    pub fn register(
        &mut self,
        descriptor: ComponentDescriptor,
    ) -> Result<&mut Self, ComponentSystemError> {
        let id = descriptor.id().clone();
        if self.descriptors.contains_key(&id) {
            return Err(ComponentSystemError::DuplicateComponent { identity: id });
        }
        if descriptor.dependencies().contains(&id) {
            return Err(ComponentSystemError::SelfDependency { identity: id });
        }

        log::debug!(
            "Registered component {} (dependencies: {:?})",
            id,
            descriptor.dependencies()
        );
        self.order.push(id.clone());
        self.descriptors.insert(id, Arc::new(descriptor));
        Ok(self)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.descriptors.contains_key(id)
    }

    pub fn build(self) -> ComponentRegistry {
        ComponentRegistry {
            descriptors: self.descriptors,
            order: self.order,
        }
    }
}

/// Read-only mapping from identity to descriptor.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    descriptors: HashMap<ComponentId, Arc<ComponentDescriptor>>,
    // Registration order, for stable listings
    order: Vec<ComponentId>,
}

impl ComponentRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Look up a descriptor, failing with `UnknownComponent` when absent.
    pub fn get(&self, id: &str) -> Result<Arc<ComponentDescriptor>, ComponentSystemError> {
        self.find(id)
            .cloned()
            .ok_or_else(|| ComponentSystemError::UnknownComponent {
                identity: ComponentId::from(id),
            })
    }

    pub fn find(&self, id: &str) -> Option<&Arc<ComponentDescriptor>> {
        self.descriptors.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.descriptors.contains_key(id)
    }

    /// Identities in registration order
    pub fn ids(&self) -> &[ComponentId] {
        &self.order
    }

    /// Descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ComponentDescriptor>> {
        self.order.iter().filter_map(|id| self.descriptors.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
