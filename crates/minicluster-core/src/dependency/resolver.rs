use std::collections::HashMap;

use crate::component::id::ComponentId;
use crate::component::registry::ComponentRegistry;
use crate::dependency::error::ResolutionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// On the current DFS path
    InProgress,
    /// Emitted into the order
    Done,
}

/// Depth-first topological sort over a [`ComponentRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct DependencyResolver<'a> {
    registry: &'a ComponentRegistry,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(registry: &'a ComponentRegistry) -> Self {
        Self { registry }
    }

    /// Start order for `requested` plus everything it transitively needs.
    ///
    /// Requested identities are visited in the order given (duplicates are
    /// skipped) and each node's dependencies in declaration order, so the
    /// result is deterministic. Every identity appears after all of its
    /// dependencies.
    pub fn order<I, S>(&self, requested: I) -> Result<Vec<ComponentId>, ResolutionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut marks: HashMap<ComponentId, Mark> = HashMap::new();
        let mut path: Vec<ComponentId> = Vec::new();
        let mut order: Vec<ComponentId> = Vec::new();

        for id in requested {
            let id = id.as_ref();
            let Some(descriptor) = self.registry.find(id) else {
                return Err(ResolutionError::UnknownComponent {
                    identity: ComponentId::from(id),
                });
            };
            self.visit(descriptor.id(), &mut marks, &mut path, &mut order)?;
        }

        log::debug!("Resolved start order: {:?}", order);
        Ok(order)
    }

    /// The stop order matching a start order.
    pub fn stop_order(start_order: &[ComponentId]) -> Vec<ComponentId> {
        start_order.iter().rev().cloned().collect()
    }

    fn visit(
        &self,
        id: &ComponentId,
        marks: &mut HashMap<ComponentId, Mark>,
        path: &mut Vec<ComponentId>,
        order: &mut Vec<ComponentId>,
    ) -> Result<(), ResolutionError> {
        match marks.get(id) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::InProgress) => {
                // The cycle is the tail of the current path starting at `id`
                let start = path.iter().position(|p| p == id).unwrap_or(0);
                return Err(ResolutionError::CyclicDependency {
                    cycle: path[start..].to_vec(),
                });
            }
            None => {}
        }

        // Callers only pass registered identities
        let Some(descriptor) = self.registry.find(id.as_str()) else {
            return Err(ResolutionError::UnknownComponent {
                identity: id.clone(),
            });
        };

        marks.insert(id.clone(), Mark::InProgress);
        path.push(id.clone());

        for dependency in descriptor.dependencies() {
            if !self.registry.contains(dependency.as_str()) {
                return Err(ResolutionError::UnknownDependency {
                    dependency: dependency.clone(),
                    referrer: id.clone(),
                });
            }
            self.visit(dependency, marks, path, order)?;
        }

        path.pop();
        marks.insert(id.clone(), Mark::Done);
        order.push(id.clone());
        Ok(())
    }
}
