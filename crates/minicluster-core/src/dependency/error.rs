//! # minicluster Dependency Resolution Errors
//!
//! All of these are structural: they are detected before any adapter runs
//! and abort the whole batch.
use thiserror::Error;

use crate::component::id::ComponentId;

#[derive(Debug, Error)]
pub enum ResolutionError {
    /// A requested identity is not registered
    #[error("Unknown component '{identity}'")]
    UnknownComponent { identity: ComponentId },

    /// A registered component names a dependency that is not registered
    #[error("Component '{referrer}' depends on unknown component '{dependency}'")]
    UnknownDependency {
        dependency: ComponentId,
        referrer: ComponentId,
    },

    /// The dependency graph reachable from the request contains a cycle.
    /// `cycle` lists every member once, in dependency order.
    #[error("Circular dependency detected: {}", format_cycle(.cycle))]
    CyclicDependency { cycle: Vec<ComponentId> },
}

fn format_cycle(cycle: &[ComponentId]) -> String {
    let mut path: Vec<&str> = cycle.iter().map(ComponentId::as_str).collect();
    if let Some(first) = cycle.first() {
        path.push(first.as_str());
    }
    path.join(" -> ")
}
