//! # minicluster Dependency Resolution
//!
//! Turns a requested set of identities into a start order in which every
//! component follows all of its dependencies. The stop order is always the
//! exact reverse of a start order, never computed independently.
pub mod error;
pub mod resolver;

pub use error::ResolutionError;
pub use resolver::DependencyResolver;
