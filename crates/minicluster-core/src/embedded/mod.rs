//! # Embedded service helpers
//!
//! Building blocks shared by adapter crates. [`EmbeddedServer`] holds a TCP
//! port for as long as a component is running; [`ServerSlot`] wraps one in
//! the interior mutability a [`Bootstrap`](crate::component::Bootstrap)
//! implementation needs.
pub mod server;

pub use server::{EmbeddedServer, ServerSlot};
