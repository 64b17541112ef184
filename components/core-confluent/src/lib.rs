//! # core-confluent
//!
//! Confluent platform components for minicluster: a Kafka broker backed by
//! the `ZOOKEEPER` component from `core-hadoop`, and a schema registry using
//! that broker as its store.
use log::info;

use minicluster_core::component::RegistryBuilder;
use minicluster_core::embedded::ServerSlot;
use minicluster_core::kernel::Result;

pub mod kafka;
pub mod schema_registry;

pub use kafka::KafkaBootstrap;
pub use schema_registry::SchemaRegistryBootstrap;

/// Register the Kafka broker and the schema registry. `ZOOKEEPER` must be
/// registered too (see `core_hadoop::register`) before anything here can be
/// started.
pub fn register(builder: &mut RegistryBuilder) -> Result<()> {
    builder
        .register(kafka::descriptor())?
        .register(schema_registry::descriptor())?;
    info!("Registered Confluent components");
    Ok(())
}

pub(crate) fn effective_port(slot: &ServerSlot, configured: u16) -> u16 {
    slot.bound_addr().map(|addr| addr.port()).unwrap_or(configured)
}
