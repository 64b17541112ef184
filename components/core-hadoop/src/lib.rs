//! # core-hadoop
//!
//! Hadoop-side components for minicluster. Each service holds a real TCP
//! port and its working directories for as long as it runs, and publishes
//! the connection settings dependents need.
//!
//! | Identity      | Depends on                    | Publishes              |
//! |---------------|-------------------------------|------------------------|
//! | `ZOOKEEPER`   |                               | `zookeeper.connection.string` |
//! | `HDFS`        |                               | `fs.defaultFS`         |
//! | `HIVEMETA`    | `HDFS`                        | `hive.metastore.uris`  |
//! | `HIVESERVER2` | `HIVEMETA`, `ZOOKEEPER`, `HDFS` | hive client settings |
use log::info;

use minicluster_core::component::RegistryBuilder;
use minicluster_core::kernel::Result;

pub mod hdfs;
pub mod hive_metastore;
pub mod hive_server2;
pub mod zookeeper;

pub use hdfs::HdfsBootstrap;
pub use hive_metastore::HiveMetastoreBootstrap;
pub use hive_server2::HiveServer2Bootstrap;
pub use zookeeper::ZookeeperBootstrap;

/// Register every component in this crate.
pub fn register(builder: &mut RegistryBuilder) -> Result<()> {
    builder
        .register(zookeeper::descriptor())?
        .register(hdfs::descriptor())?
        .register(hive_metastore::descriptor())?
        .register(hive_server2::descriptor())?;
    info!("Registered Hadoop components");
    Ok(())
}

/// Port actually held by `slot`, or the configured one while not running.
pub(crate) fn effective_port(slot: &minicluster_core::embedded::ServerSlot, configured: u16) -> u16 {
    slot.bound_addr().map(|addr| addr.port()).unwrap_or(configured)
}
