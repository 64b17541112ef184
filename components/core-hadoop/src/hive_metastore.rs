use std::sync::Arc;

use async_trait::async_trait;

use minicluster_core::component::{AdapterError, Bootstrap, ComponentDescriptor};
use minicluster_core::config::Configuration;
use minicluster_core::embedded::ServerSlot;
use minicluster_core::kernel::constants::DEFAULT_HOST;
use minicluster_core::utils::{create_dir_all, delete_folder, last_segment, parse_required, required};

use crate::{effective_port, hdfs};

pub const ID: &str = "HIVEMETA";
pub const ARTIFACT_KEY: &str = "hivemeta.artifact";

pub const HOSTNAME_KEY: &str = "hive.metastore.hostname";
pub const PORT_KEY: &str = "hive.metastore.port";
pub const DERBY_DB_DIR_KEY: &str = "hive.metastore.derby.db.dir";
pub const SCRATCH_DIR_KEY: &str = "hive.scratch.dir";
pub const WAREHOUSE_DIR_KEY: &str = "hive.warehouse.dir";
pub const URIS_KEY: &str = "hive.metastore.uris";

pub fn descriptor() -> ComponentDescriptor {
    ComponentDescriptor::new(ID, ARTIFACT_KEY, |config| {
        let adapter: Arc<dyn Bootstrap> = Arc::new(HiveMetastoreBootstrap::from_config(config)?);
        Ok(adapter)
    })
    .with_dependency(hdfs::ID)
    .with_default(HOSTNAME_KEY, DEFAULT_HOST)
    .with_default(PORT_KEY, "20102")
    .with_default(DERBY_DB_DIR_KEY, "metastore_db")
    .with_default(SCRATCH_DIR_KEY, "/tmp/hive_scratch_dir")
    .with_default(WAREHOUSE_DIR_KEY, "/tmp/warehouse_dir")
    .with_default(hdfs::NAMENODE_HOST_KEY, DEFAULT_HOST)
    .with_default(hdfs::NAMENODE_PORT_KEY, "20112")
}

/// `thrift://host:port`
pub fn uri(host: &str, port: u16) -> String {
    format!("thrift://{}:{}", host, port)
}

/// Remove a derby database directory. Derby may also create it relative to
/// the working directory under its last path segment.
pub(crate) fn delete_derby(dir: &str) -> Result<(), AdapterError> {
    delete_folder(dir)?;
    let relative = last_segment(dir);
    if !relative.is_empty() && relative != dir {
        delete_folder(relative)?;
    }
    Ok(())
}

#[derive(Debug)]
pub struct HiveMetastoreBootstrap {
    host: String,
    port: u16,
    derby_dir: String,
    scratch_dir: String,
    warehouse_dir: String,
    hdfs_uri: String,
    thrift: ServerSlot,
}

impl HiveMetastoreBootstrap {
    pub fn from_config(config: &Configuration) -> Result<Self, AdapterError> {
        Ok(Self {
            host: required(config, HOSTNAME_KEY)?.to_string(),
            port: parse_required(config, PORT_KEY)?,
            derby_dir: required(config, DERBY_DB_DIR_KEY)?.to_string(),
            scratch_dir: required(config, SCRATCH_DIR_KEY)?.to_string(),
            warehouse_dir: required(config, WAREHOUSE_DIR_KEY)?.to_string(),
            hdfs_uri: hdfs::uri(
                required(config, hdfs::NAMENODE_HOST_KEY)?,
                parse_required(config, hdfs::NAMENODE_PORT_KEY)?,
            ),
            thrift: ServerSlot::new(),
        })
    }

    pub fn port(&self) -> u16 {
        effective_port(&self.thrift, self.port)
    }
}

#[async_trait]
impl Bootstrap for HiveMetastoreBootstrap {
    async fn start(&self) -> Result<(), AdapterError> {
        for dir in [&self.derby_dir, &self.scratch_dir, &self.warehouse_dir] {
            create_dir_all(dir)?;
        }
        self.thrift.start("Hive metastore", &self.host, self.port).await?;
        Ok(())
    }

    async fn stop(&self) -> Result<(), AdapterError> {
        self.thrift.stop().await
    }

    async fn cleanup(&self) -> Result<(), AdapterError> {
        delete_derby(&self.derby_dir)
    }

    fn properties(&self) -> String {
        format!("\n \t\t\t port:{}", self.port())
    }

    fn configuration(&self) -> Configuration {
        let mut config = Configuration::new();
        config.insert(HOSTNAME_KEY.to_string(), self.host.clone());
        config.insert(PORT_KEY.to_string(), self.port().to_string());
        config.insert(DERBY_DB_DIR_KEY.to_string(), self.derby_dir.clone());
        config.insert(SCRATCH_DIR_KEY.to_string(), self.scratch_dir.clone());
        config.insert(WAREHOUSE_DIR_KEY.to_string(), self.warehouse_dir.clone());
        config.insert(hdfs::DEFAULT_FS_KEY.to_string(), self.hdfs_uri.clone());
        config.insert(URIS_KEY.to_string(), uri(&self.host, self.port()));
        config
    }
}
