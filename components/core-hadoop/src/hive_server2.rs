use std::sync::Arc;

use async_trait::async_trait;

use minicluster_core::component::{AdapterError, Bootstrap, ComponentDescriptor};
use minicluster_core::config::Configuration;
use minicluster_core::embedded::ServerSlot;
use minicluster_core::kernel::constants::DEFAULT_HOST;
use minicluster_core::utils::{create_dir_all, parse_required, required};

use crate::hive_metastore::{self, delete_derby};
use crate::{effective_port, hdfs, zookeeper};

pub const ID: &str = "HIVESERVER2";
pub const ARTIFACT_KEY: &str = "hiveserver2.artifact";

pub const HOSTNAME_KEY: &str = "hive.server2.hostname";
pub const PORT_KEY: &str = "hive.server2.port";

// Client-facing hive settings
pub const THRIFT_PORT_KEY: &str = "hive.server2.thrift.port";
pub const THRIFT_BIND_HOST_KEY: &str = "hive.server2.thrift.bind.host";
pub const ZOOKEEPER_QUORUM_KEY: &str = "hive.zookeeper.quorum";
pub const WAREHOUSE_KEY: &str = "hive.metastore.warehouse.dir";
pub const SCRATCH_KEY: &str = "hive.exec.scratchdir";

pub fn descriptor() -> ComponentDescriptor {
    ComponentDescriptor::new(ID, ARTIFACT_KEY, |config| {
        let adapter: Arc<dyn Bootstrap> = Arc::new(HiveServer2Bootstrap::from_config(config)?);
        Ok(adapter)
    })
    .with_dependencies([hive_metastore::ID, zookeeper::ID, hdfs::ID])
    .with_default(HOSTNAME_KEY, DEFAULT_HOST)
    .with_default(PORT_KEY, "20103")
    .with_default(hive_metastore::HOSTNAME_KEY, DEFAULT_HOST)
    .with_default(hive_metastore::PORT_KEY, "20102")
    .with_default(hive_metastore::DERBY_DB_DIR_KEY, "metastore_db")
    .with_default(hive_metastore::SCRATCH_DIR_KEY, "/tmp/hive_scratch_dir")
    .with_default(hive_metastore::WAREHOUSE_DIR_KEY, "/tmp/warehouse_dir")
    .with_default(zookeeper::HOST_KEY, DEFAULT_HOST)
    .with_default(zookeeper::PORT_KEY, "22010")
    .with_default(hdfs::NAMENODE_HOST_KEY, DEFAULT_HOST)
    .with_default(hdfs::NAMENODE_PORT_KEY, "20112")
}

#[derive(Debug)]
pub struct HiveServer2Bootstrap {
    host: String,
    port: u16,
    metastore_uri: String,
    derby_dir: String,
    scratch_dir: String,
    warehouse_dir: String,
    zookeeper_connection_string: String,
    hdfs_uri: String,
    thrift: ServerSlot,
}

impl HiveServer2Bootstrap {
    pub fn from_config(config: &Configuration) -> Result<Self, AdapterError> {
        let metastore_port: u16 = parse_required(config, hive_metastore::PORT_KEY)?;
        let zookeeper_port: u16 = parse_required(config, zookeeper::PORT_KEY)?;
        let hdfs_port: u16 = parse_required(config, hdfs::NAMENODE_PORT_KEY)?;

        Ok(Self {
            host: required(config, HOSTNAME_KEY)?.to_string(),
            port: parse_required(config, PORT_KEY)?,
            metastore_uri: hive_metastore::uri(required(config, hive_metastore::HOSTNAME_KEY)?, metastore_port),
            derby_dir: required(config, hive_metastore::DERBY_DB_DIR_KEY)?.to_string(),
            scratch_dir: required(config, hive_metastore::SCRATCH_DIR_KEY)?.to_string(),
            warehouse_dir: required(config, hive_metastore::WAREHOUSE_DIR_KEY)?.to_string(),
            zookeeper_connection_string: format!("{}:{}", required(config, zookeeper::HOST_KEY)?, zookeeper_port),
            hdfs_uri: hdfs::uri(required(config, hdfs::NAMENODE_HOST_KEY)?, hdfs_port),
            thrift: ServerSlot::new(),
        })
    }

    pub fn port(&self) -> u16 {
        effective_port(&self.thrift, self.port)
    }

    /// Settings a hive client needs to reach this server
    pub fn hive_conf(&self) -> Configuration {
        let mut conf = Configuration::new();
        conf.insert(hdfs::DEFAULT_FS_KEY.to_string(), self.hdfs_uri.clone());
        conf.insert(hive_metastore::URIS_KEY.to_string(), self.metastore_uri.clone());
        conf.insert(ZOOKEEPER_QUORUM_KEY.to_string(), self.zookeeper_connection_string.clone());
        conf.insert(THRIFT_BIND_HOST_KEY.to_string(), self.host.clone());
        conf.insert(THRIFT_PORT_KEY.to_string(), self.port().to_string());
        conf.insert(WAREHOUSE_KEY.to_string(), self.warehouse_dir.clone());
        conf.insert(SCRATCH_KEY.to_string(), self.scratch_dir.clone());
        conf
    }
}

#[async_trait]
impl Bootstrap for HiveServer2Bootstrap {
    async fn start(&self) -> Result<(), AdapterError> {
        create_dir_all(&self.scratch_dir)?;
        create_dir_all(&self.warehouse_dir)?;
        self.thrift.start("HiveServer2", &self.host, self.port).await?;
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
        let mut config = self.hive_conf();
        config.insert(HOSTNAME_KEY.to_string(), self.host.clone());
        config.insert(PORT_KEY.to_string(), self.port().to_string());
        config
    }
}
