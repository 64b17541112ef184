use std::sync::Arc;

use async_trait::async_trait;

use minicluster_core::component::{AdapterError, Bootstrap, ComponentDescriptor};
use minicluster_core::config::Configuration;
use minicluster_core::embedded::ServerSlot;
use minicluster_core::kernel::constants::DEFAULT_HOST;
use minicluster_core::utils::{create_dir_all, delete_folder, parse_required, required};

use crate::effective_port;

pub const ID: &str = "HDFS";
pub const ARTIFACT_KEY: &str = "hdfs.artifact";

pub const NAMENODE_HOST_KEY: &str = "hdfs.namenode.host";
pub const NAMENODE_PORT_KEY: &str = "hdfs.namenode.port";
pub const TEMP_DIR_KEY: &str = "hdfs.temp.dir";
pub const DEFAULT_FS_KEY: &str = "fs.defaultFS";

pub fn descriptor() -> ComponentDescriptor {
    ComponentDescriptor::new(ID, ARTIFACT_KEY, |config| {
        let adapter: Arc<dyn Bootstrap> = Arc::new(HdfsBootstrap::from_config(config)?);
        Ok(adapter)
    })
    .with_default(NAMENODE_HOST_KEY, DEFAULT_HOST)
    .with_default(NAMENODE_PORT_KEY, "20112")
    .with_default(TEMP_DIR_KEY, "/tmp/embedded_hdfs")
}

/// `hdfs://host:port`
pub fn uri(host: &str, port: u16) -> String {
    format!("hdfs://{}:{}", host, port)
}

#[derive(Debug)]
pub struct HdfsBootstrap {
    host: String,
    port: u16,
    temp_dir: String,
    namenode: ServerSlot,
}

impl HdfsBootstrap {
    pub fn from_config(config: &Configuration) -> Result<Self, AdapterError> {
        Ok(Self {
            host: required(config, NAMENODE_HOST_KEY)?.to_string(),
            port: parse_required(config, NAMENODE_PORT_KEY)?,
            temp_dir: required(config, TEMP_DIR_KEY)?.to_string(),
            namenode: ServerSlot::new(),
        })
    }

    pub fn port(&self) -> u16 {
        effective_port(&self.namenode, self.port)
    }
}

#[async_trait]
impl Bootstrap for HdfsBootstrap {
    async fn start(&self) -> Result<(), AdapterError> {
        create_dir_all(&self.temp_dir)?;
        self.namenode.start("HDFS namenode", &self.host, self.port).await?;
        Ok(())
    }

    async fn stop(&self) -> Result<(), AdapterError> {
        self.namenode.stop().await
    }

    async fn cleanup(&self) -> Result<(), AdapterError> {
        delete_folder(&self.temp_dir)
    }

    fn properties(&self) -> String {
        format!("\n \t\t\t NameNode port:{}", self.port())
    }

    fn configuration(&self) -> Configuration {
        let mut config = Configuration::new();
        config.insert(NAMENODE_HOST_KEY.to_string(), self.host.clone());
        config.insert(NAMENODE_PORT_KEY.to_string(), self.port().to_string());
        config.insert(TEMP_DIR_KEY.to_string(), self.temp_dir.clone());
        config.insert(DEFAULT_FS_KEY.to_string(), uri(&self.host, self.port()));
        config
    }
}
