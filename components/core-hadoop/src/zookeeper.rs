use std::sync::Arc;

use async_trait::async_trait;

use minicluster_core::component::{AdapterError, Bootstrap, ComponentDescriptor};
use minicluster_core::config::Configuration;
use minicluster_core::embedded::ServerSlot;
use minicluster_core::kernel::constants::DEFAULT_HOST;
use minicluster_core::utils::{create_dir_all, delete_folder, parse_required, required};

use crate::effective_port;

pub const ID: &str = "ZOOKEEPER";
pub const ARTIFACT_KEY: &str = "zookeeper.artifact";

pub const HOST_KEY: &str = "zookeeper.host";
pub const PORT_KEY: &str = "zookeeper.port";
pub const TEMP_DIR_KEY: &str = "zookeeper.temp.dir";
pub const CONNECTION_STRING_KEY: &str = "zookeeper.connection.string";

pub fn descriptor() -> ComponentDescriptor {
    ComponentDescriptor::new(ID, ARTIFACT_KEY, |config| {
        let adapter: Arc<dyn Bootstrap> = Arc::new(ZookeeperBootstrap::from_config(config)?);
        Ok(adapter)
    })
    .with_default(HOST_KEY, DEFAULT_HOST)
    .with_default(PORT_KEY, "22010")
    .with_default(TEMP_DIR_KEY, "/tmp/embedded_zk")
}

#[derive(Debug)]
pub struct ZookeeperBootstrap {
    host: String,
    port: u16,
    temp_dir: String,
    server: ServerSlot,
}

impl ZookeeperBootstrap {
    pub fn from_config(config: &Configuration) -> Result<Self, AdapterError> {
        Ok(Self {
            host: required(config, HOST_KEY)?.to_string(),
            port: parse_required(config, PORT_KEY)?,
            temp_dir: required(config, TEMP_DIR_KEY)?.to_string(),
            server: ServerSlot::new(),
        })
    }

    pub fn port(&self) -> u16 {
        effective_port(&self.server, self.port)
    }

    pub fn connection_string(&self) -> String {
        format!("{}:{}", self.host, self.port())
    }
}

#[async_trait]
impl Bootstrap for ZookeeperBootstrap {
    async fn start(&self) -> Result<(), AdapterError> {
        create_dir_all(&self.temp_dir)?;
        self.server.start(ID, &self.host, self.port).await?;
        Ok(())
    }

    async fn stop(&self) -> Result<(), AdapterError> {
        self.server.stop().await
    }

    async fn cleanup(&self) -> Result<(), AdapterError> {
        delete_folder(&self.temp_dir)
    }

    fn properties(&self) -> String {
        format!("\n \t\t\t clientPort:{}", self.port())
    }

    fn configuration(&self) -> Configuration {
        let mut config = Configuration::new();
        config.insert(HOST_KEY.to_string(), self.host.clone());
        config.insert(PORT_KEY.to_string(), self.port().to_string());
        config.insert(TEMP_DIR_KEY.to_string(), self.temp_dir.clone());
        config.insert(CONNECTION_STRING_KEY.to_string(), self.connection_string());
        config
    }
}
