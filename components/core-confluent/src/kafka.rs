use std::sync::Arc;

use async_trait::async_trait;

use core_hadoop::zookeeper;
use minicluster_core::component::{AdapterError, Bootstrap, ComponentDescriptor};
use minicluster_core::config::Configuration;
use minicluster_core::embedded::ServerSlot;
use minicluster_core::kernel::constants::DEFAULT_HOST;
use minicluster_core::utils::{create_dir_all, delete_folder, parse_required, required};

use crate::effective_port;

pub const ID: &str = "CONFLUENT_KAFKA";
pub const ARTIFACT_KEY: &str = "confluent.kafka.artifact";

pub const HOST_KEY: &str = "confluent.kafka.host";
pub const PORT_KEY: &str = "confluent.kafka.port";
pub const BROKER_ID_KEY: &str = "confluent.kafka.broker.id";
pub const LOG_DIRS_KEY: &str = "confluent.kafka.log.dirs";
pub const BOOTSTRAP_SERVERS_KEY: &str = "bootstrap.servers";
pub const ZOOKEEPER_CONNECT_KEY: &str = "zookeeper.connect";

pub fn descriptor() -> ComponentDescriptor {
    ComponentDescriptor::new(ID, ARTIFACT_KEY, |config| {
        let adapter: Arc<dyn Bootstrap> = Arc::new(KafkaBootstrap::from_config(config)?);
        Ok(adapter)
    })
    .with_dependency(zookeeper::ID)
    .with_default(HOST_KEY, DEFAULT_HOST)
    .with_default(PORT_KEY, "22222")
    .with_default(BROKER_ID_KEY, "0")
    .with_default(LOG_DIRS_KEY, "/tmp/kafka-logs")
    .with_default(zookeeper::HOST_KEY, DEFAULT_HOST)
    .with_default(zookeeper::PORT_KEY, "22010")
}

#[derive(Debug)]
pub struct KafkaBootstrap {
    host: String,
    port: u16,
    broker_id: u32,
    log_dirs: Vec<String>,
    zookeeper_connect: String,
    listener: ServerSlot,
}

impl KafkaBootstrap {
    pub fn from_config(config: &Configuration) -> Result<Self, AdapterError> {
        let log_dirs: Vec<String> = required(config, LOG_DIRS_KEY)?
            .split(',')
            .map(str::trim)
            .filter(|dir| !dir.is_empty())
            .map(str::to_string)
            .collect();
        let zookeeper_port: u16 = parse_required(config, zookeeper::PORT_KEY)?;

        Ok(Self {
            host: required(config, HOST_KEY)?.to_string(),
            port: parse_required(config, PORT_KEY)?,
            broker_id: parse_required(config, BROKER_ID_KEY)?,
            log_dirs,
            zookeeper_connect: format!("{}:{}", required(config, zookeeper::HOST_KEY)?, zookeeper_port),
            listener: ServerSlot::new(),
        })
    }

    pub fn port(&self) -> u16 {
        effective_port(&self.listener, self.port)
    }

    pub fn bootstrap_servers(&self) -> String {
        format!("{}:{}", self.host, self.port())
    }
}

#[async_trait]
impl Bootstrap for KafkaBootstrap {
    async fn start(&self) -> Result<(), AdapterError> {
        for dir in &self.log_dirs {
            create_dir_all(dir)?;
        }
        log::debug!(
            "Kafka broker {} registering with ZooKeeper at {}",
            self.broker_id,
            self.zookeeper_connect
        );
        self.listener.start("Kafka broker", &self.host, self.port).await?;
        Ok(())
    }

    async fn stop(&self) -> Result<(), AdapterError> {
        self.listener.stop().await
    }

    async fn cleanup(&self) -> Result<(), AdapterError> {
        for dir in &self.log_dirs {
            delete_folder(dir)?;
        }
        Ok(())
    }

    fn properties(&self) -> String {
        format!(
            "\n \t\t\t kafka host:{}\n \t\t\t kafka port:{}",
            self.host,
            self.port()
        )
    }

    fn configuration(&self) -> Configuration {
        let mut config = Configuration::new();
        config.insert(HOST_KEY.to_string(), self.host.clone());
        config.insert(PORT_KEY.to_string(), self.port().to_string());
        config.insert(BROKER_ID_KEY.to_string(), self.broker_id.to_string());
        config.insert(LOG_DIRS_KEY.to_string(), self.log_dirs.join(","));
        config.insert(ZOOKEEPER_CONNECT_KEY.to_string(), self.zookeeper_connect.clone());
        config.insert(BOOTSTRAP_SERVERS_KEY.to_string(), self.bootstrap_servers());
        config
    }
}
