use std::sync::Arc;

use async_trait::async_trait;

use minicluster_core::component::{AdapterError, Bootstrap, ComponentDescriptor};
use minicluster_core::config::Configuration;
use minicluster_core::embedded::ServerSlot;
use minicluster_core::kernel::constants::DEFAULT_HOST;
use minicluster_core::utils::{parse_or, parse_required, required};

use crate::{effective_port, kafka};

pub const ID: &str = "CONFLUENT_SCHEMAREGISTRY";
pub const ARTIFACT_KEY: &str = "confluent.schemaregistry.artifact";

pub const HOST_KEY: &str = "confluent.schemaregistry.host";
pub const PORT_KEY: &str = "confluent.schemaregistry.port";
pub const KAFKASTORE_TOPIC_KEY: &str = "confluent.schemaregistry.kafkastore.topic";
pub const DEBUG_KEY: &str = "confluent.schemaregistry.debug";
pub const URL_KEY: &str = "schema.registry.url";
pub const KAFKASTORE_BOOTSTRAP_SERVERS_KEY: &str = "kafkastore.bootstrap.servers";

pub fn descriptor() -> ComponentDescriptor {
    ComponentDescriptor::new(ID, ARTIFACT_KEY, |config| {
        let adapter: Arc<dyn Bootstrap> = Arc::new(SchemaRegistryBootstrap::from_config(config)?);
        Ok(adapter)
    })
    .with_dependency(kafka::ID)
    .with_default(HOST_KEY, DEFAULT_HOST)
    .with_default(PORT_KEY, "8081")
    .with_default(KAFKASTORE_TOPIC_KEY, "_schema")
    .with_default(DEBUG_KEY, "false")
    .with_default(kafka::HOST_KEY, DEFAULT_HOST)
    .with_default(kafka::PORT_KEY, "22222")
}

#[derive(Debug)]
pub struct SchemaRegistryBootstrap {
    host: String,
    port: u16,
    topic: String,
    debug: bool,
    kafkastore: String,
    listener: ServerSlot,
}

impl SchemaRegistryBootstrap {
    pub fn from_config(config: &Configuration) -> Result<Self, AdapterError> {
        let kafka_port: u16 = parse_required(config, kafka::PORT_KEY)?;
        Ok(Self {
            host: required(config, HOST_KEY)?.to_string(),
            port: parse_required(config, PORT_KEY)?,
            topic: required(config, KAFKASTORE_TOPIC_KEY)?.to_string(),
            debug: parse_or(config, DEBUG_KEY, false)?,
            kafkastore: format!("PLAINTEXT://{}:{}", required(config, kafka::HOST_KEY)?, kafka_port),
            listener: ServerSlot::new(),
        })
    }

    pub fn port(&self) -> u16 {
        effective_port(&self.listener, self.port)
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port())
    }
}

#[async_trait]
impl Bootstrap for SchemaRegistryBootstrap {
    async fn start(&self) -> Result<(), AdapterError> {
        if self.debug {
            log::debug!("Schema registry storing schemas in topic {} on {}", self.topic, self.kafkastore);
        }
        self.listener.start("Schema registry", &self.host, self.port).await?;
        Ok(())
    }

    async fn stop(&self) -> Result<(), AdapterError> {
        self.listener.stop().await
    }

    fn properties(&self) -> String {
        format!("\n \t\t\t port:{}", self.port())
    }

    fn configuration(&self) -> Configuration {
        let mut config = Configuration::new();
        config.insert(HOST_KEY.to_string(), self.host.clone());
        config.insert(PORT_KEY.to_string(), self.port().to_string());
        config.insert(KAFKASTORE_TOPIC_KEY.to_string(), self.topic.clone());
        config.insert(DEBUG_KEY.to_string(), self.debug.to_string());
        config.insert(KAFKASTORE_BOOTSTRAP_SERVERS_KEY.to_string(), self.kafkastore.clone());
        config.insert(URL_KEY.to_string(), self.url());
        config
    }
}
