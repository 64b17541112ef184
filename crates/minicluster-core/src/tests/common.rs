#![cfg(test)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::component::{AdapterError, Bootstrap, ComponentDescriptor, ComponentRegistry};
use crate::config::Configuration;

/// Ordered record of adapter calls across every mock in a test, e.g.
/// `["construct:A", "start:A", "stop:A", "cleanup:A"]`.
#[derive(Debug, Default)]
pub struct CallLog {
    events: StdMutex<Vec<String>>,
}

impl CallLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn record(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.events().iter().filter(|e| e.as_str() == event).count()
    }

    /// Identities for one kind of call (`"start"`, `"stop"`, ...), in order
    pub fn of(&self, kind: &str) -> Vec<String> {
        let prefix = format!("{}:", kind);
        self.events()
            .iter()
            .filter_map(|e| e.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }
}

/// Knobs for a mock adapter
#[derive(Debug, Clone, Default)]
pub struct MockBehavior {
    pub fail_construct: bool,
    pub fail_start: bool,
    pub fail_stop: bool,
    pub fail_cleanup: bool,
    pub start_delay: Option<Duration>,
    /// Extra settings reported by `configuration()` once started
    pub publish: Configuration,
}

impl MockBehavior {
    pub fn failing_start() -> Self {
        Self {
            fail_start: true,
            ..Self::default()
        }
    }

    pub fn publishing(key: &str, value: &str) -> Self {
        let mut publish = Configuration::new();
        publish.insert(key.to_string(), value.to_string());
        Self {
            publish,
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct MockBootstrap {
    id: String,
    config: Configuration,
    behavior: MockBehavior,
    log: Arc<CallLog>,
    running: AtomicBool,
}

#[async_trait]
impl Bootstrap for MockBootstrap {
    async fn start(&self) -> Result<(), AdapterError> {
        self.log.record(format!("start:{}", self.id));
        if let Some(delay) = self.behavior.start_delay {
            tokio::time::sleep(delay).await;
        }
        if self.behavior.fail_start {
            return Err(AdapterError::Other(format!("{} refused to start", self.id)));
        }
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<(), AdapterError> {
        self.log.record(format!("stop:{}", self.id));
        self.running.store(false, Ordering::SeqCst);
        if self.behavior.fail_stop {
            return Err(AdapterError::Other(format!("{} refused to stop", self.id)));
        }
        Ok(())
    }

    async fn cleanup(&self) -> Result<(), AdapterError> {
        self.log.record(format!("cleanup:{}", self.id));
        if self.behavior.fail_cleanup {
            return Err(AdapterError::Other(format!("{} left files behind", self.id)));
        }
        Ok(())
    }

    fn properties(&self) -> String {
        format!("\n \t\t\t mock:{}", self.id)
    }

    fn configuration(&self) -> Configuration {
        let mut config = self.config.clone();
        if self.running.load(Ordering::SeqCst) {
            config.extend(self.behavior.publish.clone());
        }
        config
    }
}

/// Descriptor for a mock component. It recognizes `<id>.port` (default
/// `1000`) and `<id>.host` (default `localhost`), ids lower-cased.
pub fn mock_descriptor(
    id: &str,
    dependencies: &[&str],
    log: &Arc<CallLog>,
    behavior: MockBehavior,
) -> ComponentDescriptor {
    let lower = id.to_lowercase();
    let name = id.to_string();
    let log = Arc::clone(log);
    ComponentDescriptor::new(id, format!("{}.artifact", lower), move |config| {
        log.record(format!("construct:{}", name));
        if behavior.fail_construct {
            return Err(AdapterError::InvalidConfig {
                key: "mock".to_string(),
                value: String::new(),
                reason: "construction refused".to_string(),
            });
        }
        let adapter: Arc<dyn Bootstrap> = Arc::new(MockBootstrap {
            id: name.clone(),
            config: config.clone(),
            behavior: behavior.clone(),
            log: Arc::clone(&log),
            running: AtomicBool::new(false),
        });
        Ok(adapter)
    })
    .with_dependencies(dependencies.iter().copied())
    .with_default(format!("{}.port", lower), "1000")
    .with_default(format!("{}.host", lower), "localhost")
}

/// Plain mock with default behavior
pub fn plain(id: &str, dependencies: &[&str], log: &Arc<CallLog>) -> ComponentDescriptor {
    mock_descriptor(id, dependencies, log, MockBehavior::default())
}

pub fn registry_of(descriptors: Vec<ComponentDescriptor>) -> Arc<ComponentRegistry> {
    let mut builder = ComponentRegistry::builder();
    for descriptor in descriptors {
        builder.register(descriptor).expect("mock descriptors register cleanly");
    }
    Arc::new(builder.build())
}

pub fn config(pairs: &[(&str, &str)]) -> Configuration {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
