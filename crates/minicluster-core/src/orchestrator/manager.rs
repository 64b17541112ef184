use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::component::artifact::Artifact;
use crate::component::descriptor::ComponentDescriptor;
use crate::component::error::AdapterError;
use crate::component::id::ComponentId;
use crate::component::instance::ComponentInstance;
use crate::component::lifecycle::LifecycleState;
use crate::component::registry::ComponentRegistry;
use crate::config::error::ConfigError;
use crate::config::{ConfigOverlay, ConfigSource, Configuration};
use crate::dependency::DependencyResolver;
use crate::kernel::error::Result as KernelResult;
use crate::orchestrator::error::{StartError, StopError};
use crate::orchestrator::outcome::Outcomes;
use crate::orchestrator::settings::OrchestratorSettings;

/// Caller-supplied configuration overrides, per identity
pub type Overrides = HashMap<ComponentId, Configuration>;

#[derive(Debug, Default)]
struct InstanceTable {
    instances: HashMap<ComponentId, ComponentInstance>,
    // Every identity that has an instance, in first-seen order
    known: Vec<ComponentId>,
    // Identities in the order they reached STARTED; removed once stopped
    start_order: Vec<ComponentId>,
}

impl InstanceTable {
    fn insert(&mut self, instance: ComponentInstance) {
        let id = instance.id().clone();
        if !self.known.contains(&id) {
            self.known.push(id.clone());
        }
        self.instances.insert(id, instance);
    }
}

/// Owns the instance table and drives batches of starts and stops.
///
/// The table lock is only held while an instance changes state, never
/// across an adapter call, so [`lookup`](Orchestrator::lookup) always
/// observes whole entries. A separate batch lock serializes `start_all`,
/// `stop_all` and `reset`.
pub struct Orchestrator {
    registry: Arc<ComponentRegistry>,
    source: ConfigSource,
    settings: OrchestratorSettings,
    table: Mutex<InstanceTable>,
    batch: Mutex<()>,
}

impl Orchestrator {
    pub fn new(registry: Arc<ComponentRegistry>, source: ConfigSource) -> Self {
        Self {
            registry,
            source,
            settings: OrchestratorSettings::default(),
            table: Mutex::new(InstanceTable::default()),
            batch: Mutex::new(()),
        }
    }

    pub fn with_settings(mut self, settings: OrchestratorSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.registry
    }

    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    /// Start `requested` and everything it depends on, in dependency order.
    ///
    /// Unknown requested identities are reported per identity and skipped.
    /// An unknown dependency or a cycle fails the whole call before any
    /// adapter runs. Otherwise every ordered identity gets an entry in the
    /// returned report: components that are already STARTED are reported as
    /// they are, failures are recorded and the batch carries on with
    /// whatever does not depend on the failed component.
    pub async fn start_all<I, S>(
        &self,
        requested: I,
        overrides: &Overrides,
    ) -> KernelResult<Outcomes<ComponentInstance, StartError>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let _batch = self.batch.lock().await;
        let mut outcomes = Outcomes::new();

        let mut known: Vec<ComponentId> = Vec::new();
        for id in requested {
            let id = ComponentId::from(id.as_ref());
            if !self.registry.contains(id.as_str()) {
                log::error!("Unknown component {} requested, skipping it", id);
                outcomes.record(id.clone(), Err(StartError::UnknownComponent { identity: id }));
            } else if !known.contains(&id) {
                known.push(id);
            }
        }

        let order = DependencyResolver::new(&self.registry).order(&known)?;
        log::info!(
            "Starting {} component(s) in order: {}",
            order.len(),
            join_ids(&order)
        );

        for id in &order {
            let result = self.start_one(id, overrides).await;
            outcomes.record(id.clone(), result);
        }

        let failed = outcomes.failures().count();
        if failed > 0 {
            log::warn!("{} of {} component(s) failed to start", failed, outcomes.len());
        }
        Ok(outcomes)
    }

    /// Stop every instance, dependents before their dependencies.
    ///
    /// Started instances are stopped in the exact reverse of the order they
    /// reached STARTED. Instances that are already STOPPED are reported as
    /// successful no-ops. Instances stuck in STARTING are reported as
    /// `NeedsReset` and left alone; see [`reset`](Orchestrator::reset).
    pub async fn stop_all(&self) -> Outcomes<(), StopError> {
        let _batch = self.batch.lock().await;

        let (stop_order, remaining) = {
            let table = self.table.lock().await;
            let stop_order = DependencyResolver::stop_order(&table.start_order);
            let remaining: Vec<ComponentId> = table
                .known
                .iter()
                .filter(|id| !table.start_order.contains(id))
                .cloned()
                .collect();
            (stop_order, remaining)
        };
        log::info!("Stopping components in order: {}", join_ids(&stop_order));

        let mut outcomes = Outcomes::new();
        for id in stop_order.iter().chain(remaining.iter()) {
            let result = self.stop_one(id).await;
            outcomes.record(id.clone(), result);
        }
        outcomes
    }

    /// Operator intervention for an instance stuck in STARTING after a failed
    /// or timed out start: attempts the adapter's `stop` and `cleanup`, then
    /// forces the instance to STOPPED whatever they report. A no-op for
    /// STOPPED instances. Never called implicitly.
    pub async fn reset(&self, id: &str) -> Result<(), StopError> {
        let _batch = self.batch.lock().await;
        let identity = ComponentId::from(id);

        let adapter = {
            let table = self.table.lock().await;
            let Some(instance) = table.instances.get(id) else {
                return Err(StopError::UnknownComponent { identity });
            };
            match instance.state() {
                LifecycleState::Stopped => return Ok(()),
                LifecycleState::Starting => {}
                state => return Err(StopError::InvalidState { identity, state }),
            }
            instance.handle().cloned()
        };

        log::warn!(
            "Resetting {} from {} to {}",
            identity,
            LifecycleState::Starting,
            LifecycleState::Stopped
        );
        let mut first_error = None;
        if let Some(adapter) = adapter {
            if let Err(source) = adapter.stop().await {
                log::warn!("Stopping {} during reset failed: {}", identity, source);
                first_error = Some(StopError::Adapter {
                    identity: identity.clone(),
                    source,
                });
            }
            if let Err(source) = adapter.cleanup().await {
                log::warn!("Cleaning up {} during reset failed: {}", identity, source);
                if first_error.is_none() {
                    first_error = Some(StopError::Cleanup {
                        identity: identity.clone(),
                        source,
                    });
                }
            }
        }

        let mut table = self.table.lock().await;
        if let Some(instance) = table.instances.get_mut(id) {
            instance.complete_stop();
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Snapshot of one instance, including its resolved configuration.
    pub async fn lookup(&self, id: &str) -> Option<ComponentInstance> {
        self.table.lock().await.instances.get(id).cloned()
    }

    pub async fn state_of(&self, id: &str) -> Option<LifecycleState> {
        self.table
            .lock()
            .await
            .instances
            .get(id)
            .map(ComponentInstance::state)
    }

    /// Identities currently STARTED, in the order they were started
    pub async fn start_order(&self) -> Vec<ComponentId> {
        self.table.lock().await.start_order.clone()
    }

    /// Started instances, in start order
    pub async fn running(&self) -> Vec<ComponentInstance> {
        let table = self.table.lock().await;
        table
            .start_order
            .iter()
            .filter_map(|id| table.instances.get(id).cloned())
            .collect()
    }

    async fn start_one(
        &self,
        id: &ComponentId,
        overrides: &Overrides,
    ) -> Result<ComponentInstance, StartError> {
        let descriptor = self
            .registry
            .get(id.as_str())
            .map_err(|_| StartError::UnknownComponent {
                identity: id.clone(),
            })?;

        // STOPPED -> STARTING under the table lock
        let adapter = {
            let mut table = self.table.lock().await;
            if let Some(existing) = table.instances.get(id) {
                match existing.state() {
                    LifecycleState::Started => {
                        log::info!("{} is already started", id);
                        return Ok(existing.clone());
                    }
                    LifecycleState::Stopped => {}
                    state => {
                        log::error!("{} is {} and cannot be started", id, state);
                        return Err(StartError::InvalidState {
                            identity: id.clone(),
                            state,
                        });
                    }
                }
            }

            let mut base = ConfigOverlay::resolve(descriptor.defaults(), self.source.values());
            let mut blocked = None;
            for dependency in descriptor.dependencies() {
                match table.instances.get(dependency) {
                    Some(dep) if dep.is_started() => {
                        base = ConfigOverlay::resolve(&base, &dep.configuration());
                    }
                    other => {
                        let state = other.map(ComponentInstance::state).unwrap_or_default();
                        blocked = Some((dependency.clone(), state));
                        break;
                    }
                }
            }

            let resolved = match overrides.get(id) {
                Some(component_overrides) => {
                    let ignored = ConfigOverlay::unrecognized(&base, component_overrides);
                    if !ignored.is_empty() {
                        log::warn!("Ignoring unrecognized override keys for {}: {:?}", id, ignored);
                    }
                    ConfigOverlay::resolve(&base, component_overrides)
                }
                None => base,
            };

            let artifact = self.artifact_for(&descriptor);
            let mut instance = ComponentInstance::new(
                descriptor.clone(),
                resolved,
                artifact.as_ref().ok().cloned().flatten(),
            );

            let failure = if let Some((dependency, state)) = blocked {
                Some(StartError::DependencyNotStarted {
                    identity: id.clone(),
                    dependency,
                    state,
                })
            } else if let Err(source) = artifact {
                Some(StartError::Config {
                    identity: id.clone(),
                    source,
                })
            } else {
                None
            };
            if let Some(err) = failure {
                log::error!("{}", err);
                instance.record_failure(err.to_string());
                table.insert(instance);
                return Err(err);
            }

            let adapter = match instance.begin_start() {
                Ok(Some(adapter)) => adapter,
                Ok(None) => {
                    return Err(StartError::InvalidState {
                        identity: id.clone(),
                        state: instance.state(),
                    });
                }
                Err(source) => {
                    let err = StartError::Adapter {
                        identity: id.clone(),
                        source,
                    };
                    log::error!("{}", err);
                    instance.record_failure(err.to_string());
                    table.insert(instance);
                    return Err(err);
                }
            };

            match instance.artifact() {
                Some(artifact) => log::info!("{} is starting ({})", id, artifact),
                None => log::info!("{} is starting", id),
            }
            table.insert(instance);
            adapter
        };

        // Adapter call, outside the lock
        let timeout = self.settings.start_timeout_for(id.as_str());
        let result = match run_bounded(timeout, adapter.start()).await {
            Some(Ok(())) => Ok(()),
            Some(Err(source)) => Err(StartError::Adapter {
                identity: id.clone(),
                source,
            }),
            None => Err(StartError::Timeout {
                identity: id.clone(),
                timeout: timeout.unwrap_or_default(),
            }),
        };

        // STARTING -> STARTED, or stay STARTING on failure
        let mut table = self.table.lock().await;
        let InstanceTable {
            instances,
            start_order,
            ..
        } = &mut *table;
        let Some(instance) = instances.get_mut(id) else {
            return Err(StartError::InvalidState {
                identity: id.clone(),
                state: LifecycleState::Stopped,
            });
        };

        match result {
            Ok(()) => {
                instance
                    .complete_start()
                    .map_err(|transition| StartError::InvalidState {
                        identity: id.clone(),
                        state: transition.from,
                    })?;
                if !start_order.contains(id) {
                    start_order.push(id.clone());
                }
                log::info!("{} is started: {}", id, adapter.properties().trim());
                Ok(instance.clone())
            }
            Err(err) => {
                log::error!(
                    "{} is left in {}: its resources may still be held, call reset() once they are safe to release. Cause: {}",
                    id,
                    instance.state(),
                    err
                );
                instance.record_failure(err.to_string());
                Err(err)
            }
        }
    }

    async fn stop_one(&self, id: &ComponentId) -> Result<(), StopError> {
        // STARTED -> STOPPING under the table lock
        let adapter = {
            let mut table = self.table.lock().await;
            let Some(instance) = table.instances.get_mut(id) else {
                return Err(StopError::UnknownComponent {
                    identity: id.clone(),
                });
            };
            match instance.state() {
                LifecycleState::Stopped => {
                    log::debug!("{} is already stopped", id);
                    return Ok(());
                }
                LifecycleState::Started => {}
                state => {
                    log::error!("{} is {} and needs a reset before it can be stopped", id, state);
                    return Err(StopError::NeedsReset {
                        identity: id.clone(),
                        state,
                    });
                }
            }
            match instance.begin_stop() {
                Some(adapter) => adapter,
                None => return Ok(()),
            }
        };
        log::info!("{} is stopping", id);

        let timeout = self.settings.stop_timeout;
        let stopped = match run_bounded(timeout, adapter.stop()).await {
            Some(Ok(())) => Ok(()),
            Some(Err(source)) => Err(StopError::Adapter {
                identity: id.clone(),
                source,
            }),
            None => Err(StopError::Timeout {
                identity: id.clone(),
                timeout: timeout.unwrap_or_default(),
            }),
        };
        // On-disk cleanup runs whether or not the stop worked
        let cleaned = adapter.cleanup().await.map_err(|source| StopError::Cleanup {
            identity: id.clone(),
            source,
        });

        {
            let mut table = self.table.lock().await;
            table.start_order.retain(|started| started != id);
            if let Some(instance) = table.instances.get_mut(id) {
                instance.complete_stop();
                if let Err(err) = stopped.as_ref().and(cleaned.as_ref()) {
                    instance.record_failure(err.to_string());
                }
            }
        }

        match (stopped, cleaned) {
            (Ok(()), Ok(())) => {
                log::info!("{} is stopped", id);
                Ok(())
            }
            (Err(err), cleaned) => {
                if let Err(cleanup_err) = cleaned {
                    log::error!("{}", cleanup_err);
                }
                log::warn!("{}; forced to {}", err, LifecycleState::Stopped);
                Err(err)
            }
            (Ok(()), Err(err)) => {
                log::warn!("{}; {} is stopped", err, id);
                Err(err)
            }
        }
    }

    fn artifact_for(&self, descriptor: &ComponentDescriptor) -> Result<Option<Artifact>, ConfigError> {
        match self.source.get(descriptor.artifact_key()) {
            Some(value) if !value.trim().is_empty() => {
                Artifact::parse(descriptor.artifact_key(), value).map(Some)
            }
            _ => Ok(None),
        }
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        if let Ok(table) = self.table.try_lock() {
            if !table.start_order.is_empty() {
                log::warn!(
                    "Orchestrator dropped with components still running: {}",
                    join_ids(&table.start_order)
                );
            }
        }
    }
}

/// `None` when the call did not finish within `timeout`.
async fn run_bounded<F>(timeout: Option<Duration>, call: F) -> Option<Result<(), AdapterError>>
where
    F: Future<Output = Result<(), AdapterError>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, call).await.ok(),
        None => Some(call.await),
    }
}

fn join_ids(ids: &[ComponentId]) -> String {
    ids.iter()
        .map(ComponentId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
