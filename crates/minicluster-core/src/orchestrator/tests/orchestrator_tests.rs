#![cfg(test)]

use std::sync::Arc;
use std::time::Duration;

use crate::component::{ComponentId, ComponentRegistry, LifecycleState};
use crate::config::{ConfigError, ConfigSource};
use crate::dependency::ResolutionError;
use crate::kernel::error::Error as KernelError;
use crate::orchestrator::{Orchestrator, OrchestratorSettings, Overrides, StartError, StopError};
use crate::tests::common::{CallLog, MockBehavior, config, mock_descriptor, plain, registry_of};

fn orchestrator(registry: Arc<ComponentRegistry>) -> Orchestrator {
    Orchestrator::new(registry, ConfigSource::new())
}

fn no_overrides() -> Overrides {
    Overrides::new()
}

fn names(ids: &[ComponentId]) -> Vec<&str> {
    ids.iter().map(ComponentId::as_str).collect()
}

fn chain(log: &Arc<CallLog>) -> Arc<ComponentRegistry> {
    registry_of(vec![
        plain("A", &[], log),
        plain("B", &["A"], log),
        plain("C", &["B"], log),
    ])
}

#[tokio::test]
async fn test_start_all_starts_dependencies_first() {
    let log = CallLog::new();
    let orchestrator = orchestrator(chain(&log));

    let outcomes = orchestrator.start_all(["C"], &no_overrides()).await.unwrap();

    assert!(outcomes.is_success());
    let ids: Vec<&str> = outcomes.ids().map(ComponentId::as_str).collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
    assert_eq!(log.of("start"), vec!["A", "B", "C"]);
    for id in ["A", "B", "C"] {
        assert_eq!(orchestrator.state_of(id).await, Some(LifecycleState::Started));
    }
    assert_eq!(names(&orchestrator.start_order().await), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_stop_all_reverses_start_order() {
    let log = CallLog::new();
    let orchestrator = orchestrator(chain(&log));
    orchestrator.start_all(["C"], &no_overrides()).await.unwrap();

    let outcomes = orchestrator.stop_all().await;

    assert!(outcomes.is_success());
    let mut started = log.of("start");
    started.reverse();
    assert_eq!(log.of("stop"), started);
    // Each stop is followed by that component's cleanup
    let tail: Vec<String> = log
        .events()
        .into_iter()
        .filter(|e| e.starts_with("stop:") || e.starts_with("cleanup:"))
        .collect();
    assert_eq!(
        tail,
        vec!["stop:C", "cleanup:C", "stop:B", "cleanup:B", "stop:A", "cleanup:A"]
    );
    for id in ["A", "B", "C"] {
        assert_eq!(orchestrator.state_of(id).await, Some(LifecycleState::Stopped));
    }
    assert!(orchestrator.running().await.is_empty());
}

#[tokio::test]
async fn test_second_stop_is_a_noop() {
    let log = CallLog::new();
    let orchestrator = orchestrator(chain(&log));
    orchestrator.start_all(["B"], &no_overrides()).await.unwrap();
    orchestrator.stop_all().await;

    let again = orchestrator.stop_all().await;

    assert!(again.is_success());
    assert_eq!(again.len(), 2);
    assert_eq!(log.count("stop:A"), 1);
    assert_eq!(log.count("cleanup:B"), 1);
}

#[tokio::test]
async fn test_second_start_is_idempotent() {
    let log = CallLog::new();
    let orchestrator = orchestrator(chain(&log));
    orchestrator.start_all(["C"], &no_overrides()).await.unwrap();

    let again = orchestrator.start_all(["C", "A"], &no_overrides()).await.unwrap();

    assert!(again.is_success());
    assert_eq!(log.count("start:A"), 1);
    assert_eq!(log.count("construct:C"), 1);
    assert_eq!(names(&orchestrator.start_order().await), vec!["A", "B", "C"]);
    match again.get("C") {
        Some(Ok(instance)) => assert!(instance.is_started()),
        other => panic!("Expected C to be reported as started, got {:?}", other),
    }
}

#[tokio::test]
async fn test_independent_components_survive_a_failure() {
    let log = CallLog::new();
    let registry = registry_of(vec![
        mock_descriptor("X", &[], &log, MockBehavior::failing_start()),
        plain("Y", &[], &log),
    ]);
    let orchestrator = orchestrator(registry);

    let outcomes = orchestrator.start_all(["X", "Y"], &no_overrides()).await.unwrap();

    assert!(matches!(outcomes.get("X"), Some(Err(StartError::Adapter { .. }))));
    assert!(matches!(outcomes.get("Y"), Some(Ok(_))));
    assert_eq!(orchestrator.state_of("X").await, Some(LifecycleState::Starting));
    assert_eq!(orchestrator.state_of("Y").await, Some(LifecycleState::Started));

    let stuck = orchestrator.lookup("X").await.unwrap();
    assert!(stuck.last_error().unwrap().contains("refused to start"));
    assert!(stuck.handle().is_some());
}

#[tokio::test]
async fn test_dependent_of_failed_component_is_not_started() {
    let log = CallLog::new();
    let registry = registry_of(vec![
        mock_descriptor("HDFS", &[], &log, MockBehavior::failing_start()),
        plain("HIVEMETA", &["HDFS"], &log),
        plain("ZOOKEEPER", &[], &log),
    ]);
    let orchestrator = orchestrator(registry);

    let outcomes = orchestrator
        .start_all(["HIVEMETA", "ZOOKEEPER"], &no_overrides())
        .await
        .unwrap();

    match outcomes.get("HIVEMETA") {
        Some(Err(StartError::DependencyNotStarted {
            dependency, state, ..
        })) => {
            assert_eq!(dependency.as_str(), "HDFS");
            assert_eq!(*state, LifecycleState::Starting);
        }
        other => panic!("Expected DependencyNotStarted, got {:?}", other),
    }
    assert!(matches!(outcomes.get("ZOOKEEPER"), Some(Ok(_))));
    assert_eq!(log.count("construct:HIVEMETA"), 0);
    assert_eq!(orchestrator.state_of("HIVEMETA").await, Some(LifecycleState::Stopped));
}

#[tokio::test]
async fn test_stop_all_skips_components_that_never_started() {
    let log = CallLog::new();
    let registry = registry_of(vec![
        plain("X", &[], &log),
        mock_descriptor(
            "Y",
            &[],
            &log,
            MockBehavior {
                fail_construct: true,
                ..MockBehavior::default()
            },
        ),
    ]);
    let orchestrator = orchestrator(registry);

    let started = orchestrator.start_all(["X", "Y"], &no_overrides()).await.unwrap();
    assert!(matches!(started.get("Y"), Some(Err(StartError::Adapter { .. }))));
    assert_eq!(orchestrator.state_of("Y").await, Some(LifecycleState::Stopped));

    let stopped = orchestrator.stop_all().await;

    assert_eq!(log.of("stop"), vec!["X"]);
    assert!(matches!(stopped.get("X"), Some(Ok(()))));
    assert!(matches!(stopped.get("Y"), Some(Ok(()))));
}

#[tokio::test]
async fn test_stop_all_reports_stuck_components() {
    let log = CallLog::new();
    let registry = registry_of(vec![mock_descriptor("X", &[], &log, MockBehavior::failing_start())]);
    let orchestrator = orchestrator(registry);
    orchestrator.start_all(["X"], &no_overrides()).await.unwrap();

    let stopped = orchestrator.stop_all().await;

    let err = match stopped.get("X") {
        Some(Err(err)) => err,
        other => panic!("expected a stop error for X, got {:?}", other),
    };
    assert!(matches!(
        err,
        StopError::NeedsReset { state: LifecycleState::Starting, .. }
    ));
    assert!(err.to_string().contains("reset"), "{}", err);
    assert_eq!(log.count("stop:X"), 0);
}

#[tokio::test]
async fn test_unknown_requested_identity_is_reported_and_skipped() {
    let log = CallLog::new();
    let orchestrator = orchestrator(chain(&log));

    let outcomes = orchestrator.start_all(["GHOST", "A"], &no_overrides()).await.unwrap();

    assert!(matches!(
        outcomes.get("GHOST"),
        Some(Err(StartError::UnknownComponent { identity })) if identity.as_str() == "GHOST"
    ));
    assert!(matches!(outcomes.get("A"), Some(Ok(_))));
    assert!(orchestrator.lookup("GHOST").await.is_none());
}

#[tokio::test]
async fn test_unknown_dependency_aborts_before_any_start() {
    let log = CallLog::new();
    let registry = registry_of(vec![plain("A", &[], &log), plain("HIVEMETA", &["HDFS"], &log)]);
    let orchestrator = orchestrator(registry);

    let result = orchestrator.start_all(["A", "HIVEMETA"], &no_overrides()).await;

    assert!(matches!(
        result,
        Err(KernelError::Resolution(ResolutionError::UnknownDependency { .. }))
    ));
    assert!(log.events().is_empty());
    assert!(orchestrator.lookup("A").await.is_none());
}

#[tokio::test]
async fn test_cycle_aborts_before_any_start() {
    let log = CallLog::new();
    let registry = registry_of(vec![
        plain("FREE", &[], &log),
        plain("A", &["B"], &log),
        plain("B", &["A"], &log),
    ]);
    let orchestrator = orchestrator(registry);

    let result = orchestrator.start_all(["FREE", "A"], &no_overrides()).await;

    match result {
        Err(KernelError::Resolution(ResolutionError::CyclicDependency { cycle })) => {
            assert_eq!(names(&cycle), vec!["A", "B"]);
        }
        other => panic!("Expected a cycle error, got {:?}", other.map(|o| o.len())),
    }
    assert!(log.events().is_empty());
}

#[tokio::test]
async fn test_configuration_layering() {
    let log = CallLog::new();
    let registry = registry_of(vec![plain("HDFS", &[], &log)]);
    let source = ConfigSource::from_pairs([("hdfs.port", "20112"), ("hdfs.host", "")]);
    let orchestrator = Orchestrator::new(registry, source);

    let mut overrides = Overrides::new();
    overrides.insert(
        ComponentId::from("HDFS"),
        config(&[("hdfs.host", "0.0.0.0"), ("hdfs.unknown", "ignored")]),
    );
    orchestrator.start_all(["HDFS"], &overrides).await.unwrap();

    let instance = orchestrator.lookup("HDFS").await.unwrap();
    assert_eq!(
        instance.resolved_config(),
        &config(&[("hdfs.port", "20112"), ("hdfs.host", "0.0.0.0")])
    );
}

#[tokio::test]
async fn test_empty_override_keeps_default() {
    let log = CallLog::new();
    let orchestrator = orchestrator(registry_of(vec![plain("HDFS", &[], &log)]));

    let mut overrides = Overrides::new();
    overrides.insert(ComponentId::from("HDFS"), config(&[("hdfs.port", "")]));
    orchestrator.start_all(["HDFS"], &overrides).await.unwrap();

    let instance = orchestrator.lookup("HDFS").await.unwrap();
    assert_eq!(instance.resolved_config().get("hdfs.port").map(String::as_str), Some("1000"));
}

#[tokio::test]
async fn test_dependency_settings_flow_to_dependents() {
    let log = CallLog::new();
    let registry = registry_of(vec![
        mock_descriptor("ZOOKEEPER", &[], &log, MockBehavior::publishing("zookeeper.port", "41234")),
        // Kafka recognizes the ZooKeeper port key through its defaults
        plain("KAFKA", &["ZOOKEEPER"], &log).with_default("zookeeper.port", "2181"),
    ]);
    let orchestrator = orchestrator(registry);

    orchestrator.start_all(["KAFKA"], &no_overrides()).await.unwrap();

    let zookeeper = orchestrator.lookup("ZOOKEEPER").await.unwrap();
    assert_eq!(zookeeper.configuration().get("zookeeper.port").map(String::as_str), Some("41234"));
    let kafka = orchestrator.lookup("KAFKA").await.unwrap();
    assert_eq!(kafka.resolved_config().get("zookeeper.port").map(String::as_str), Some("41234"));
    assert!(!kafka.resolved_config().contains_key("zookeeper.host"));
}

#[tokio::test]
async fn test_failed_stop_still_cleans_up_and_stops() {
    let log = CallLog::new();
    let behavior = MockBehavior {
        fail_stop: true,
        ..MockBehavior::default()
    };
    let orchestrator = orchestrator(registry_of(vec![mock_descriptor("HDFS", &[], &log, behavior)]));
    orchestrator.start_all(["HDFS"], &no_overrides()).await.unwrap();

    let outcomes = orchestrator.stop_all().await;

    assert!(matches!(outcomes.get("HDFS"), Some(Err(StopError::Adapter { .. }))));
    assert_eq!(log.count("cleanup:HDFS"), 1);
    let instance = orchestrator.lookup("HDFS").await.unwrap();
    assert_eq!(instance.state(), LifecycleState::Stopped);
    assert!(instance.handle().is_none());
    assert!(instance.last_error().is_some());
}

#[tokio::test]
async fn test_failed_cleanup_is_reported_but_component_stops() {
    let log = CallLog::new();
    let behavior = MockBehavior {
        fail_cleanup: true,
        ..MockBehavior::default()
    };
    let orchestrator = orchestrator(registry_of(vec![mock_descriptor("HDFS", &[], &log, behavior)]));
    orchestrator.start_all(["HDFS"], &no_overrides()).await.unwrap();

    let outcomes = orchestrator.stop_all().await;

    assert!(matches!(outcomes.get("HDFS"), Some(Err(StopError::Cleanup { .. }))));
    assert_eq!(orchestrator.state_of("HDFS").await, Some(LifecycleState::Stopped));
}

#[tokio::test]
async fn test_components_can_restart_after_stop() {
    let log = CallLog::new();
    let orchestrator = orchestrator(chain(&log));

    orchestrator.start_all(["B"], &no_overrides()).await.unwrap();
    orchestrator.stop_all().await;
    let outcomes = orchestrator.start_all(["B"], &no_overrides()).await.unwrap();

    assert!(outcomes.is_success());
    assert_eq!(log.of("start"), vec!["A", "B", "A", "B"]);
    assert_eq!(log.count("construct:A"), 2, "A fresh adapter per start");
    assert_eq!(names(&orchestrator.start_order().await), vec!["A", "B"]);
}

#[tokio::test(start_paused = true)]
async fn test_start_timeout_leaves_component_starting_until_reset() {
    let log = CallLog::new();
    let slow = MockBehavior {
        start_delay: Some(Duration::from_secs(60)),
        ..MockBehavior::default()
    };
    let registry = registry_of(vec![mock_descriptor("HIVESERVER2", &[], &log, slow)]);
    let settings = OrchestratorSettings::new().with_component_start_timeout("HIVESERVER2", Duration::from_secs(5));
    let orchestrator = orchestrator(registry).with_settings(settings);

    let outcomes = orchestrator.start_all(["HIVESERVER2"], &no_overrides()).await.unwrap();

    match outcomes.get("HIVESERVER2") {
        Some(Err(StartError::Timeout { timeout, .. })) => assert_eq!(*timeout, Duration::from_secs(5)),
        other => panic!("Expected a timeout, got {:?}", other),
    }
    assert_eq!(orchestrator.state_of("HIVESERVER2").await, Some(LifecycleState::Starting));

    // A second start does not touch the stuck instance
    let again = orchestrator.start_all(["HIVESERVER2"], &no_overrides()).await.unwrap();
    assert!(matches!(again.get("HIVESERVER2"), Some(Err(StartError::InvalidState { .. }))));
    assert_eq!(log.count("start:HIVESERVER2"), 1);

    orchestrator.reset("HIVESERVER2").await.unwrap();
    assert_eq!(log.count("stop:HIVESERVER2"), 1);
    assert_eq!(log.count("cleanup:HIVESERVER2"), 1);
    assert_eq!(orchestrator.state_of("HIVESERVER2").await, Some(LifecycleState::Stopped));
}

#[tokio::test]
async fn test_reset_rules() {
    let log = CallLog::new();
    let orchestrator = orchestrator(chain(&log));

    assert!(matches!(
        orchestrator.reset("A").await,
        Err(StopError::UnknownComponent { .. })
    ));

    orchestrator.start_all(["A"], &no_overrides()).await.unwrap();
    assert!(matches!(
        orchestrator.reset("A").await,
        Err(StopError::InvalidState { state: LifecycleState::Started, .. })
    ));

    orchestrator.stop_all().await;
    assert!(orchestrator.reset("A").await.is_ok());
    assert_eq!(log.count("stop:A"), 1);
}

#[tokio::test]
async fn test_valid_artifact_is_recorded() {
    let log = CallLog::new();
    let source = ConfigSource::from_pairs([("hdfs.artifact", "fr.jetoile.hadoop:hadoop-unit-hdfs:3.2")]);
    let orchestrator = Orchestrator::new(registry_of(vec![plain("HDFS", &[], &log)]), source);

    orchestrator.start_all(["HDFS"], &no_overrides()).await.unwrap();

    let instance = orchestrator.lookup("HDFS").await.unwrap();
    let artifact = instance.artifact().expect("artifact recorded");
    assert_eq!(artifact.name, "hadoop-unit-hdfs");
    assert_eq!(artifact.version, semver::Version::new(3, 2, 0));
}

#[tokio::test]
async fn test_invalid_artifact_fails_only_that_component() {
    let log = CallLog::new();
    let source = ConfigSource::from_pairs([("hdfs.artifact", "hadoop-unit-hdfs")]);
    let registry = registry_of(vec![plain("HDFS", &[], &log), plain("ZOOKEEPER", &[], &log)]);
    let orchestrator = Orchestrator::new(registry, source);

    let outcomes = orchestrator.start_all(["HDFS", "ZOOKEEPER"], &no_overrides()).await.unwrap();

    assert!(matches!(
        outcomes.get("HDFS"),
        Some(Err(StartError::Config {
            source: ConfigError::InvalidArtifact { .. },
            ..
        }))
    ));
    assert!(matches!(outcomes.get("ZOOKEEPER"), Some(Ok(_))));
    assert_eq!(log.count("construct:HDFS"), 0);
    assert_eq!(orchestrator.state_of("HDFS").await, Some(LifecycleState::Stopped));
}

#[tokio::test]
async fn test_concurrent_batches_are_serialized() {
    let log = CallLog::new();
    let orchestrator = Arc::new(orchestrator(chain(&log)));

    let first = tokio::spawn({
        let orchestrator = Arc::clone(&orchestrator);
        async move { orchestrator.start_all(["C"], &Overrides::new()).await.map(|o| o.is_success()) }
    });
    let second = tokio::spawn({
        let orchestrator = Arc::clone(&orchestrator);
        async move { orchestrator.start_all(["B"], &Overrides::new()).await.map(|o| o.is_success()) }
    });

    assert!(first.await.unwrap().unwrap());
    assert!(second.await.unwrap().unwrap());
    assert_eq!(log.count("start:A"), 1);
    assert_eq!(log.count("start:B"), 1);
}
