#![cfg(test)]

use crate::component::AdapterError;
use crate::tests::common::config;
use crate::utils::{parse_or, parse_required, required};

#[test]
fn test_required_trims_and_rejects_empty() {
    let settings = config(&[("zookeeper.host", " localhost "), ("zookeeper.temp.dir", "")]);
    assert_eq!(required(&settings, "zookeeper.host").unwrap(), "localhost");
    assert!(matches!(
        required(&settings, "zookeeper.temp.dir"),
        Err(AdapterError::MissingConfig(ref key)) if key == "zookeeper.temp.dir"
    ));
    assert!(matches!(required(&settings, "absent"), Err(AdapterError::MissingConfig(_))));
}

#[test]
fn test_parse_required() {
    let settings = config(&[("zookeeper.port", "22010"), ("hdfs.namenode.port", "http")]);
    assert_eq!(parse_required::<u16>(&settings, "zookeeper.port").unwrap(), 22010);
    match parse_required::<u16>(&settings, "hdfs.namenode.port") {
        Err(AdapterError::InvalidConfig { key, value, .. }) => {
            assert_eq!(key, "hdfs.namenode.port");
            assert_eq!(value, "http");
        }
        other => panic!("Expected InvalidConfig, got {:?}", other),
    }
}

#[test]
fn test_parse_or_falls_back_only_when_absent() {
    let settings = config(&[("debug", ""), ("broker.id", "x")]);
    assert!(!parse_or(&settings, "debug", false).unwrap());
    assert!(parse_or(&settings, "missing", true).unwrap());
    assert!(parse_or::<u32>(&settings, "broker.id", 0).is_err());
}
