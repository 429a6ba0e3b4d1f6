//! Configuration Module Tests
//!
//! Tests for GroupRunnerConfig defaults and layered loading.

use config::Config;
use reconcile_group::{GroupRunnerConfig, ParallelGroupRunner, ENV_PREFIX};

#[test]
fn config_has_expected_defaults() {
    let config = GroupRunnerConfig::default();

    assert_eq!(config.name, "group-runner");
    assert!(config.capture_panics);
}

#[test]
fn config_from_builder_with_no_sources_matches_defaults() {
    let config =
        GroupRunnerConfig::from_builder(Config::builder()).expect("empty builder should load");
    assert_eq!(config, GroupRunnerConfig::default());
}

#[test]
fn config_from_builder_applies_overrides() {
    let builder = Config::builder()
        .set_override("name", "milvus-cluster")
        .and_then(|b| b.set_override("capture_panics", false))
        .expect("overrides should be accepted");

    let config = GroupRunnerConfig::from_builder(builder).expect("config should load");
    assert_eq!(config.name, "milvus-cluster");
    assert!(!config.capture_panics);

    let runner = ParallelGroupRunner::with_config(config.clone());
    assert_eq!(runner.config(), &config);
}

// The only test in this binary that touches the process environment
#[test]
fn config_from_env_reads_prefixed_variables() {
    let name_var = format!("{ENV_PREFIX}_NAME");
    let capture_var = format!("{ENV_PREFIX}_CAPTURE_PANICS");
    std::env::set_var(&name_var, "env-cluster");
    std::env::set_var(&capture_var, "false");

    let loaded = GroupRunnerConfig::from_env();

    std::env::remove_var(&name_var);
    std::env::remove_var(&capture_var);

    let config = loaded.expect("environment config should load");
    assert_eq!(config.name, "env-cluster");
    assert!(!config.capture_panics);
}
