//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! Host overrides > Environment variables > Config file > Defaults

use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use windsite_core::config::{ConfigOverrides, ConfigSource, LayeredConfig};

#[test]
fn test_default_configuration() {
    let config = LayeredConfig::with_defaults();

    assert_eq!(config.duplicate_radius_km.value, 1.0);
    assert_eq!(config.duplicate_radius_km.source, ConfigSource::Default);
    assert_eq!(config.session_ttl_secs.value, 604_800);
    assert_eq!(config.session_cache_ttl_secs.value, 300);
    assert_eq!(config.history_limit.value, 10);
    assert_eq!(config.name_attempt_limit.value, 1000);
    assert_eq!(config.suggestion_limit.value, 5);
}

#[test]
fn test_file_overrides_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
duplicate_radius_km = 2.5
session_ttl_secs = 86400
session_cache_ttl_secs = 60
history_limit = 20
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap();

    assert_eq!(config.duplicate_radius_km.value, 2.5);
    assert_eq!(config.duplicate_radius_km.source, ConfigSource::File);
    assert_eq!(config.session_ttl_secs.value, 86_400);
    assert_eq!(config.session_ttl_secs.source, ConfigSource::File);
    assert_eq!(config.session_cache_ttl_secs.value, 60);
    assert_eq!(config.history_limit.value, 20);
}

#[test]
fn test_partial_file_configuration() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
duplicate_radius_km = 0.5
# Only override the radius, leave others as defaults
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap();

    assert_eq!(config.duplicate_radius_km.value, 0.5);
    assert_eq!(config.duplicate_radius_km.source, ConfigSource::File);
    // These should still be defaults
    assert_eq!(config.session_ttl_secs.value, 604_800);
    assert_eq!(config.session_ttl_secs.source, ConfigSource::Default);
    assert_eq!(config.history_limit.source, ConfigSource::Default);
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    // Clear any existing env vars first
    env::remove_var("WINDSITE_DUPLICATE_RADIUS_KM");
    env::remove_var("WINDSITE_HISTORY_LIMIT");

    env::set_var("WINDSITE_DUPLICATE_RADIUS_KM", "3.0");
    env::set_var("WINDSITE_HISTORY_LIMIT", "15");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
duplicate_radius_km = 2.5
history_limit = 20
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    // Environment should override file
    assert_eq!(config.duplicate_radius_km.value, 3.0);
    assert_eq!(config.duplicate_radius_km.source, ConfigSource::Environment);
    assert_eq!(config.history_limit.value, 15);
    assert_eq!(config.history_limit.source, ConfigSource::Environment);

    // Clean up
    env::remove_var("WINDSITE_DUPLICATE_RADIUS_KM");
    env::remove_var("WINDSITE_HISTORY_LIMIT");
}

#[test]
#[serial]
fn test_invalid_environment_values_are_ignored() {
    env::remove_var("WINDSITE_DUPLICATE_RADIUS_KM");
    env::remove_var("WINDSITE_SESSION_TTL_SECS");

    env::set_var("WINDSITE_DUPLICATE_RADIUS_KM", "-1.0");
    env::set_var("WINDSITE_SESSION_TTL_SECS", "not-a-number");

    let config = LayeredConfig::with_defaults().load_from_env();

    // Invalid values should be rejected, leaving defaults in place
    assert_eq!(config.duplicate_radius_km.value, 1.0);
    assert_eq!(config.duplicate_radius_km.source, ConfigSource::Default);
    assert_eq!(config.session_ttl_secs.value, 604_800);
    assert_eq!(config.session_ttl_secs.source, ConfigSource::Default);

    env::remove_var("WINDSITE_DUPLICATE_RADIUS_KM");
    env::remove_var("WINDSITE_SESSION_TTL_SECS");
}

#[test]
#[serial]
fn test_host_overrides_all() {
    env::remove_var("WINDSITE_DUPLICATE_RADIUS_KM");
    env::set_var("WINDSITE_DUPLICATE_RADIUS_KM", "3.0");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "duplicate_radius_km = 2.5").unwrap();

    let mut config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    // Host overrides should win over everything
    config.update_from_overrides(ConfigOverrides {
        duplicate_radius_km: Some(0.25),
        ..Default::default()
    });

    assert_eq!(config.duplicate_radius_km.value, 0.25);
    assert_eq!(config.duplicate_radius_km.source, ConfigSource::Override);

    // Verify precedence levels
    assert!(ConfigSource::Override.precedence() > ConfigSource::Environment.precedence());
    assert!(ConfigSource::Environment.precedence() > ConfigSource::File.precedence());
    assert!(ConfigSource::File.precedence() > ConfigSource::Default.precedence());

    env::remove_var("WINDSITE_DUPLICATE_RADIUS_KM");
}

#[test]
fn test_configuration_source_tracking() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "duplicate_radius_km = 2.5\nhistory_limit = 20").unwrap();

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap();

    let inspection_map = config.to_inspection_map();

    // Verify we can inspect the source of each value
    assert!(inspection_map.contains_key("duplicate_radius_km"));
    assert!(inspection_map.contains_key("session_ttl_secs"));
    assert!(inspection_map.contains_key("session_cache_ttl_secs"));
    assert!(inspection_map.contains_key("history_limit"));
    assert!(inspection_map.contains_key("name_attempt_limit"));
    assert!(inspection_map.contains_key("suggestion_limit"));

    let (radius_value, radius_source) = &inspection_map["duplicate_radius_km"];
    assert_eq!(radius_value, "2.5 km");
    assert_eq!(*radius_source, ConfigSource::File);

    let (ttl_value, ttl_source) = &inspection_map["session_ttl_secs"];
    assert_eq!(ttl_value, "604800 s");
    assert_eq!(*ttl_source, ConfigSource::Default);
}

#[test]
fn test_invalid_toml_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "invalid toml content [[[").unwrap();

    let result = LayeredConfig::with_defaults().load_from_file(file.path());

    assert!(result.is_err());
}

#[test]
fn test_missing_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let non_existent = temp_dir.path().join("does_not_exist.toml");

    let result = LayeredConfig::with_defaults().load_from_file(&non_existent);

    assert!(result.is_err());
}

#[test]
#[serial]
fn test_full_configuration_workflow() {
    // This test simulates a complete configuration workflow:
    // 1. Start with defaults
    // 2. Load from file
    // 3. Override with environment
    // 4. Override from the host

    // Clear env vars first
    env::remove_var("WINDSITE_DUPLICATE_RADIUS_KM");
    env::remove_var("WINDSITE_SUGGESTION_LIMIT");

    // Create a config file
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
duplicate_radius_km = 2.5
session_ttl_secs = 86400
suggestion_limit = 3
"#,
    )
    .unwrap();

    // Set environment variables
    env::set_var("WINDSITE_SUGGESTION_LIMIT", "8");

    // Load configuration
    let mut config = LayeredConfig::with_defaults()
        .load_from_file(&config_path)
        .unwrap()
        .load_from_env();

    // Verify state after file + env
    assert_eq!(config.duplicate_radius_km.value, 2.5); // From file
    assert_eq!(config.duplicate_radius_km.source, ConfigSource::File);
    assert_eq!(config.session_ttl_secs.value, 86_400); // From file
    assert_eq!(config.suggestion_limit.value, 8); // From env
    assert_eq!(config.suggestion_limit.source, ConfigSource::Environment);

    // Apply host overrides
    config.update_from_overrides(ConfigOverrides {
        duplicate_radius_km: Some(1.5),
        ..Default::default()
    });

    // Verify final state
    assert_eq!(config.duplicate_radius_km.value, 1.5); // From host
    assert_eq!(config.duplicate_radius_km.source, ConfigSource::Override);
    assert_eq!(config.suggestion_limit.value, 8); // Still from env

    // Clean up
    env::remove_var("WINDSITE_SUGGESTION_LIMIT");
}
