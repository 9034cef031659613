/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use subresync::app_config::{Config, LogLevel, MatchingConfig};
use subresync::errors::AppError;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.matching.distance_rate, 0.6);
    assert_eq!(config.matching.search_margin, 10);
    assert_eq!(config.matching.min_matches, 3);
    assert_eq!(config.output.suffix, "resync");
    assert_eq!(config.output.extension, "srt");
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withInvalidValues_shouldFail() {
    let mut config = Config::default();
    config.matching.distance_rate = 0.0;
    assert!(matches!(config.validate(), Err(AppError::Config(_))));

    config.matching.distance_rate = 1.5;
    assert!(config.validate().is_err());

    config.matching.distance_rate = 1.0;
    assert!(config.validate().is_ok());

    config.matching.search_margin = 0;
    assert!(config.validate().is_err());
    config.matching.search_margin = 5;

    config.matching.min_matches = 0;
    assert!(config.validate().is_err());
    config.matching.min_matches = 1;

    config.output.suffix = " ".to_string();
    assert!(config.validate().is_err());
}

/// Test that missing fields fall back to defaults
#[test]
fn test_config_deserialize_withPartialJson_shouldFillDefaults() -> Result<()> {
    let config: Config = serde_json::from_str(r#"{ "matching": { "search_margin": 4 }, "log_level": "debug" }"#)?;

    assert_eq!(config.matching.search_margin, 4);
    assert_eq!(config.matching.min_matches, 3);
    assert_eq!(config.output.suffix, "resync");
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

/// Test that the policy built from config carries its values
#[test]
fn test_matchingConfig_toPolicy_shouldCopyValues() {
    let matching = MatchingConfig {
        distance_rate: 0.3,
        search_margin: 2,
        min_matches: 5,
    };
    let policy = matching.to_policy();

    assert_eq!(policy.min_matches, 5);
    assert_eq!(policy.matcher.search_margin(), 2);
    assert_eq!(policy.matcher.distance_rate(), 0.3);
}

/// Test creating, then re-loading a config file
#[test]
fn test_config_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(created, Config::default());

    let mut changed = created.clone();
    changed.matching.min_matches = 7;
    changed.save(&path)?;

    assert_eq!(Config::load_or_create(&path)?.matching.min_matches, 7);
    Ok(())
}

/// Test that a malformed file is reported
#[test]
fn test_config_fromFile_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::from_file(&path).is_err());
    Ok(())
}

/// Test the mapping to log filters
#[test]
fn test_logLevel_toLevelFilter_shouldMapEveryLevel() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
