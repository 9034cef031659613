use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::AppError;
use crate::similarity::{SimilarityMatcher, DEFAULT_DISTANCE_RATE, DEFAULT_SEARCH_MARGIN};
use crate::subtitle_processor::{ResyncPolicy, DEFAULT_MIN_MATCHES};

/// Application configuration module
/// This module handles loading, validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Similarity matching policy
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Output file naming
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Similarity matching configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MatchingConfig {
    // @field: Accepted distance as a fraction of the text length
    #[serde(default = "default_distance_rate")]
    pub distance_rate: f64,

    // @field: Entries searched on each side of the expected position
    #[serde(default = "default_search_margin")]
    pub search_margin: usize,

    // @field: Matches required for a resync to succeed
    #[serde(default = "default_min_matches")]
    pub min_matches: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            distance_rate: default_distance_rate(),
            search_margin: default_search_margin(),
            min_matches: default_min_matches(),
        }
    }
}

impl MatchingConfig {
    /// Build the resync policy described by this configuration
    pub fn to_policy(&self) -> ResyncPolicy {
        ResyncPolicy {
            matcher: SimilarityMatcher::new(self.distance_rate, self.search_margin),
            min_matches: self.min_matches,
        }
    }
}

/// Output naming configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    // @field: Inserted between file stem and extension of generated files
    #[serde(default = "default_output_suffix")]
    pub suffix: String,

    // @field: Extension of generated files
    #[serde(default = "default_output_extension")]
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: default_output_suffix(),
            extension: default_output_extension(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log crate
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_distance_rate() -> f64 {
    DEFAULT_DISTANCE_RATE
}

fn default_search_margin() -> usize {
    DEFAULT_SEARCH_MARGIN
}

fn default_min_matches() -> usize {
    DEFAULT_MIN_MATCHES
}

fn default_output_suffix() -> String {
    "resync".to_string()
}

fn default_output_extension() -> String {
    "srt".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> std::result::Result<(), AppError> {
        let matching = &self.matching;

        if !(matching.distance_rate > 0.0 && matching.distance_rate <= 1.0) {
            return Err(AppError::Config(format!(
                "distance_rate must be in (0, 1], got {}",
                matching.distance_rate
            )));
        }

        if matching.search_margin == 0 {
            return Err(AppError::Config("search_margin must be at least 1".to_string()));
        }

        if matching.min_matches == 0 {
            return Err(AppError::Config("min_matches must be at least 1".to_string()));
        }

        if self.output.suffix.trim().is_empty() || self.output.extension.trim().is_empty() {
            return Err(AppError::Config("output suffix and extension must not be empty".to_string()));
        }

        Ok(())
    }

    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Save the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;

        Ok(())
    }

    /// Load the configuration at `path`, creating it with defaults when missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }
}
