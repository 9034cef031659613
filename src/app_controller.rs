use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::subtitle_processor::{Layout, MatchPair, SubtitleDocument};

// @module: Application controller for subtitle processing

/// Summary of a parsed subtitle file
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub path: PathBuf,
    pub layout: Option<Layout>,
    pub entries: usize,
}

/// Result of a resync run
#[derive(Debug, Clone, PartialEq)]
pub struct ResyncReport {
    pub matches: Vec<MatchPair>,
    /// Written file, `None` when only matches were computed
    pub output: Option<PathBuf>,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// Parse a file and report what was found
    pub fn check(&self, input_file: &Path) -> Result<CheckReport> {
        let document = Self::load(input_file)?;

        Ok(CheckReport {
            path: input_file.to_path_buf(),
            layout: document.layout(),
            entries: document.len(),
        })
    }

    /// Parse a file and write it back in the indexed layout
    pub fn normalize(&self, input_file: &Path, output_file: Option<PathBuf>, force_overwrite: bool) -> Result<PathBuf> {
        let output_file = output_file.unwrap_or_else(|| self.default_output_path(input_file));
        FileManager::check_output(&output_file, &[input_file], force_overwrite)?;

        let document = Self::load(input_file)?;
        document
            .write_file(&output_file)
            .with_context(|| format!("Failed to write normalized subtitles for {:?}", input_file))?;

        info!("Success: {}", output_file.display());
        Ok(output_file)
    }

    /// Resync `input_file` onto the timing of `timing_file`.
    ///
    /// With `matches_only` the match set is computed and nothing is written.
    pub fn resync(
        &self,
        input_file: &Path,
        timing_file: &Path,
        output_file: Option<PathBuf>,
        force_overwrite: bool,
        matches_only: bool,
    ) -> Result<ResyncReport> {
        let output_file = if matches_only {
            None
        } else {
            let output_file = output_file.unwrap_or_else(|| self.default_output_path(input_file));
            FileManager::check_output(&output_file, &[input_file, timing_file], force_overwrite)?;
            Some(output_file)
        };

        let mut document = Self::load(input_file)?;
        let source = Self::load(timing_file)?;

        let policy = self.config.matching.to_policy();
        debug!("Resync policy: {:?}", policy);

        let matches = document
            .resync_with(&source, &policy)
            .with_context(|| format!("Failed to resync {:?} with {:?}", input_file, timing_file))?;

        let Some(output_file) = output_file else {
            return Ok(ResyncReport { matches, output: None });
        };

        document
            .apply_retiming(&source, &matches)
            .context("Failed to retime subtitles")?;
        document
            .write_file(&output_file)
            .with_context(|| format!("Failed to write resynced subtitles for {:?}", input_file))?;

        info!("Success: {}", output_file.display());
        Ok(ResyncReport {
            matches,
            output: Some(output_file),
        })
    }

    fn default_output_path(&self, input_file: &Path) -> PathBuf {
        FileManager::generate_output_path(input_file, &self.config.output.suffix, &self.config.output.extension)
    }

    fn load(path: &Path) -> Result<SubtitleDocument> {
        let mut document = SubtitleDocument::new();
        document
            .parse_file(path)
            .with_context(|| format!("Failed to parse subtitle file: {:?}", path))?;
        Ok(document)
    }
}
