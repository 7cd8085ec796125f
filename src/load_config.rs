/// `load_config` module: loads a YAML config file, applies environment overrides and
/// turns the result into the strongly-typed configs of `cricsheet-bbb-core`.
///
/// # Responsibilities
/// - Parse the user-supplied YAML file into plain, fully defaulted sections
/// - Apply environment overrides (`CRICSHEET_ARCHIVE_URL`, `CRICSHEET_OUTPUT`)
/// - Validate and convert into [`DownloadConfig`] and [`PipelineConfig`]
///
/// Every key is optional. A missing file section falls back to the 2025
/// India v England Test series.
///
/// # Errors
/// All errors use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::{Context, Result};
use chrono::NaiveDate;
use cricsheet_bbb_core::config::{
    DateWindow, PipelineConfig, SeriesConfig, DEFAULT_MATCH_TYPE, DEFAULT_OUTPUT_PATH,
};
use cricsheet_bbb_core::download::{DownloadConfig, DEFAULT_ARCHIVE_URL, DEFAULT_TIMEOUT_SECS};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};

pub const ARCHIVE_URL_ENV: &str = "CRICSHEET_ARCHIVE_URL";
pub const OUTPUT_ENV: &str = "CRICSHEET_OUTPUT";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub download: DownloadSection,
    pub filter: FilterSection,
    pub output: OutputSection,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DownloadSection {
    pub archive_url: String,
    pub timeout_secs: u64,
}

impl Default for DownloadSection {
    fn default() -> Self {
        Self {
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSection {
    pub teams: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub match_type: String,
    pub expected_matches: Option<usize>,
}

impl Default for FilterSection {
    fn default() -> Self {
        let series = SeriesConfig::default();
        Self {
            teams: series.teams().to_vec(),
            start: series.window().start(),
            end: series.window().end(),
            match_type: DEFAULT_MATCH_TYPE.to_string(),
            expected_matches: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub path: PathBuf,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl CliConfig {
    /// Built-in defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(ARCHIVE_URL_ENV) {
            info!(url = %url, "{ARCHIVE_URL_ENV} overrides download.archive_url");
            self.download.archive_url = url;
        }
        if let Ok(path) = std::env::var(OUTPUT_ENV) {
            info!(path = %path, "{OUTPUT_ENV} overrides output.path");
            self.output.path = PathBuf::from(path);
        }
    }

    pub fn download_config(&self) -> Result<DownloadConfig> {
        if self.download.archive_url.trim().is_empty() {
            anyhow::bail!("download.archive_url must not be empty");
        }
        if self.download.timeout_secs == 0 {
            anyhow::bail!("download.timeout_secs must be greater than zero");
        }
        Ok(DownloadConfig {
            archive_url: self.download.archive_url.clone(),
            timeout: Duration::from_secs(self.download.timeout_secs),
        })
    }

    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let filter = &self.filter;
        if filter.expected_matches == Some(0) {
            anyhow::bail!("filter.expected_matches must be at least 1 when set");
        }
        let window = DateWindow::new(filter.start, filter.end).context("Invalid filter dates")?;
        let series = SeriesConfig::new(filter.teams.clone(), window, filter.match_type.clone())
            .context("Invalid filter section")?
            .with_expected_matches(filter.expected_matches);
        Ok(PipelineConfig {
            series,
            output_path: self.output.path.clone(),
        })
    }
}

/// Loads a YAML config file and applies environment overrides on top.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let mut config: CliConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    config.apply_env_overrides();
    Ok(config)
}
