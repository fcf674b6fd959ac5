use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Root directory for generated subtitles, tables, and audio
    #[serde(default = "default_output_root")]
    pub output_root: String,

    /// Directory holding the persistent duration cache
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    /// Reciter used when none is given on the command line
    #[serde(default = "default_reciter")]
    pub default_reciter: u32,

    /// Translator name query used when none is given on the command line
    #[serde(default = "default_translation_query")]
    pub default_translation: String,

    /// Number of chapters in the work; the sweep covers 1..=total_chapters
    #[serde(default = "default_total_chapters")]
    pub total_chapters: u32,

    /// External API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Courtesy delay between chapters during a full sweep
    #[serde(default = "default_sweep_delay_ms")]
    pub sweep_delay_ms: u64,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for the external catalog and text APIs
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiConfig {
    // @field: Quran.com API v4 base URL
    #[serde(default = "default_quran_com_base")]
    pub quran_com_base: String,

    // @field: AlQuran Cloud API base URL
    #[serde(default = "default_alquran_cloud_base")]
    pub alquran_cloud_base: String,

    // @field: Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Max retry attempts for retryable failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    // @field: Base backoff in milliseconds for exponential backoff
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

/// Log level configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level
    #[default]
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

fn default_output_root() -> String {
    "output".to_string()
}

fn default_cache_dir() -> String {
    "cache".to_string()
}

fn default_reciter() -> u32 {
    7
}

fn default_translation_query() -> String {
    "Muhammad Sodiq Muhammad Yusuf (Latin)".to_string()
}

fn default_total_chapters() -> u32 {
    114
}

fn default_quran_com_base() -> String {
    "https://api.quran.com/api/v4".to_string()
}

fn default_alquran_cloud_base() -> String {
    "https://api.alquran.cloud/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    300
}

fn default_sweep_delay_ms() -> u64 {
    100
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            quran_com_base: default_quran_com_base(),
            alquran_cloud_base: default_alquran_cloud_base(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_root: default_output_root(),
            cache_dir: default_cache_dir(),
            default_reciter: default_reciter(),
            default_translation: default_translation_query(),
            total_chapters: default_total_chapters(),
            api: ApiConfig::default(),
            sweep_delay_ms: default_sweep_delay_ms(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load the configuration from the given path. When the file does not
    /// exist yet, a default configuration is written there and returned.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);

            serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            warn!("Config file not found at '{}', creating default config.", path.display());

            let config = Self::default();
            let config_json = serde_json::to_string_pretty(&config)
                .context("Failed to serialize default config to JSON")?;
            std::fs::write(path, config_json).with_context(|| {
                format!("Failed to write default config to file: {}", path.display())
            })?;

            Ok(config)
        }
    }

    /// Validate the configuration after loading and CLI overrides
    pub fn validate(&self) -> Result<()> {
        if self.output_root.trim().is_empty() {
            return Err(anyhow!("output_root must not be empty"));
        }

        if self.cache_dir.trim().is_empty() {
            return Err(anyhow!("cache_dir must not be empty"));
        }

        if self.total_chapters == 0 {
            return Err(anyhow!("total_chapters must be at least 1"));
        }

        if self.api.timeout_secs == 0 {
            return Err(anyhow!("api.timeout_secs must be at least 1"));
        }

        if self.api.quran_com_base.trim().is_empty() || self.api.alquran_cloud_base.trim().is_empty()
        {
            return Err(anyhow!("API base URLs must not be empty"));
        }

        Ok(())
    }

    /// Path of the persistent duration cache file
    pub fn duration_cache_path(&self) -> PathBuf {
        PathBuf::from(&self.cache_dir).join("audio_durations.json")
    }
}
