use crate::core::history::{DEFAULT_DAYS, default_seed_date};
use crate::core::quote::Source;
use anyhow::{Context, Result, ensure};
use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_MINDICADOR_URL: &str = "https://mindicador.cl";
pub const DEFAULT_MOCK_LATENCY_MS: u64 = 1000;
/// Upper bound for `history.days`, ten years of daily rates.
pub const MAX_HISTORY_DAYS: u32 = 3650;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MindicadorProviderConfig {
    pub base_url: String,
}

/// Settings of the sources without a public API.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MockProviderConfig {
    /// Simulated network delay per request
    pub latency_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub mindicador: Option<MindicadorProviderConfig>,
    pub mock: Option<MockProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            mindicador: Some(MindicadorProviderConfig {
                base_url: DEFAULT_MINDICADOR_URL.to_string(),
            }),
            mock: Some(MockProviderConfig {
                latency_ms: DEFAULT_MOCK_LATENCY_MS,
            }),
        }
    }
}

impl ProvidersConfig {
    pub fn mindicador_url(&self) -> &str {
        self.mindicador
            .as_ref()
            .map_or(DEFAULT_MINDICADOR_URL, |p| &p.base_url)
    }

    pub fn mock_latency_ms(&self) -> u64 {
        self.mock
            .as_ref()
            .map_or(DEFAULT_MOCK_LATENCY_MS, |p| p.latency_ms)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HistoryConfig {
    #[serde(default = "default_seed_date")]
    pub seed_date: NaiveDate,
    #[serde(default = "default_days")]
    pub days: u32,
}

fn default_days() -> u32 {
    DEFAULT_DAYS
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            seed_date: default_seed_date(),
            days: DEFAULT_DAYS,
        }
    }
}

fn default_source() -> Source {
    Source::Mindicador
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default = "default_source")]
    pub default_source: Source,
    /// Reference price for the percent change columns
    pub baseline_price: Option<f64>,
    /// Seconds a fetched payload is reused; unset keeps it for the session
    pub cache_ttl_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            history: HistoryConfig::default(),
            default_source: default_source(),
            baseline_price: None,
            cache_ttl_secs: None,
        }
    }
}

impl AppConfig {
    /// Loads the config at the default location, or the defaults when no
    /// file was set up.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("cl", "dolarmon", "dolarmon")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let days = self.history.days;
        ensure!(
            (1..=MAX_HISTORY_DAYS).contains(&days),
            "history.days must be between 1 and {MAX_HISTORY_DAYS}, got {days}"
        );
        Ok(())
    }
}
