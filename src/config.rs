use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, ScrapeError};
use crate::parser::DEFAULT_ORIGIN;

pub const CONFIG_ENV: &str = "SCRAPER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "scraper.toml";

pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub log_file: PathBuf,
    pub log_level: String,
    pub origin: String,
    pub referer: String,
    pub user_agents: Vec<String>,
    pub min_delay_secs: f64,
    pub max_delay_secs: f64,
    pub timeout_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("pages.json"),
            output: PathBuf::from("results.json"),
            log_file: PathBuf::from("scraper.log"),
            log_level: "info".to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            referer: format!("{DEFAULT_ORIGIN}/"),
            user_agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
            min_delay_secs: 2.0,
            max_delay_secs: 5.0,
            timeout_secs: 30,
        }
    }
}

impl ScraperConfig {
    /// Loads `$SCRAPER_CONFIG`, or `scraper.toml` if that is unset. A missing
    /// file means defaults.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| ScrapeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.user_agents.is_empty() {
            return Err(ScrapeError::Config("user_agents must not be empty".into()));
        }
        for (name, value) in [
            ("min_delay_secs", self.min_delay_secs),
            ("max_delay_secs", self.max_delay_secs),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScrapeError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
            Duration::try_from_secs_f64(value)
                .map_err(|e| ScrapeError::Config(format!("{name} is out of range: {e}")))?;
        }
        if self.min_delay_secs > self.max_delay_secs {
            return Err(ScrapeError::Config(format!(
                "min_delay_secs ({}) exceeds max_delay_secs ({})",
                self.min_delay_secs, self.max_delay_secs
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ScrapeError::Config("timeout_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn min_delay(&self) -> Duration {
        Duration::from_secs_f64(self.min_delay_secs)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_secs_f64(self.max_delay_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
