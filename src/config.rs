use std::{env, time::Duration};

use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;

use crate::casafari::listing::SyncFilters;

const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
const DATABASE_URL_ENV: &str = "DATABASE_URL";
const API_KEY_ENV: &str = "CASAFARI_API_KEY";
const API_SECRET_ENV: &str = "CASAFARI_API_SECRET";

pub const DEFAULT_BASE_URL: &str = "https://api.casafari.com";
pub const DEFAULT_PER_PAGE: u32 = 100;

#[derive(Deserialize, Debug, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub database_url: String,
    #[serde(default)]
    pub casafari: CasafariConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CasafariConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for CasafariConfig {
    fn default() -> Self {
        CasafariConfig {
            api_key: String::new(),
            api_secret: String::new(),
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            per_page: default_per_page(),
        }
    }
}

impl CasafariConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct SyncConfig {
    /// Pause between two scheduled runs, e.g. "15m" or "1h".
    #[serde(default = "default_interval")]
    pub interval: String,
    /// Filter sets synced one after another on every run.
    #[serde(default)]
    pub filters: Vec<SyncFilters>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            interval: default_interval(),
            filters: Vec::new(),
        }
    }
}

impl SyncConfig {
    pub fn interval(&self) -> Result<Duration> {
        humantime::parse_duration(&self.interval)
            .with_context(|| format!("invalid sync interval '{}'", self.interval))
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

fn default_interval() -> String {
    "1h".to_string()
}

pub fn create_test_config() -> Config {
    Config {
        database_url: "postgres://localhost/casafari_test".to_string(),
        casafari: CasafariConfig {
            api_key: "test-key".to_string(),
            api_secret: "test-secret".to_string(),
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_seconds: 5,
            per_page: DEFAULT_PER_PAGE,
        },
        sync: SyncConfig::default(),
    }
}

/// Reads the TOML file named by `CONFIG_PATH` and applies environment
/// overrides. Without `CONFIG_PATH` the defaults plus environment are used.
pub fn read_config() -> Result<Config> {
    dotenv().ok();

    let mut config = match env::var(CONFIG_PATH_ENV) {
        Ok(config_path) => {
            let raw = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read config file {config_path}"))?;
            parse_config(&raw).with_context(|| format!("failed to parse {config_path}"))?
        }
        Err(_) => Config::default(),
    };

    if let Ok(url) = env::var(DATABASE_URL_ENV) {
        config.database_url = url;
    }
    if let Ok(key) = env::var(API_KEY_ENV) {
        config.casafari.api_key = key;
    }
    if let Ok(secret) = env::var(API_SECRET_ENV) {
        config.casafari.api_secret = secret;
    }

    Ok(config)
}

pub fn parse_config(raw: &str) -> Result<Config> {
    Ok(toml::from_str(raw)?)
}
