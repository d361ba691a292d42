// Engine settings: defaults, then an optional JSON file, then environment overrides.
use crate::error::EngineError;
use crate::fetch::{DEFAULT_MAX_SEGMENT_DAYS, MAX_SEGMENT_DAYS_LIMIT};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "BAR_CACHE_CONFIG";
pub const DATA_DIR_ENV: &str = "BAR_CACHE_DATA_DIR";
pub const HOST_ENV: &str = "BAR_CACHE_HOST";
pub const PORT_ENV: &str = "BAR_CACHE_PORT";
pub const UPSTREAM_URL_ENV: &str = "BAR_CACHE_UPSTREAM_URL";
pub const API_KEY_ENV: &str = "BAR_CACHE_API_KEY";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EngineSettings {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub max_segment_days: i64,
    pub upstream: UpstreamSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UpstreamSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            host: "127.0.0.1".to_string(),
            port: 50051,
            data_dir: default_data_dir(),
            max_segment_days: DEFAULT_MAX_SEGMENT_DAYS,
            upstream: UpstreamSettings::default(),
        }
    }
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        UpstreamSettings {
            base_url: "http://127.0.0.1:8080".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

fn default_data_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".local")
        .join("share")
        .join("bar-cache")
        .join("data")
}

impl EngineSettings {
    /// Loads settings from `BAR_CACHE_CONFIG` (if set) and the process environment.
    pub fn load() -> Result<Self, EngineError> {
        let mut settings = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads a JSON settings file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| EngineError::ConfigError(format!("Failed to read '{}': {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| EngineError::ConfigError(format!("Invalid settings in '{}': {}", path.display(), e)))
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(DATA_DIR_ENV) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(host) = lookup(HOST_ENV) {
            self.host = host;
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.port = port
                .parse()
                .map_err(|e| EngineError::ConfigError(format!("Invalid {} '{}': {}", PORT_ENV, port, e)))?;
        }
        if let Some(url) = lookup(UPSTREAM_URL_ENV) {
            self.upstream.base_url = url;
        }
        if let Some(key) = lookup(API_KEY_ENV) {
            self.upstream.api_key = Some(key);
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), EngineError> {
        if !(1..=MAX_SEGMENT_DAYS_LIMIT).contains(&self.max_segment_days) {
            return Err(EngineError::ConfigError(format!(
                "max_segment_days must be between 1 and {}, got {}",
                MAX_SEGMENT_DAYS_LIMIT, self.max_segment_days
            )));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
