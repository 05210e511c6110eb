// src/config.rs - Configuration management
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use anyhow::{Context, Result};

use crate::stores::theme::Theme;

/// Адрес бэкенда, если ничего не задано
pub const DEFAULT_API_URL: &str = "http://localhost:8000/";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub theme: ThemeConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub max_body_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ThemeConfig {
    pub default: Theme,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: 30,
            max_body_bytes: 8 * 1024 * 1024,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "kis-client.json".to_string(),
        }
    }
}

/// Нормализует базовый URL API: пустое значение → дефолт, ровно один `/` в конце
pub fn resolve_api_url(raw: Option<&str>) -> String {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return DEFAULT_API_URL.to_string();
    }
    format!("{}/", trimmed.trim_end_matches('/'))
}

pub fn load_config() -> Result<Config> {
    load_env_file()?;

    let config_file = env::var("CONFIG_FILE").ok();
    load_config_from(config_file.as_deref().map(Path::new))
}

/// Загрузка с явным путём к TOML (флаг `--config` у CLI)
pub fn load_config_from(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => {
            let config_str = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&config_str)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        }
        None => Config::default(),
    };

    override_with_env(&mut config);
    config.api.base_url = resolve_api_url(Some(&config.api.base_url));

    config.validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

fn override_with_env(config: &mut Config) {
    // VITE_API_URL - имя переменной из браузерной сборки
    if let Ok(url) = env::var("KIS_API_URL").or_else(|_| env::var("VITE_API_URL")) {
        config.api.base_url = url;
    }
    if let Ok(timeout_str) = env::var("KIS_API_TIMEOUT") {
        if let Ok(timeout) = timeout_str.parse::<u64>() {
            config.api.timeout_seconds = timeout;
        }
    }
    if let Ok(path) = env::var("KIS_STORAGE_PATH") {
        config.storage.path = path;
    }
    if let Ok(theme_str) = env::var("KIS_THEME") {
        if let Ok(theme) = theme_str.parse::<Theme>() {
            config.theme.default = theme;
        }
    }
    if let Ok(level) = env::var("RUST_LOG") {
        config.logging.level = level;
    }
    if let Ok(format) = env::var("KIS_LOG_FORMAT") {
        config.logging.format = format;
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let url = &self.api.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "API base URL must start with http:// or https:// (current: {})",
                url
            ));
        }

        if self.api.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("API timeout must be greater than zero"));
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(anyhow::anyhow!(
                "Unknown log format '{}' (expected: pretty, json)",
                self.logging.format
            ));
        }

        Ok(())
    }

    pub fn print_startup_info(&self) {
        tracing::debug!("API: {}", self.api.base_url);
        tracing::debug!("Storage: {}", self.storage.path);
        tracing::debug!("Logging: {} level, {} format", self.logging.level, self.logging.format);
    }
}

pub fn load_env_file() -> Result<()> {
    if let Ok(env_file) = env::var("ENV_FILE") {
        dotenvy::from_filename(&env_file)
            .with_context(|| format!("Failed to load environment file: {}", env_file))?;
    } else if Path::new(".env").exists() {
        dotenvy::dotenv().context("Failed to load .env file")?;
    }
    Ok(())
}
