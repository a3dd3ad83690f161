//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs. Every
//! field has a default, so a missing file or section falls back to the
//! values in `Default`. Secrets (the odds API key) are referenced by env-var
//! name in the config and resolved at runtime.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use secrecy::SecretString;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::storage::DEFAULT_SNAPSHOT_FILE;
use crate::types::ArbError;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub odds_api: OddsApiConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EngineConfig {
    /// Amount split across the three outcomes of every opportunity.
    pub bankroll: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { bankroll: dec!(100) }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OddsApiConfig {
    /// Env var holding the API key. Unset or empty → bundled data only.
    pub api_key_env: String,
    pub base_url: String,
    pub sport: String,
    pub regions: String,
    pub timeout_secs: u64,
    /// Where live payloads are snapshotted. Empty disables snapshots.
    pub cache_path: String,
    /// Bundled dataset used when the live feed is unavailable.
    pub fallback_path: String,
}

impl Default for OddsApiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "ODDS_API_KEY".into(),
            base_url: "https://api.the-odds-api.com/v4".into(),
            sport: "soccer".into(),
            regions: "eu".into(),
            timeout_secs: 15,
            cache_path: DEFAULT_SNAPSHOT_FILE.into(),
            fallback_path: "sample-odds.json".into(),
        }
    }
}

impl OddsApiConfig {
    /// The API key, if its env var is set and non-empty.
    pub fn api_key(&self) -> Option<SecretString> {
        AppConfig::resolve_env(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(SecretString::new)
    }

    pub fn snapshot_path(&self) -> Option<PathBuf> {
        (!self.cache_path.is_empty()).then(|| PathBuf::from(&self.cache_path))
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Env var that overrides `port` when set.
    pub port_env: String,
    /// Directory served for every path that is not an API route.
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            port_env: "PORT".into(),
            static_dir: "static".into(),
        }
    }
}

impl ServerConfig {
    /// Listen port, honouring the override env var.
    pub fn resolved_port(&self) -> u16 {
        match AppConfig::resolve_env(&self.port_env) {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(env = %self.port_env, value = %raw, port = self.port, "Ignoring invalid port override");
                self.port
            }),
            Err(_) => self.port,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Load `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            warn!(path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML document.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ArbError> {
        if self.engine.bankroll <= Decimal::ZERO {
            return Err(ArbError::Config(format!(
                "engine.bankroll must be positive, got {}",
                self.engine.bankroll
            )));
        }
        if self.odds_api.fallback_path.trim().is_empty() {
            return Err(ArbError::Config("odds_api.fallback_path is empty".into()));
        }
        if self.odds_api.sport.trim().is_empty() {
            return Err(ArbError::Config("odds_api.sport is empty".into()));
        }
        Ok(())
    }

    /// Resolve an environment variable name to its value.
    /// Useful for loading secrets referenced in the config.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}
