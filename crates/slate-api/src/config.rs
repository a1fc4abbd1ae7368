//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;
use slate_core::PurchasedItemPolicy;

/// Application configuration, loaded from optional `config/` files layered
/// under `SLATE__`-prefixed environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
}

/// Server bind configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Dataset directory and recording policy.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Directory holding the four dataset documents and the generated PDF.
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,
    /// `append` (original duplicating behavior) or `upsert`.
    #[serde(default = "default_purchased_policy")]
    pub purchased_item_policy: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            purchased_item_policy: default_purchased_policy(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_purchased_policy() -> String {
    "append".to_string()
}

/// Generative-model configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    /// Absence degrades the estimator to a structured error, not a crash.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_call_interval")]
    pub min_call_interval_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            min_call_interval_secs: default_call_interval(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.5-flash-lite".to_string()
}

fn default_call_interval() -> u64 {
    4
}

impl AppConfig {
    /// Loads configuration from optional files and the environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SLATE").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// The configured key, falling back to the conventional `GEMINI_API_KEY`
    /// environment variable.
    pub fn gemini_api_key(&self) -> Option<String> {
        self.gemini
            .api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
    }

    pub fn purchased_policy(&self) -> PurchasedItemPolicy {
        if self.data.purchased_item_policy.eq_ignore_ascii_case("upsert") {
            PurchasedItemPolicy::Upsert
        } else {
            PurchasedItemPolicy::Append
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            data: DataConfig::default(),
            gemini: GeminiConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_field() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.data.dir, PathBuf::from("data"));
        assert_eq!(config.purchased_policy(), PurchasedItemPolicy::Append);
        assert_eq!(config.gemini.min_call_interval_secs, 4);
    }

    #[test]
    fn upsert_policy_is_recognized() {
        let mut config = AppConfig::default();
        config.data.purchased_item_policy = "Upsert".to_string();
        assert_eq!(config.purchased_policy(), PurchasedItemPolicy::Upsert);
    }
}
