use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Remote recipe catalog settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Local favorites table settings
    #[serde(default)]
    pub store: StoreConfig,
}

/// Configuration for the remote recipe catalog
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of a TheMealDB-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Configuration for the favorites table
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// redb database file holding the favorite recipes
    #[serde(default = "default_favorites_path")]
    pub favorites_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            favorites_path: default_favorites_path(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://www.themealdb.com/api/json/v1/1".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_favorites_path() -> PathBuf {
    PathBuf::from("favorites.redb")
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPES__ prefix
    /// 2. recipes.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPES__API__BASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables, see [`AppConfig::load`]
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipes").required(false))
        // Use double underscore for nested: RECIPES__STORE__FAVORITES_PATH
        .add_source(
            Environment::with_prefix("RECIPES")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
