//! Configuration loading.
//!
//! Applications load [`LifeboatConfig`] from `config/lifeboat.toml` and
//! `LIFEBOAT__*` environment variables with `LifeboatConfig::load()`, then
//! hand it to [`GatewayRegistry::from_config`](crate::GatewayRegistry::from_config).

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::gateway::Credentials;
use crate::model::DEFAULT_TIMESTAMP_FORMAT;

const CONFIG_FILE: &str = "config/lifeboat.toml";
const SECTION: &str = "lifeboat";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LifeboatConfig {
    /// chrono strftime format used for created/updated/deleted stamps
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    /// Credentials of the default gateway
    #[serde(default)]
    pub connection: Option<Credentials>,
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}

impl Default for LifeboatConfig {
    fn default() -> Self {
        Self {
            timestamp_format: default_timestamp_format(),
            connection: None,
        }
    }
}

impl LifeboatConfig {
    /// Load from `config/lifeboat.toml` (optional), overlaid by env vars.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix("LIFEBOAT").separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                if Path::new(CONFIG_FILE).exists() {
                    log::warn!("Failed to load {}, falling back to env: {}", CONFIG_FILE, err);
                }
                Config::builder()
                    .add_source(Environment::with_prefix("LIFEBOAT").separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {}, then env-only error: {}",
                            err, env_err
                        ))
                    })?
            }
        };

        Self::from_settings(&settings)
    }

    /// Load from an explicit file; no environment overlay.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?;
        Self::from_settings(&settings)
    }

    fn from_settings(settings: &Config) -> Result<Self, ConfigError> {
        match settings.get::<LifeboatConfig>(SECTION) {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "Lifeboat configuration could not be loaded: {}",
                e
            ))),
        }
    }
}
