//! Configuration loading with multi-source merging.
//!
//! Priority (highest to lowest):
//! 1. `SAFEDROP_*` environment variables (`__` separates sections,
//!    e.g. `SAFEDROP_MAPS__API_KEY`)
//! 2. Explicit config path (`--config`)
//! 3. Project file `./safedrop.toml`
//! 4. Global file `$XDG_CONFIG_HOME/safedrop/config.toml`
//! 5. Built-in defaults
//!
//! When no key is configured, `GOOGLE_MAPS_API_KEY` is used.

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::currency::{CurrencyFormat, Language};
use crate::error::ConfigError;
use crate::fare::FareSchedule;

const PROJECT_FILE: &str = "safedrop.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub maps: MapsConfig,
    pub fare: FareSchedule,
    pub display: DisplayConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapsConfig {
    /// Host of the maps web services, without scheme.
    pub api_base: String,
    pub api_key: Option<String>,
    /// ISO 3166-1 alpha-2 code geocoding is restricted to.
    pub country: String,
    /// Unset means the transport default.
    pub timeout_secs: Option<u64>,
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_base: "maps.googleapis.com".into(),
            api_key: None,
            country: "SA".into(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub default_language: Language,
    pub currency_ar: Option<CurrencyFormat>,
    pub currency_en: Option<CurrencyFormat>,
}

impl DisplayConfig {
    /// Configured currency format for a language, or its built-in default.
    pub fn currency(&self, language: Language) -> CurrencyFormat {
        let configured = match language {
            Language::Ar => self.currency_ar.as_ref(),
            Language::En => self.currency_en.as_ref(),
        };
        configured
            .cloned()
            .unwrap_or_else(|| language.default_currency())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global) = Self::global_config_path() {
            if global.exists() {
                figment = figment.merge(Toml::file(global));
            }
        }

        let project = PathBuf::from(PROJECT_FILE);
        if project.exists() {
            figment = figment.merge(Toml::file(project));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("SAFEDROP_").split("__"));

        let mut config: Config = figment.extract().map_err(Box::new)?;
        if config.maps.api_key.is_none() {
            config.maps.api_key = std::env::var("GOOGLE_MAPS_API_KEY").ok();
        }
        Ok(config)
    }

    /// `$XDG_CONFIG_HOME/safedrop/config.toml`, or the platform equivalent.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("safedrop").join("config.toml"))
    }
}
