//! Application configuration
//!
//! Configuration loaded from .patient-monitor.toml file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use slice_store::StoreConfig;

/// Application configuration loaded from .patient-monitor.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Screen shown at startup ("setup", "live", "record" or "other")
    #[serde(default = "default_initial_screen")]
    pub initial_screen: String,

    /// Patient record used before one is loaded
    #[serde(default)]
    pub default_patient: PatientDefaults,

    /// Settings for the navigation store
    #[serde(default = "default_screen_store")]
    pub screen_store: StoreConfig,

    /// Settings for the patient record store
    #[serde(default = "default_patient_info_store")]
    pub patient_info_store: StoreConfig,
}

/// Placeholder patient record
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PatientDefaults {
    #[serde(default = "default_unknown")]
    pub name: String,

    #[serde(default = "default_unknown")]
    pub last_name: String,
}

fn default_initial_screen() -> String {
    "setup".to_string()
}

fn default_unknown() -> String {
    "unknown".to_string()
}

fn default_screen_store() -> StoreConfig {
    StoreConfig::named("screen")
}

fn default_patient_info_store() -> StoreConfig {
    StoreConfig::named("patient_info")
}

impl Default for PatientDefaults {
    fn default() -> Self {
        Self {
            name: default_unknown(),
            last_name: default_unknown(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            initial_screen: default_initial_screen(),
            default_patient: PatientDefaults::default(),
            screen_store: default_screen_store(),
            patient_info_store: default_patient_info_store(),
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match Self::from_toml(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("{:#}", e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Parse config from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }
}
