//! Configuration and file paths for patient-monitor
//!
//! This crate provides:
//! - Platform paths for config and cache files
//! - Configuration file loading (TOML)
//! - Application configuration (AppConfig)

pub mod app_config;
pub mod config_file;
pub mod paths;

pub use app_config::{AppConfig, PatientDefaults};
pub use config_file::load_config_file;
