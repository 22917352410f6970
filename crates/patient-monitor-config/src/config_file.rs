use std::{env, path::PathBuf};

use crate::paths;

const CONFIG_FILE: &str = ".patient-monitor.toml";

/// Load config file content
///
/// Searches in:
/// 1. Current working directory as .patient-monitor.toml
/// 2. Home directory as .patient-monitor.toml
/// 3. Platform config directory as config.toml
///
/// Returns the file content if found, None otherwise.
pub fn load_config_file() -> Option<String> {
    // Try current directory first
    if let Ok(content) = std::fs::read_to_string(CONFIG_FILE) {
        log::debug!("Loaded config from {}", CONFIG_FILE);
        return Some(content);
    }

    let candidates = [
        get_home_config_path(),
        paths::app_config_path().ok(),
    ];
    for path in candidates.into_iter().flatten() {
        if let Ok(content) = std::fs::read_to_string(&path) {
            log::debug!("Loaded config from {}", path.display());
            return Some(content);
        }
    }

    None
}

/// Get the path to the config file in the home directory
///
/// Returns ~/.patient-monitor.toml if HOME environment variable is set.
fn get_home_config_path() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(CONFIG_FILE))
}
