//! Per-store configuration.

use serde::{Deserialize, Serialize};

/// Settings for a single store.
///
/// Usually embedded in an application config file, one table per store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Label used in log output
    #[serde(default = "default_name")]
    pub name: String,

    /// Maximum number of dispatches that may be queued behind a running one
    #[serde(default = "default_max_pending")]
    pub max_pending: usize,
}

fn default_name() -> String {
    "store".to_string()
}

fn default_max_pending() -> usize {
    1024
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            max_pending: default_max_pending(),
        }
    }
}

impl StoreConfig {
    /// Default settings with a custom log label
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
