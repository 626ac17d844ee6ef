//! Dashboard configuration persistence
//!
//! Stores user preferences in `~/.config/dashboard-layout/config.yaml`

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::Axis;
use crate::registry::{kinds, PanelDefaults};

/// Configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Quiet period after the last layout change before a save is issued
    #[serde(default = "default_save_debounce_ms")]
    pub save_debounce_ms: u64,

    /// Maximum number of undo steps kept per session
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Panel kinds a fresh dashboard starts with, left to right
    #[serde(default = "default_panels")]
    pub default_panels: Vec<String>,

    /// Axis of the root container for a fresh dashboard
    #[serde(default)]
    pub root_axis: Axis,

    /// Extra or overriding panel kinds for the registry
    #[serde(default)]
    pub panels: BTreeMap<String, PanelDefaults>,
}

fn default_save_debounce_ms() -> u64 {
    2000
}

fn default_history_limit() -> usize {
    100
}

fn default_panels() -> Vec<String> {
    vec![
        kinds::COLLECTION_GRID.to_string(),
        kinds::RECOMMENDATIONS.to_string(),
        kinds::ACTIVITY_FEED.to_string(),
    ]
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            save_debounce_ms: default_save_debounce_ms(),
            history_limit: default_history_limit(),
            default_panels: default_panels(),
            root_axis: Axis::default(),
            panels: BTreeMap::new(),
        }
    }
}

impl DashboardConfig {
    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`; missing or unreadable files fall back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to the default location
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}
