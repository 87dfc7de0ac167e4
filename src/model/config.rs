use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub projects: ProjectsConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Local key-value store directory (default: $XDG_DATA_HOME/cabinet)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// File-backed document store (default: <data_dir>/remote)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectsConfig {
    /// Write the starter projects when a user has no stored list
    #[serde(default = "default_true")]
    pub seed_starter: bool,
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        ProjectsConfig { seed_starter: true }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Theme overrides, e.g. `highlight = "#FB4196"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.storage.data_dir.is_none());
        assert!(config.projects.seed_starter);
        assert!(config.ui.colors.is_empty());
    }

    #[test]
    fn parses_all_sections() {
        let config: AppConfig = toml::from_str(
            r##"
[storage]
data_dir = "/tmp/cab"

[projects]
seed_starter = false

[ui.colors]
highlight = "#FF0000"
"##,
        )
        .unwrap();
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/tmp/cab")));
        assert!(config.storage.remote_dir.is_none());
        assert!(!config.projects.seed_starter);
        assert_eq!(config.ui.colors["highlight"], "#FF0000");
    }
}
