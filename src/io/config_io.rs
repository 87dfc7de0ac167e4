use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;

/// Error type for configuration I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },
    #[error("unknown config key: {0} (try storage.data_dir, storage.remote_dir, projects.seed_starter, ui.colors.<name>)")]
    UnknownKey(String),
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Get the config file path, respecting XDG_CONFIG_HOME
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".config"));
    config_dir.join("cabinet").join("config.toml")
}

/// Default data directory, respecting XDG_DATA_HOME
pub fn default_data_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".local").join("share"))
        .join("cabinet")
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Read the config, returning both the parsed config and the raw toml_edit
/// document for format-preserving edits. A missing file yields defaults.
pub fn read_config(path: &Path) -> Result<(AppConfig, toml_edit::DocumentMut), ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    let config: AppConfig = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let doc: toml_edit::DocumentMut =
        text.parse()
            .map_err(|e: toml_edit::TomlError| ConfigError::ParseError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(path: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let io_err = |e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, doc.to_string()).map_err(io_err)
}

/// Set a dotted key like `projects.seed_starter` in the config document.
pub fn set_value(doc: &mut toml_edit::DocumentMut, key: &str, value: &str) -> Result<(), ConfigError> {
    let parts: Vec<&str> = key.split('.').collect();
    let root: &mut dyn toml_edit::TableLike = doc.as_table_mut();
    match parts.as_slice() {
        ["storage", field @ ("data_dir" | "remote_dir")] => {
            child_table(root, "storage", key)?.insert(field, toml_edit::value(value));
        }
        ["projects", "seed_starter"] => {
            let flag: bool = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                reason: "expected true or false".to_string(),
            })?;
            child_table(root, "projects", key)?.insert("seed_starter", toml_edit::value(flag));
        }
        ["ui", "colors", name] => {
            if crate::tui::theme::parse_hex_color(value).is_none() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    reason: "expected a hex color like #FB4196".to_string(),
                });
            }
            let ui = child_table(root, "ui", key)?;
            child_table(ui, "colors", key)?.insert(name, toml_edit::value(value));
        }
        _ => return Err(ConfigError::UnknownKey(key.to_string())),
    }
    Ok(())
}

/// Sub-table `name` of `parent`, created when missing. Any other value
/// already stored under `name` is reported against `key`.
fn child_table<'t>(
    parent: &'t mut dyn toml_edit::TableLike,
    name: &str,
    key: &str,
) -> Result<&'t mut dyn toml_edit::TableLike, ConfigError> {
    parent
        .entry(name)
        .or_insert(toml_edit::Item::Table(toml_edit::Table::new()))
        .as_table_like_mut()
        .ok_or_else(|| ConfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("`{}` in the config file is not a table", name),
        })
}

/// Effective storage locations after applying config and CLI overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub data_dir: PathBuf,
    pub remote_dir: PathBuf,
}

impl StoragePaths {
    pub fn resolve(config: &AppConfig, data_dir_override: Option<&Path>) -> Self {
        let data_dir = data_dir_override
            .map(Path::to_path_buf)
            .or_else(|| config.storage.data_dir.clone())
            .unwrap_or_else(default_data_dir);
        let remote_dir = config
            .storage
            .remote_dir
            .clone()
            .unwrap_or_else(|| data_dir.join("remote"));
        StoragePaths {
            data_dir,
            remote_dir,
        }
    }

    /// Log file used while the terminal UI owns the screen
    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("cabinet.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_config() -> &'static str {
        r#"# cabinet settings
[storage]
data_dir = "/srv/cabinet"

[projects]
seed_starter = true # starter projects on first load
"#
    }

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let (config, doc) = read_config(&tmp.path().join("config.toml")).unwrap();
        assert!(config.projects.seed_starter);
        assert_eq!(doc.to_string(), "");
    }

    #[test]
    fn round_trip_preserves_comments() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, sample_config()).unwrap();

        let (_config, doc) = read_config(&path).unwrap();
        write_config(&path, &doc).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), sample_config());
    }

    #[test]
    fn set_seed_starter_keeps_comment() {
        let mut doc: toml_edit::DocumentMut = sample_config().parse().unwrap();
        set_value(&mut doc, "projects.seed_starter", "false").unwrap();
        let text = doc.to_string();
        assert!(text.contains("# cabinet settings"));
        let config: AppConfig = toml::from_str(&text).unwrap();
        assert!(!config.projects.seed_starter);
    }

    #[test]
    fn set_creates_missing_tables() {
        let mut doc = toml_edit::DocumentMut::new();
        set_value(&mut doc, "storage.remote_dir", "/tmp/remote").unwrap();
        set_value(&mut doc, "ui.colors.highlight", "#112233").unwrap();
        let config: AppConfig = toml::from_str(&doc.to_string()).unwrap();
        assert_eq!(config.storage.remote_dir, Some(PathBuf::from("/tmp/remote")));
        assert_eq!(config.ui.colors["highlight"], "#112233");
    }

    #[test]
    fn set_rejects_bad_input() {
        let mut doc = toml_edit::DocumentMut::new();
        assert!(matches!(
            set_value(&mut doc, "projects.nope", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            set_value(&mut doc, "projects.seed_starter", "maybe"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            set_value(&mut doc, "ui.colors.text", "red"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn set_reports_scalar_where_table_expected() {
        for (text, key, value) in [
            ("storage = 1\n", "storage.data_dir", "/tmp/d"),
            ("projects = \"yes\"\n", "projects.seed_starter", "true"),
            ("[ui]\ncolors = 3\n", "ui.colors.text", "#FFFFFF"),
        ] {
            let mut doc: toml_edit::DocumentMut = text.parse().unwrap();
            assert!(
                matches!(
                    set_value(&mut doc, key, value),
                    Err(ConfigError::InvalidValue { .. })
                ),
                "{:?}",
                text
            );
            assert_eq!(doc.to_string(), text);
        }
    }

    #[test]
    fn set_into_inline_colors_table() {
        let mut doc: toml_edit::DocumentMut =
            "[ui]\ncolors = { text = \"#000000\" }\n".parse().unwrap();
        set_value(&mut doc, "ui.colors.highlight", "#112233").unwrap();
        let config: AppConfig = toml::from_str(&doc.to_string()).unwrap();
        assert_eq!(config.ui.colors["text"], "#000000");
        assert_eq!(config.ui.colors["highlight"], "#112233");
    }

    #[test]
    fn malformed_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[storage\n").unwrap();
        assert!(matches!(
            read_config(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn storage_paths_resolution() {
        let mut config = AppConfig::default();
        let paths = StoragePaths::resolve(&config, Some(Path::new("/data")));
        assert_eq!(paths.data_dir, PathBuf::from("/data"));
        assert_eq!(paths.remote_dir, PathBuf::from("/data/remote"));
        assert_eq!(paths.log_file(), PathBuf::from("/data/cabinet.log"));

        config.storage.data_dir = Some(PathBuf::from("/cfg"));
        config.storage.remote_dir = Some(PathBuf::from("/elsewhere"));
        let paths = StoragePaths::resolve(&config, None);
        assert_eq!(paths.data_dir, PathBuf::from("/cfg"));
        assert_eq!(paths.remote_dir, PathBuf::from("/elsewhere"));
    }
}
