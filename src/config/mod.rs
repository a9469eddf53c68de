use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Navigation ticker period (virtual milliseconds per 1%).
    #[serde(default = "default_nav_tick_ms")]
    pub nav_tick_ms: u64,
    /// Virtual time before a GPS approach is confirmed.
    #[serde(default = "default_gps_confirm_ms")]
    pub gps_confirm_ms: u64,
    #[serde(default = "default_separator_char")]
    pub separator_char: String,
}

fn default_nav_tick_ms() -> u64 {
    50
}
fn default_gps_confirm_ms() -> u64 {
    1500
}
fn default_separator_char() -> String {
    "-".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db: PathBuf) -> Self {
        Self {
            database: db.to_string_lossy().to_string(),
            nav_tick_ms: default_nav_tick_ms(),
            gps_confirm_ms: default_gps_confirm_ms(),
            separator_char: default_separator_char(),
        }
    }

    /// `~/.fencecrew` (or `%APPDATA%\fencecrew` on Windows).
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("fencecrew")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".fencecrew")
        }
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("fencecrew.conf")
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join("fencecrew.sqlite")
    }

    /// `--db` value to a path: `~` expanded, relative names under the config dir.
    pub fn resolve_db_path(name: &str) -> PathBuf {
        let p = expand_tilde(name);
        if p.is_absolute() {
            p
        } else {
            Self::config_dir().join(p)
        }
    }

    /// Load the configuration file, or defaults when there is none.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("cannot parse {}: {e}", path.display())))
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Create the config directory, the config file (skipped in test mode)
    /// and an empty database file. Returns the database path.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let db_path = match custom_db {
            Some(name) => Self::resolve_db_path(name),
            None => Self::database_file(),
        };

        if !is_test {
            let yaml = Self::with_database(db_path.clone()).to_yaml()?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(db_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fencecrew.conf");
        fs::write(&path, "database: /tmp/x.sqlite\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.database, "/tmp/x.sqlite");
        assert_eq!(cfg.nav_tick_ms, 50);
        assert_eq!(cfg.gps_confirm_ms, 1500);
        assert_eq!(cfg.separator_char, "-");
    }

    #[test]
    fn broken_yaml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fencecrew.conf");
        fs::write(&path, "database: [unclosed\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(AppError::Config(_))));
    }
}
