//! Application settings and data-directory resolution.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use dirs::home_dir;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{errors::Result, utils::persistence::write_atomic};

pub const HOME_ENV_VAR: &str = "CASHFLOW_CORE_HOME";
const DEFAULT_DIR_NAME: &str = ".cashflow_core";
const CONFIG_FILE: &str = "config.json";
const DEFAULT_PROFILES_FILE: &str = "profiles.json";

/// Root directory for configuration and profile data.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV_VAR) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_profile: Option<String>,
    /// Profiles file, relative to the data directory unless absolute.
    #[serde(default = "default_profiles_file")]
    pub profiles_file: PathBuf,
}

fn default_profiles_file() -> PathBuf {
    PathBuf::from(DEFAULT_PROFILES_FILE)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            last_profile: None,
            profiles_file: default_profiles_file(),
        }
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
            base,
        })
    }

    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            debug!(path = %self.path.display(), "no config file, using defaults");
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    /// Resolves the profiles file named by `config` against the data directory.
    pub fn profiles_path(&self, config: &Config) -> PathBuf {
        if config.profiles_file.is_absolute() {
            config.profiles_file.clone()
        } else {
            self.base.join(&config.profiles_file)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_defaults_when_missing() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(manager.profiles_path(&config), dir.path().join("profiles.json"));
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().join("home")).unwrap();
        let config = Config {
            last_profile: Some("Business".into()),
            profiles_file: PathBuf::from("data/book.json"),
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
        assert_eq!(
            manager.profiles_path(&config),
            dir.path().join("home").join("data/book.json")
        );
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.profiles_file, PathBuf::from("profiles.json"));
        assert!(config.last_profile.is_none());
    }
}
