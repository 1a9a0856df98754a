//! Runtime configuration.
//!
//! Values come from, in increasing precedence: built-in defaults, the JSON file
//! at `<config dir>/vibe-check/config.json`, environment variables, and finally
//! command line flags (applied by the binary).
//!
//! Environment variables:
//! - `VIBE_CHECK_URL` - Base URL of the server used by `vibe take`
//! - `VIBE_CHECK_DB` - Path to the SQLite database
//! - `VIBE_CHECK_QUESTIONS` - Path to a JSON question catalog
//! - `VIBE_CHECK_SUBMIT_TIMEOUT_SECS` - Upper bound on a single submission

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

use crate::client::DEFAULT_URL;

const APP_NAME: &str = "vibe-check";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VibeConfig {
    /// Port `vibe serve` listens on.
    pub port: u16,
    /// Base URL of the API used by the terminal front end in remote mode.
    pub server_url: String,
    /// SQLite file. Falls back to the platform data directory.
    pub database_path: Option<PathBuf>,
    /// JSON question catalog. Falls back to the built-in course survey.
    pub questions_path: Option<PathBuf>,
    pub submit_timeout_secs: u64,
}

impl Default for VibeConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            server_url: DEFAULT_URL.to_string(),
            database_path: None,
            questions_path: None,
            submit_timeout_secs: 30,
        }
    }
}

impl VibeConfig {
    /// Load the config file and environment overrides.
    /// Falls back to defaults if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let mut config = match get_config_path().and_then(|p| Self::load_from(&p)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Apply `VIBE_CHECK_*` overrides using `lookup` to resolve variables.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("VIBE_CHECK_URL") {
            self.server_url = url;
        }
        if let Some(db) = lookup("VIBE_CHECK_DB") {
            self.database_path = Some(PathBuf::from(db));
        }
        if let Some(questions) = lookup("VIBE_CHECK_QUESTIONS") {
            self.questions_path = Some(PathBuf::from(questions));
        }
        if let Some(secs) = lookup("VIBE_CHECK_SUBMIT_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(secs) => self.submit_timeout_secs = secs,
                Err(_) => tracing::warn!("Ignoring invalid VIBE_CHECK_SUBMIT_TIMEOUT_SECS: {}", secs),
            }
        }
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs.max(1))
    }
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = VibeConfig::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, VibeConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"port": 8080}"#).unwrap();

        let config = VibeConfig::load_from(&path).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.submit_timeout_secs, 30);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(VibeConfig::load_from(&path).is_err());
    }

    #[test]
    fn env_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            ("VIBE_CHECK_URL", "http://survey.test/api/v1"),
            ("VIBE_CHECK_DB", "/tmp/vibes.db"),
            ("VIBE_CHECK_SUBMIT_TIMEOUT_SECS", "5"),
        ]
        .into_iter()
        .collect();

        let mut config = VibeConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.server_url, "http://survey.test/api/v1");
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/vibes.db")));
        assert_eq!(config.submit_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn invalid_timeout_is_ignored() {
        let mut config = VibeConfig::default();
        config.apply_overrides(|key| {
            (key == "VIBE_CHECK_SUBMIT_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert_eq!(config.submit_timeout_secs, 30);
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let config = VibeConfig {
            submit_timeout_secs: 0,
            ..VibeConfig::default()
        };
        assert_eq!(config.submit_timeout(), Duration::from_secs(1));
    }
}
