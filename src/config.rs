//! Configuration management for terminalai.
//!
//! Configuration is a small JSON object stored at
//! `~/.config/terminalai/config.json`. Environment variables take precedence
//! over whatever the file says.

use crate::context::Environment;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A recommended free model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelChoice {
    pub id: &'static str,
    pub name: &'static str,
}

/// Models offered by the interactive picker, best first.
pub const FREE_MODELS: [ModelChoice; 3] = [
    ModelChoice {
        id: "mistralai/devstral-2512:free",
        name: "Devstral (coding-focused)",
    },
    ModelChoice {
        id: "deepseek/deepseek-r1-0528:free",
        name: "DeepSeek R1 (reasoning)",
    },
    ModelChoice {
        id: "meta-llama/llama-3.3-70b-instruct:free",
        name: "Llama 3.3 70B (general)",
    },
];

pub const DEFAULT_MODEL: &str = FREE_MODELS[0].id;

/// Persisted configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// OpenRouter API key.
    #[serde(rename = "apiKey", default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Fields written by other versions; kept as-is on rewrite.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Reads and writes the config file, applying environment overrides on read.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    api_key_override: Option<String>,
    model_override: Option<String>,
}

impl ConfigStore {
    /// Store backed by an explicit file, with explicit overrides.
    pub fn new(
        path: impl Into<PathBuf>,
        api_key_override: Option<String>,
        model_override: Option<String>,
    ) -> Self {
        Self {
            path: path.into(),
            api_key_override,
            model_override,
        }
    }

    /// Store at the default per-user location.
    pub fn from_environment(env: &Environment) -> Result<Self> {
        let home = env
            .home
            .as_deref()
            .context("Could not determine home directory")?;
        Ok(Self::new(
            config_path(home),
            env.api_key.clone(),
            env.model.clone(),
        ))
    }

    /// Location of the config file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file. A missing or malformed file reads as an empty config.
    pub fn load(&self) -> Config {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!("No config at {}: {}", self.path.display(), e);
                return Config::default();
            }
        };
        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!("Ignoring malformed config {}: {}", self.path.display(), e);
            Config::default()
        })
    }

    /// Write the whole config, creating the directory if needed.
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let contents = serde_json::to_string_pretty(config)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write config file: {}", self.path.display()))?;
        Ok(())
    }

    /// API key: environment first, then file.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_override
            .clone()
            .or_else(|| self.load().api_key)
    }

    /// Model identifier: environment first, then file.
    pub fn model(&self) -> Option<String> {
        self.model_override.clone().or_else(|| self.load().model)
    }

    /// Persist the API key, keeping every other field.
    pub fn save_api_key(&self, api_key: &str) -> Result<()> {
        let mut config = self.load();
        config.api_key = Some(api_key.to_string());
        self.save(&config)
    }

    /// Persist the model, keeping every other field.
    pub fn save_model(&self, model: &str) -> Result<()> {
        let mut config = self.load();
        config.model = Some(model.to_string());
        self.save(&config)
    }
}

/// `~/.config/terminalai/config.json` relative to the given home.
pub fn config_path(home: &Path) -> PathBuf {
    home.join(".config").join("terminalai").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> ConfigStore {
        ConfigStore::new(config_path(dir.path()), None, None)
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.load(), Config::default());
        assert!(store.api_key().is_none());
        assert!(store.model().is_none());
    }

    #[test]
    fn test_malformed_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        for junk in ["", "{", "not json", "[1,2,3]", r#"{"apiKey": 42}"#] {
            std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
            std::fs::write(store.path(), junk).unwrap();
            assert!(store.api_key().is_none(), "input: {junk:?}");
            assert!(store.model().is_none(), "input: {junk:?}");
        }
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save_api_key("sk-or-abc").unwrap();
        assert!(store.path().exists());
        assert_eq!(store.api_key().as_deref(), Some("sk-or-abc"));
    }

    #[test]
    fn test_save_merges_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save_api_key("sk-or-abc").unwrap();
        store.save_model("custom/model").unwrap();
        assert_eq!(store.api_key().as_deref(), Some("sk-or-abc"));
        assert_eq!(store.model().as_deref(), Some("custom/model"));

        store.save_api_key("sk-or-new").unwrap();
        assert_eq!(store.model().as_deref(), Some("custom/model"));
    }

    #[test]
    fn test_file_uses_camel_case_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save_api_key("sk-or-abc").unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["apiKey"], "sk-or-abc");
        assert!(raw.get("model").is_none());
    }

    #[test]
    fn test_unknown_fields_survive_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), r#"{"apiKey":"k","theme":"dark"}"#).unwrap();

        store.save_model("m").unwrap();
        let config = store.load();
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.model.as_deref(), Some("m"));
        assert_eq!(config.extra["theme"], "dark");
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let plain = store_in(&dir);
        plain.save_api_key("file-key").unwrap();
        plain.save_model("file/model").unwrap();

        let store = ConfigStore::new(
            config_path(dir.path()),
            Some("env-key".to_string()),
            Some("env/model".to_string()),
        );
        assert_eq!(store.api_key().as_deref(), Some("env-key"));
        assert_eq!(store.model().as_deref(), Some("env/model"));
    }

    #[test]
    fn test_from_environment_requires_home() {
        let env = Environment::default();
        assert!(ConfigStore::from_environment(&env).is_err());
    }

    #[test]
    fn test_default_model_is_first_choice() {
        assert_eq!(DEFAULT_MODEL, FREE_MODELS[0].id);
    }
}
