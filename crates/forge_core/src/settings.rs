//! Local settings store.
//!
//! Settings live in a single JSON file under the Forge home directory:
//!
//! ```text
//! <home>/settings.json
//! {
//!   "apiKey": "AIzaSy...",
//!   "model": "gemini-2.5-flash-preview-09-2025",
//!   "timeoutSecs": 30
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use forge_llm::{Credential, GenerationConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, CoreResult};

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Settings {
    pub fn credential(&self) -> Option<Credential> {
        self.api_key.clone().and_then(Credential::new)
    }

    /// Generation config with any stored overrides applied.
    pub fn generation_config(&self) -> GenerationConfig {
        let mut config = GenerationConfig::default();
        if let Some(model) = &self.model {
            config = config.model(model.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.timeout_secs(secs);
        }
        config
    }
}

/// Reads and writes [`Settings`] under a home directory.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    home: PathBuf,
}

impl SettingsStore {
    pub fn new(home: impl AsRef<Path>) -> Self {
        Self {
            home: home.as_ref().to_path_buf(),
        }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn path(&self) -> PathBuf {
        self.home.join(SETTINGS_FILE)
    }

    /// Load settings; a missing file yields defaults.
    pub fn load(&self) -> CoreResult<Settings> {
        let path = self.path();
        if !path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content)
            .map_err(|e| CoreError::Settings(format!("Failed to parse {}: {}", path.display(), e)))
    }

    pub fn save(&self, settings: &Settings) -> CoreResult<()> {
        fs::create_dir_all(&self.home)?;
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(self.path(), content)?;
        debug!(path = %self.path().display(), "Settings saved");
        Ok(())
    }

    /// Store a credential. A blank value clears the stored one.
    pub fn set_api_key(&self, value: &str) -> CoreResult<()> {
        let mut settings = self.load()?;
        settings.api_key = Credential::new(value).map(|c| c.expose().to_string());
        self.save(&settings)
    }

    pub fn clear_api_key(&self) -> CoreResult<()> {
        self.set_api_key("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_default() {
        let temp = tempdir().unwrap();
        let store = SettingsStore::new(temp.path());
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_set_and_clear_key() {
        let temp = tempdir().unwrap();
        let store = SettingsStore::new(temp.path().join("forge"));

        store.set_api_key("AIzaSyStored").unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.credential().unwrap().expose(), "AIzaSyStored");

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"apiKey\""));

        store.set_api_key("   ").unwrap();
        assert!(store.load().unwrap().credential().is_none());
        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(!raw.contains("apiKey"));
    }

    #[test]
    fn test_overrides_flow_into_config() {
        let settings = Settings {
            api_key: None,
            model: Some("gemini-pro".to_string()),
            timeout_secs: Some(10),
        };
        let config = settings.generation_config();
        assert_eq!(config.model, "gemini-pro");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_corrupt_file_reports_settings_error() {
        let temp = tempdir().unwrap();
        let store = SettingsStore::new(temp.path());
        fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.load(), Err(CoreError::Settings(_))));
    }
}
