//! Docker Quest configuration.
//!
//! Config file: $QUEST_CONFIG, else ~/.config/docker-quest/config.toml.
//! Every section is optional; missing keys take their defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::completion::CompletionPolicy;
use crate::error::{QuestError, Result};
use crate::locale::{Locale, Os};

pub const CONFIG_ENV: &str = "QUEST_CONFIG";
const APP_DIR: &str = "docker-quest";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Overrides the locale stored in the profile
    #[serde(default)]
    pub locale: Option<Locale>,
    #[serde(default)]
    pub os: Option<Os>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Where the dq-*.json records live
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeConfig {
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,
}

fn default_step_delay_ms() -> u64 {
    1000
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: default_step_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Re-award completion XP every time a chapter is completed
    #[serde(default)]
    pub allow_repeat_completion: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// External catalog JSON; the bundled catalog is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestConfig {
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub practice: PracticeConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl QuestConfig {
    /// ~/.config/docker-quest/config.toml
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// ~/.local/share/docker-quest
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Load configuration
    ///
    /// Priority:
    /// 1. $QUEST_CONFIG
    /// 2. User config (~/.config/docker-quest/config.toml)
    /// 3. Defaults
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load_from(Path::new(&path));
        }
        match Self::user_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let shown = path.display();
        let contents = fs::read_to_string(path)
            .map_err(|e| QuestError::Config(format!("Failed to read {}: {}", shown, e)))?;
        let config = Self::parse(&contents)
            .map_err(|e| QuestError::Config(format!("Failed to parse {}: {}", shown, e)))?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn data_dir(&self) -> PathBuf {
        match &self.storage.data_dir {
            Some(dir) => dir.clone(),
            None => Self::default_data_dir(),
        }
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.practice.step_delay_ms)
    }

    pub fn completion_policy(&self) -> CompletionPolicy {
        if self.progress.allow_repeat_completion {
            CompletionPolicy::AllowRepeat
        } else {
            CompletionPolicy::Guarded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = QuestConfig::parse("").unwrap();
        assert_eq!(config, QuestConfig::default());
        assert_eq!(config.step_delay(), Duration::from_millis(1000));
        assert_eq!(config.completion_policy(), CompletionPolicy::Guarded);
    }

    #[test]
    fn test_full_config() {
        let config = QuestConfig::parse(
            r#"
            [profile]
            locale = "en"
            os = "mac"

            [storage]
            data_dir = "/tmp/quest"

            [practice]
            step_delay_ms = 0

            [progress]
            allow_repeat_completion = true
            "#,
        )
        .unwrap();
        assert_eq!(config.profile.locale, Some(Locale::En));
        assert_eq!(config.profile.os, Some(Os::Mac));
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/quest"));
        assert_eq!(config.step_delay(), Duration::ZERO);
        assert_eq!(config.completion_policy(), CompletionPolicy::AllowRepeat);
    }

    #[test]
    fn test_invalid_locale_rejected() {
        assert!(QuestConfig::parse("[profile]\nlocale = \"fr\"").is_err());
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = QuestConfig::load_from(Path::new("/nonexistent/quest.toml")).unwrap_err();
        assert!(matches!(err, QuestError::Config(_)));
    }
}
