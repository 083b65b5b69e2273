use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::keyboard::layout::Language;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Used when no language preference has been saved yet.
    #[serde(default = "default_language")]
    pub default_language: String,
    #[serde(default = "default_status_duration_ms")]
    pub status_duration_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_language() -> String {
    "english".to_string()
}
fn default_status_duration_ms() -> u64 {
    2000
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("harfboard")
        .to_string_lossy()
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            default_language: default_language(),
            status_duration_ms: default_status_duration_ms(),
            log_level: default_log_level(),
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize_default_language();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("harfboard")
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("harfboard.log")
    }

    pub fn status_duration(&self) -> Duration {
        Duration::from_millis(self.status_duration_ms)
    }

    /// Parsed default language. Call `normalize_default_language` first to
    /// guarantee the stored code is valid.
    pub fn language(&self) -> Language {
        self.default_language.parse().unwrap_or_default()
    }

    /// Reset `default_language` to english if it names an unsupported
    /// language. Language codes are case-insensitive here.
    pub fn normalize_default_language(&mut self) {
        let lowered = self.default_language.trim().to_lowercase();
        if Language::is_supported(&lowered) {
            self.default_language = lowered;
        } else {
            tracing::warn!(
                value = %self.default_language,
                "unsupported default_language in config, using english"
            );
            self.default_language = default_language();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.theme, "terminal-default");
        assert_eq!(config.default_language, "english");
        assert_eq!(config.status_duration_ms, 2000);
        assert_eq!(config.status_duration(), Duration::from_secs(2));
        assert!(config.data_dir.contains("harfboard"));
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
theme = "catppuccin-mocha"
default_language = "urdu"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "catppuccin-mocha");
        assert_eq!(config.language(), Language::Urdu);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.default_language, deserialized.default_language);
        assert_eq!(config.status_duration_ms, deserialized.status_duration_ms);
        assert_eq!(config.data_dir, deserialized.data_dir);
    }

    #[test]
    fn test_normalize_default_language_accepts_any_case() {
        let mut config = Config::default();
        config.default_language = " Urdu ".to_string();
        config.normalize_default_language();
        assert_eq!(config.default_language, "urdu");
    }

    #[test]
    fn test_normalize_default_language_invalid_resets() {
        let mut config = Config::default();
        config.default_language = "symbols".to_string();
        config.normalize_default_language();
        assert_eq!(config.default_language, "english");
        assert_eq!(config.language(), Language::English);
    }

    #[test]
    fn test_log_path_under_data_dir() {
        let mut config = Config::default();
        config.data_dir = "/tmp/hb".to_string();
        assert_eq!(config.log_path(), PathBuf::from("/tmp/hb/harfboard.log"));
    }
}
