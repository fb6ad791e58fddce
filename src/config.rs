//! Configuration management for the ATS analyzer

use crate::error::{AtsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub model: ModelConfig,
    pub validation: ValidationConfig,
    pub output: OutputConfig,
}

/// Hosted model settings. The API key itself never lives here, only the
/// name of the environment variable it is read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model_name: String,
    pub endpoint: String,
    pub api_key_env: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub keyword_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    pub enabled: bool,
    pub summary_sentences: usize,
    pub max_summary_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig {
                model_name: "gemini-1.5-flash".to_string(),
                endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                api_key_env: "GEMINI_API_KEY".to_string(),
                max_output_tokens: 1024,
                temperature: 0.7,
                keyword_limit: 10,
            },
            validation: ValidationConfig {
                enabled: true,
                summary_sentences: 4,
                max_summary_chars: 500,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| AtsError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AtsError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("ats-analyzer")
            .join("config.toml")
    }

    fn validate(&self) -> Result<()> {
        if self.model.model_name.trim().is_empty() {
            return Err(AtsError::Configuration("model.model_name must not be empty".to_string()));
        }
        if self.model.api_key_env.trim().is_empty() {
            return Err(AtsError::Configuration("model.api_key_env must not be empty".to_string()));
        }
        if self.model.keyword_limit == 0 {
            return Err(AtsError::Configuration("model.keyword_limit must be at least 1".to_string()));
        }
        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(AtsError::Configuration(format!(
                "model.temperature must be between 0.0 and 2.0, got {}",
                self.model.temperature
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.model.model_name, "gemini-1.5-flash");
        assert_eq!(config.model.max_output_tokens, 1024);
        assert_eq!(config.model.temperature, 0.7);
        assert_eq!(config.model.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.validation.summary_sentences, 4);
        assert_eq!(config.validation.max_summary_chars, 500);
        assert_eq!(config.output.format, OutputFormat::Console);
    }

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.model.keyword_limit, 10);

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.model.endpoint, config.model.endpoint);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.model.keyword_limit = 0;
        config.save_to(&path).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, AtsError::Configuration(_)));
    }

    #[test]
    fn test_output_format_is_lowercase_in_toml() {
        let content = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(content.contains("format = \"console\""));
        assert!(!content.contains("GEMINI_API_KEY="));
    }
}
