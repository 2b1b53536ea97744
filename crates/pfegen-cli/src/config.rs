//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use pfegen_domain::metadata::{DEFAULT_ACADEMIC_YEAR, DEFAULT_DEPARTMENT, DEFAULT_INSTITUTION};
use pfegen_domain::ProjectMetadata;
use pfegen_drafter::{DrafterConfig, DEFAULT_LANGUAGE, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Model and prompt settings
    #[serde(default)]
    pub generation: GenerationSettings,

    /// Values pre-filled in every new project form
    #[serde(default)]
    pub defaults: InstitutionDefaults,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Command history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Language of the generated report
    #[serde(default = "default_language")]
    pub language: String,

    /// Override for the Gemini API endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

/// Institutional defaults for new projects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstitutionDefaults {
    /// University or institution
    #[serde(default = "default_institution")]
    pub institution: String,

    /// School or department
    #[serde(default = "default_department")]
    pub department: String,

    /// Academic year label
    #[serde(default = "default_academic_year")]
    pub academic_year: String,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".pfegen").join("config.toml"))
    }

    /// Load configuration from a file, or defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            config.drafter_config().validate().map_err(CliError::Config)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Drafter settings derived from this configuration.
    pub fn drafter_config(&self) -> DrafterConfig {
        DrafterConfig {
            model: self.generation.model.clone(),
            temperature: self.generation.temperature,
            language: self.generation.language.clone(),
            institution: self.defaults.institution.clone(),
            department: self.defaults.department.clone(),
        }
    }

    /// A blank project form pre-filled with the institutional defaults.
    pub fn default_metadata(&self) -> ProjectMetadata {
        ProjectMetadata::with_institution(
            self.defaults.institution.clone(),
            self.defaults.department.clone(),
            self.defaults.academic_year.clone(),
        )
    }

    /// Pick the API key: explicit value first, then the configured variable.
    pub fn resolve_api_key(&self, explicit: Option<String>) -> Result<String> {
        explicit
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(&self.generation.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| CliError::MissingApiKey(self.generation.api_key_env.clone()))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            history_size: default_history_size(),
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            language: default_language(),
            endpoint: None,
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for InstitutionDefaults {
    fn default() -> Self {
        Self {
            institution: default_institution(),
            department: default_department(),
            academic_year: default_academic_year(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_history_size() -> usize {
    1000
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_institution() -> String {
    DEFAULT_INSTITUTION.to_string()
}

fn default_department() -> String {
    DEFAULT_DEPARTMENT.to_string()
}

fn default_academic_year() -> String {
    DEFAULT_ACADEMIC_YEAR.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert_eq!(config.generation.model, DEFAULT_MODEL);
        assert_eq!(config.generation.temperature, 0.5);
        assert_eq!(config.defaults.academic_year, "2025-2026");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.generation.model = "gemini-2.5-pro".to_string();
        config.defaults.academic_year = "2026-2027".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.generation.model, "gemini-2.5-pro");
        assert_eq!(loaded.defaults.academic_year, "2026-2027");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.generation.api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[generation]\nlanguage = \"English\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.generation.language, "English");
        assert_eq!(config.generation.model, DEFAULT_MODEL);
        assert_eq!(config.defaults.institution, DEFAULT_INSTITUTION);
    }

    #[test]
    fn test_invalid_temperature_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[generation]\ntemperature = 9.0\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(CliError::Config(_))));
    }

    #[test]
    fn test_default_metadata_uses_defaults() {
        let mut config = Config::default();
        config.defaults.institution = "Université Test".to_string();
        let metadata = config.default_metadata();
        assert_eq!(metadata.institution, "Université Test");
        assert!(metadata.title.is_empty());
    }

    #[test]
    fn test_api_key_read_from_configured_variable() {
        let mut config = Config::default();
        config.generation.api_key_env = "PFEGEN_TEST_CONFIGURED_KEY_VAR".to_string();
        std::env::set_var("PFEGEN_TEST_CONFIGURED_KEY_VAR", "from-config");

        assert_eq!(config.resolve_api_key(None).unwrap(), "from-config");
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let mut config = Config::default();
        config.generation.api_key_env = "PFEGEN_TEST_UNSET_KEY_VAR".to_string();
        assert_eq!(config.resolve_api_key(Some("abc".into())).unwrap(), "abc");
        assert!(matches!(
            config.resolve_api_key(None),
            Err(CliError::MissingApiKey(var)) if var == "PFEGEN_TEST_UNSET_KEY_VAR"
        ));
    }
}
