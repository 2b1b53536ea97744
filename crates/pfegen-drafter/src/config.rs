//! Configuration for the drafter

use pfegen_domain::metadata::{DEFAULT_DEPARTMENT, DEFAULT_INSTITUTION};
use serde::{Deserialize, Serialize};

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default sampling temperature (favours consistency over creativity)
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

/// Default language of the generated report
pub const DEFAULT_LANGUAGE: &str = "French";

/// Configuration for drafting sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrafterConfig {
    /// Model identifier passed to the provider
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Language the report body is written in
    pub language: String,

    /// Institution named in the assistant's role
    pub institution: String,

    /// School or department named in the assistant's role
    pub department: String,
}

impl DrafterConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be between 0.0 and 2.0 (got {})",
                self.temperature
            ));
        }
        if self.language.trim().is_empty() {
            return Err("language must not be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for DrafterConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            language: DEFAULT_LANGUAGE.to_string(),
            institution: DEFAULT_INSTITUTION.to_string(),
            department: DEFAULT_DEPARTMENT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DrafterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.temperature, 0.5);
    }

    #[test]
    fn test_invalid_temperature() {
        let config = DrafterConfig {
            temperature: 3.5,
            ..DrafterConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_model_rejected() {
        let config = DrafterConfig {
            model: "  ".to_string(),
            ..DrafterConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = DrafterConfig::from_toml("temperature = 0.2").unwrap();
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.language, DEFAULT_LANGUAGE);
    }

    #[test]
    fn test_to_toml_mentions_model() {
        let toml_str = DrafterConfig::default().to_toml().unwrap();
        assert!(toml_str.contains("gemini-3-flash-preview"));
    }
}
