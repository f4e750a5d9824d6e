use std::env;

use crate::api_connection::endpoints::{DEFAULT_GEMINI_MODEL, GEMINI_BASE_URL};

pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

/// Everything the analysis client needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub api_key: Option<String>,
    /// Name of the variable the key was read from, for error reporting.
    pub api_key_env_var: String,
    pub model: String,
    pub base_url: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env_var: API_KEY_ENV_VAR.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Reads the API key from `api_key_env_var` (after loading `.env`).
    /// A missing key is not an error here; it surfaces on the first analysis.
    pub fn from_env(api_key_env_var: &str) -> Self {
        dotenv::dotenv().ok();
        let api_key = env::var(api_key_env_var)
            .ok()
            .filter(|value| !value.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("{} is not set; lookups will fail until it is configured", api_key_env_var);
        }
        Self {
            api_key,
            api_key_env_var: api_key_env_var.to_string(),
            ..Self::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_without_key() {
        let config = AnalysisConfig::from_env("NUTRISCAN_TEST_KEY_THAT_DOES_NOT_EXIST");
        assert!(config.api_key.is_none());
        assert_eq!(config.api_key_env_var, "NUTRISCAN_TEST_KEY_THAT_DOES_NOT_EXIST");
        assert_eq!(config.model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn test_builder_overrides() {
        let config = AnalysisConfig::default()
            .with_model("gemini-2.5-pro")
            .with_base_url("http://127.0.0.1:9999");
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.base_url, "http://127.0.0.1:9999");
    }
}
