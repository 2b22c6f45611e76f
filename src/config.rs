//! Gemini settings loaded from the environment

use crate::config_error;
use crate::error::Result;
use std::time::Duration;

/// Model tried first unless GEMINI_MODEL overrides it
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Models tried, in order, after the preferred one
pub const FALLBACK_MODELS: &[&str] = &["gemini-1.5-flash-8b", "gemini-1.5-pro"];

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Gemini client configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub preferred_model: String,
    pub fallback_models: Vec<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            preferred_model: DEFAULT_MODEL.to_string(),
            fallback_models: FALLBACK_MODELS.iter().map(|m| m.to_string()).collect(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| config_error!("Missing GEMINI_API_KEY in environment or .env"))?;

        let mut config = Self::new(api_key);

        if let Some(model) = lookup("GEMINI_MODEL").filter(|m| !m.trim().is_empty()) {
            config.preferred_model = model.trim().to_string();
        }

        if let Some(url) = lookup("GEMINI_BASE_URL").filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(raw) = lookup("GEMINI_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| config_error!("GEMINI_TIMEOUT_SECS must be a whole number, got '{}'", raw))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Preferred model followed by the fallbacks, in attempt order
    pub fn model_chain(&self) -> Vec<String> {
        std::iter::once(self.preferred_model.clone())
            .chain(self.fallback_models.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_fails_fast() {
        let result = GeminiConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(crate::DinerError::Config { .. })));

        let blank = GeminiConfig::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")]));
        assert!(blank.is_err());
    }

    #[test]
    fn test_defaults() {
        let config = GeminiConfig::from_lookup(lookup_from(&[("GEMINI_API_KEY", "k")])).unwrap();
        assert_eq!(
            config.model_chain(),
            vec!["gemini-1.5-flash", "gemini-1.5-flash-8b", "gemini-1.5-pro"]
        );
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_overrides() {
        let config = GeminiConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("GEMINI_BASE_URL", "http://localhost:8080/v1beta/"),
            ("GEMINI_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.model_chain()[0], "gemini-2.0-flash");
        assert_eq!(config.model_chain().len(), 3);
        assert_eq!(config.base_url, "http://localhost:8080/v1beta");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_bad_timeout() {
        let result = GeminiConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_TIMEOUT_SECS", "soon"),
        ]));
        assert!(result.is_err());
    }
}
