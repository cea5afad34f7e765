use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set — the narrative extractor has no default credential")]
    MissingApiKey,
    #[error("Invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Connection settings for the remote text-understanding service.
///
/// The credential is injected configuration with no fallback value; a
/// process that cannot find one refuses to start instead of failing on the
/// first request.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Hard deadline for each remote call; expiry surfaces as a distinct
    /// error kind rather than an open-ended hang.
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read configuration from the environment.
    ///
    /// `GEMINI_MODEL`, `GEMINI_BASE_URL`, and `GEMINI_TIMEOUT_SECS` fall
    /// back to defaults; `GEMINI_API_KEY` must be present and non-empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.model = model;
        }
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(raw) = std::env::var("GEMINI_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| ConfigError::Invalid {
                name: "GEMINI_TIMEOUT_SECS",
                value: raw,
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_defaults() {
        let config = GeminiConfig::new("secret");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    // Environment mutation is process-global, so every from_env case lives
    // in one test to keep the harness's parallel runner away from it.
    #[test]
    fn from_env_requires_credential_and_reads_knobs() {
        std::env::remove_var("GEMINI_API_KEY");
        assert!(matches!(
            GeminiConfig::from_env(),
            Err(ConfigError::MissingApiKey)
        ));

        std::env::set_var("GEMINI_API_KEY", "");
        assert!(matches!(
            GeminiConfig::from_env(),
            Err(ConfigError::MissingApiKey)
        ));

        std::env::set_var("GEMINI_API_KEY", "k");
        std::env::set_var("GEMINI_MODEL", "gemini-2.0-flash");
        std::env::set_var("GEMINI_TIMEOUT_SECS", "5");
        let config = GeminiConfig::from_env().unwrap();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.timeout, Duration::from_secs(5));

        std::env::set_var("GEMINI_TIMEOUT_SECS", "soon");
        assert!(matches!(
            GeminiConfig::from_env(),
            Err(ConfigError::Invalid { name: "GEMINI_TIMEOUT_SECS", .. })
        ));

        std::env::remove_var("GEMINI_API_KEY");
        std::env::remove_var("GEMINI_MODEL");
        std::env::remove_var("GEMINI_TIMEOUT_SECS");
    }
}
