use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::GeminiConfig;
use crate::prompt;

#[derive(Debug, Error)]
pub enum LlmError {
    /// Non-success status from the remote service. The Display form keeps
    /// the literal status code and body so degraded answers stay
    /// inspectable by the caller.
    #[error("Error: {status}, {body}")]
    Status { status: u16, body: String },
    /// The response decoded but did not have the expected nested shape.
    #[error("Error parsing response: {0}")]
    Malformed(String),
    /// The configured deadline expired before a response arrived.
    #[error("Text-understanding request timed out after {secs}s")]
    Timeout { secs: u64 },
    /// Connection-level failure (DNS, TLS, reset).
    #[error("Text-understanding request failed: {0}")]
    Transport(reqwest::Error),
}

/// Remote text-understanding capability.
///
/// Implementations answer a single free-text instruction per call; there is
/// no conversation state.
#[async_trait]
pub trait NarrativeBackend: Send + Sync {
    /// Ask the service to extract the identity-field template from `context`.
    async fn answer(&self, context: &str) -> Result<String, LlmError>;
}

// ── Wire types (request side) ─────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

// The response is navigated as a `serde_json::Value`: the contract only
// promises `candidates[0].content.parts[0].text`, and a pointer lookup
// turns any shape drift into one Malformed error instead of a partial
// deserialization.
const ANSWER_POINTER: &str = "/candidates/0/content/parts/0/text";

// ── Gemini client ─────────────────────────────────────────────────────────────

/// Client for the generateContent endpoint of a Gemini-style API.
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(LlmError::Transport)?;
        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn classify(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout {
                secs: self.config.timeout.as_secs(),
            }
        } else {
            LlmError::Transport(err)
        }
    }
}

#[async_trait]
impl NarrativeBackend for GeminiClient {
    async fn answer(&self, context: &str) -> Result<String, LlmError> {
        let instruction = prompt::build_instruction(context);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: &instruction }],
            }],
        };

        tracing::debug!(endpoint = %self.endpoint(), "Requesting narrative extraction");
        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;
        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| LlmError::Malformed(e.to_string()))?;
        value
            .pointer(ANSWER_POINTER)
            .and_then(|text| text.as_str())
            .map(|text| text.trim().to_string())
            .ok_or_else(|| {
                LlmError::Malformed("missing candidates[0].content.parts[0].text".to_string())
            })
    }
}

// ── Mock backend ──────────────────────────────────────────────────────────────

/// Preset reply — lets pipeline and server tests run without the network.
pub enum MockNarrative {
    Answer(String),
    Fail { status: u16, body: String },
}

impl MockNarrative {
    pub fn answering(text: impl Into<String>) -> Self {
        MockNarrative::Answer(text.into())
    }

    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        MockNarrative::Fail {
            status,
            body: body.into(),
        }
    }
}

#[async_trait]
impl NarrativeBackend for MockNarrative {
    async fn answer(&self, _context: &str) -> Result<String, LlmError> {
        match self {
            MockNarrative::Answer(text) => Ok(text.clone()),
            MockNarrative::Fail { status, body } => Err(LlmError::Status {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_model_without_double_slash() {
        let mut config = GeminiConfig::new("k");
        config.base_url = "https://example.test/v1beta/".to_string();
        config.model = "gemini-1.5-flash-latest".to_string();
        let client = GeminiClient::new(config).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-1.5-flash-latest:generateContent"
        );
    }

    #[test]
    fn status_error_displays_literal_status_and_body() {
        let err = LlmError::Status {
            status: 503,
            body: "overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "Error: 503, overloaded");
    }

    #[test]
    fn malformed_error_display_matches_contract() {
        let err = LlmError::Malformed("missing candidates".to_string());
        assert_eq!(err.to_string(), "Error parsing response: missing candidates");
    }

    #[test]
    fn answer_pointer_navigates_nominal_response() {
        let body: serde_json::Value = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "  Name: John Smith\n" }] }
            }]
        });
        let text = body.pointer(ANSWER_POINTER).and_then(|t| t.as_str());
        assert_eq!(text, Some("  Name: John Smith\n"));
    }

    #[tokio::test]
    async fn mock_answering_returns_preset() {
        let mock = MockNarrative::answering("Name: John Smith");
        assert_eq!(mock.answer("anything").await.unwrap(), "Name: John Smith");
    }

    #[tokio::test]
    async fn mock_failing_returns_status_error() {
        let mock = MockNarrative::failing(429, "quota exhausted");
        let err = mock.answer("anything").await.unwrap_err();
        assert_eq!(err.to_string(), "Error: 429, quota exhausted");
    }
}
