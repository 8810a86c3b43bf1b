//! Gemini text-generation adapter.
//!
//! Implements the [`pipeline::ReportGenerator`] trait for Google's Gemini
//! `generateContent` API. Every call is a single, non-streaming request with
//! no retry; failures are returned to the orchestrator as
//! [`pipeline::GenerationError`] values.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, request formatting, and response
//! parsing live here. The [`pipeline`] crate sees only
//! [`pipeline::ReportGenerator`].
//!
//! The API key travels in the `x-goog-api-key` header rather than the query
//! string so request URLs can be logged safely.

mod wire;

use std::time::Duration;

use async_trait::async_trait;
use pipeline::{Credentials, GenerationError, ModelId, ReportGenerator, ReportText};
use reqwest::{Client, Url};
use tracing::debug;

/// The default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Settings for [`GeminiGenerator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    /// API root including the version segment.
    pub base_url: String,
    /// Model every request is sent to.
    pub model: ModelId,
    /// Timeout for establishing a connection.
    pub connect_timeout: Duration,
    /// Timeout for one generation request.
    pub request_timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: ModelId::default(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }
}

/// [`ReportGenerator`] backed by the Gemini API.
///
/// The model is resolved when the generator is built, but a model that
/// cannot be used is only reported by [`ReportGenerator::generate`], as
/// [`GenerationError::ModelInit`]. A bad model id therefore ends the run at
/// its first generation stage instead of preventing the run from starting.
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    model: ModelId,
    transport: Result<Transport, GenerationError>,
}

#[derive(Debug, Clone)]
struct Transport {
    client: Client,
    endpoint: Url,
}

impl Transport {
    fn build(config: &GeminiConfig) -> Result<Self, GenerationError> {
        let endpoint = generate_endpoint(&config.base_url, &config.model)?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| GenerationError::model_init(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, endpoint })
    }
}

impl GeminiGenerator {
    /// Creates a generator for the configured model.
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            transport: Transport::build(&config),
            model: config.model,
        }
    }
}

/// Resolves `{base_url}/models/{model}:generateContent`.
fn generate_endpoint(base_url: &str, model: &ModelId) -> Result<Url, GenerationError> {
    let valid_model = model
        .as_str()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'));
    if !valid_model {
        return Err(GenerationError::model_init(format!(
            "Invalid model identifier '{model}'"
        )));
    }

    let mut base = Url::parse(base_url)
        .map_err(|e| GenerationError::model_init(format!("Invalid generation base URL: {e}")))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(&format!("models/{model}:generateContent"))
        .map_err(|e| GenerationError::model_init(format!("Invalid generation endpoint: {e}")))
}

#[async_trait]
impl ReportGenerator for GeminiGenerator {
    fn model(&self) -> &ModelId {
        &self.model
    }

    async fn generate(
        &self,
        credentials: &Credentials,
        prompt: &str,
    ) -> Result<ReportText, GenerationError> {
        let key = credentials
            .generation()
            .ok_or(GenerationError::MissingCredential)?;
        let Transport { client, endpoint } = self.transport.as_ref().map_err(Clone::clone)?;

        debug!(
            model = self.model.as_str(),
            url = endpoint.as_str(),
            prompt_chars = prompt.len(),
            "Sending Gemini generation request"
        );

        let response = client
            .post(endpoint.clone())
            .header("x-goog-api-key", key.expose())
            .json(&wire::request_body(prompt))
            .send()
            .await
            .map_err(|e| {
                GenerationError::generation(format!("Request to generation API failed: {e}"))
            })?;

        let status = response.status();
        let body_text = response.text().await.map_err(|e| {
            GenerationError::generation(format!("Failed to read response body: {e}"))
        })?;

        if !status.is_success() {
            return Err(wire::map_http_error(status, &body_text));
        }

        let body: serde_json::Value = serde_json::from_str(&body_text)
            .map_err(|e| GenerationError::generation(format!("Invalid JSON in response: {e}")))?;

        wire::parse_response(&body).map(ReportText::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials::from_raw("fc-key", "gemini-key")
    }

    #[test]
    fn test_default_endpoint() {
        let generator = GeminiGenerator::new(GeminiConfig::default());
        let transport = generator.transport.as_ref().unwrap();
        assert_eq!(
            transport.endpoint.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert_eq!(generator.model().as_str(), "gemini-1.5-flash");
    }

    #[test]
    fn test_default_timeouts() {
        let config = GeminiConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.request_timeout, Duration::from_secs(120));
    }

    #[tokio::test]
    async fn test_invalid_model_fails_at_generation_time() {
        let generator = GeminiGenerator::new(GeminiConfig {
            model: ModelId::new("gemini/../../admin").unwrap(),
            ..GeminiConfig::default()
        });
        assert_eq!(generator.model().as_str(), "gemini/../../admin");

        let err = generator.generate(&credentials(), "prompt").await.unwrap_err();
        match err {
            GenerationError::ModelInit { message } => {
                assert!(message.contains("gemini/../../admin"));
            }
            other => panic!("Expected ModelInit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_base_url_fails_at_generation_time() {
        let generator = GeminiGenerator::new(GeminiConfig {
            base_url: "::not a url::".into(),
            ..GeminiConfig::default()
        });
        assert!(matches!(
            generator.generate(&credentials(), "prompt").await,
            Err(GenerationError::ModelInit { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_request() {
        let generator = GeminiGenerator::new(GeminiConfig {
            base_url: "http://127.0.0.1:9/v1beta".into(),
            ..GeminiConfig::default()
        });
        let creds = Credentials::from_raw("fc-key", "");

        let err = generator.generate(&creds, "prompt").await.unwrap_err();
        assert_eq!(err, GenerationError::MissingCredential);
    }
}
