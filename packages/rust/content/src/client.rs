//! External generative capability contract.
//!
//! The pipeline consumes text and imagery through a single
//! prompt-in/content-out seam. Any non-success from the capability is
//! treated as transient and handed to the retry policy; nothing here is
//! ever fatal on first failure.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use siteforge_shared::{Result, SiteForgeError};
use tracing::debug;
use url::Url;

/// What kind of content is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerativeKind {
    Text,
    Image,
}

/// A structured prompt sent to the generative capability.
#[derive(Debug, Clone, Serialize)]
pub struct GenerativeRequest {
    /// Content kind.
    pub kind: GenerativeKind,
    /// The prompt text.
    pub prompt: String,
    /// Structured business context forwarded verbatim.
    pub context: serde_json::Value,
}

/// Successful response from the generative capability.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerativeResponse {
    /// Generated content.
    pub content: String,
}

/// The prompt-in/content-out seam to the external generative service.
///
/// Errors are transient-failure signals by contract; the caller applies
/// the retry policy and eventually a deterministic fallback.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Generate content for one request.
    async fn generate(&self, request: &GenerativeRequest) -> Result<GenerativeResponse>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// HTTP-backed generative client speaking a JSON POST protocol:
/// request `{model, kind, prompt, context}`, response `{content}`.
pub struct HttpGenerativeClient {
    client: reqwest::Client,
    endpoint: Url,
    model: String,
    api_key: Option<String>,
}

impl HttpGenerativeClient {
    /// Build a client with a per-call timeout. Exceeding the timeout is
    /// reported as a transient generation error.
    pub fn new(
        endpoint: &str,
        model: impl Into<String>,
        api_key: Option<String>,
        call_timeout: Duration,
    ) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| SiteForgeError::config(format!("invalid generative endpoint: {e}")))?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("SiteForge/", env!("CARGO_PKG_VERSION")))
            .timeout(call_timeout)
            .build()
            .map_err(|e| SiteForgeError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            model: model.into(),
            api_key,
        })
    }
}

#[async_trait]
impl GenerativeClient for HttpGenerativeClient {
    async fn generate(&self, request: &GenerativeRequest) -> Result<GenerativeResponse> {
        let body = serde_json::json!({
            "model": self.model,
            "kind": request.kind,
            "prompt": request.prompt,
            "context": request.context,
        });

        let mut http_request = self.client.post(self.endpoint.clone()).json(&body);
        if let Some(key) = &self.api_key {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request
            .send()
            .await
            .map_err(|e| SiteForgeError::Generation(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SiteForgeError::Generation(format!("HTTP {status}")));
        }

        let parsed: GenerativeResponse = response
            .json()
            .await
            .map_err(|e| SiteForgeError::Generation(format!("invalid response body: {e}")))?;

        if parsed.content.trim().is_empty() {
            return Err(SiteForgeError::Generation("empty content in response".into()));
        }

        debug!(
            kind = ?request.kind,
            content_len = parsed.content.len(),
            "generative call succeeded"
        );

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> GenerativeRequest {
        GenerativeRequest {
            kind: GenerativeKind::Text,
            prompt: "Write a hero headline".into(),
            context: serde_json::json!({"business": "Aurora Design Studio"}),
        }
    }

    #[tokio::test]
    async fn successful_call_returns_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"content": "Design that works"})),
            )
            .mount(&server)
            .await;

        let client = HttpGenerativeClient::new(
            &format!("{}/generate", server.uri()),
            "test-model",
            None,
            Duration::from_secs(5),
        )
        .unwrap();

        let response = client.generate(&request()).await.unwrap();
        assert_eq!(response.content, "Design that works");
    }

    #[tokio::test]
    async fn server_error_is_transient_generation_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = HttpGenerativeClient::new(
            &server.uri(),
            "test-model",
            None,
            Duration::from_secs(5),
        )
        .unwrap();

        let err = client.generate(&request()).await.unwrap_err();
        assert!(matches!(err, SiteForgeError::Generation(_)));
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn empty_content_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"content": "  "})),
            )
            .mount(&server)
            .await;

        let client = HttpGenerativeClient::new(
            &server.uri(),
            "test-model",
            None,
            Duration::from_secs(5),
        )
        .unwrap();

        let err = client.generate(&request()).await.unwrap_err();
        assert!(matches!(err, SiteForgeError::Generation(_)));
    }

    #[tokio::test]
    async fn call_timeout_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"content": "slow"}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = HttpGenerativeClient::new(
            &server.uri(),
            "test-model",
            None,
            Duration::from_millis(50),
        )
        .unwrap();

        let err = client.generate(&request()).await.unwrap_err();
        assert!(matches!(err, SiteForgeError::Generation(_)));
    }

    #[test]
    fn invalid_endpoint_is_config_error() {
        let result = HttpGenerativeClient::new("not a url", "m", None, Duration::from_secs(1));
        assert!(matches!(result, Err(SiteForgeError::Config { .. })));
    }
}
