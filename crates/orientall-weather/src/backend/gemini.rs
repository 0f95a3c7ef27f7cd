//! Google Gemini `generateContent` backend.

use std::sync::Arc;

use orientall_core::{AiConfig, NetworkError, ReqwestErrorExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{BackendError, GenerateOptions, Generation, GenerativeBackend};
use crate::types::Source;

#[derive(Clone)]
pub struct GeminiBackend {
    client: Arc<Client>,
    endpoint: String,
    api_key: String,
}

impl std::fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl GeminiBackend {
    pub fn new(config: &AiConfig) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| NetworkError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
            api_key: config.api_key().unwrap_or_default().to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Serialize)]
struct GoogleSearch {}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Deserialize)]
struct WebChunk {
    uri: Option<String>,
    title: Option<String>,
}

/// Google API error envelope.
#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    status: Option<String>,
    #[serde(default)]
    details: Vec<ApiErrorReason>,
}

#[derive(Deserialize)]
struct ApiErrorReason {
    reason: Option<String>,
}

fn rejection(status: u16, body: &str) -> BackendError {
    match serde_json::from_str::<ApiError>(body) {
        Ok(err) => BackendError::Rejected {
            status,
            provider_status: err.error.status,
            reason: err.error.details.into_iter().find_map(|d| d.reason),
            message: err.error.message,
        },
        Err(_) => BackendError::Rejected {
            status,
            provider_status: None,
            reason: None,
            message: format!("HTTP {status}: {body}"),
        },
    }
}

impl From<GenerateResponse> for Generation {
    fn from(response: GenerateResponse) -> Self {
        let Some(candidate) = response.candidates.into_iter().next() else {
            return Generation::default();
        };

        let text = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
            .unwrap_or_default();

        let citations = candidate
            .grounding_metadata
            .map(|m| {
                m.grounding_chunks
                    .into_iter()
                    .filter_map(|chunk| chunk.web)
                    .filter_map(|web| {
                        Some(Source {
                            uri: web.uri?,
                            title: web.title.unwrap_or_default(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Generation { text, citations }
    }
}

#[async_trait::async_trait]
impl GenerativeBackend for GeminiBackend {
    #[instrument(skip(self, prompt), fields(endpoint = %self.endpoint), level = "debug")]
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<Generation, BackendError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
            tools: if options.enable_search {
                vec![Tool {
                    google_search: GoogleSearch {},
                }]
            } else {
                Vec::new()
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "Gemini rejected request");
            return Err(rejection(status.as_u16(), &body));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| NetworkError::InvalidResponse(e.to_string()))?;

        Ok(parsed.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/models/gemini-2.5-flash:generateContent";

    fn config_for(server: &MockServer) -> AiConfig {
        AiConfig {
            api_key: Some("test-key".into()),
            base_url: server.uri(),
            ..AiConfig::default()
        }
    }

    #[test]
    fn test_endpoint_format() {
        let config = AiConfig {
            base_url: "https://example.com/v1beta/".into(),
            ..AiConfig::default()
        };
        let backend = GeminiBackend::new(&config).unwrap();
        assert_eq!(
            backend.endpoint(),
            "https://example.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = AiConfig {
            api_key: Some("super-secret".into()),
            ..AiConfig::default()
        };
        let backend = GeminiBackend::new(&config).unwrap();
        assert!(!format!("{backend:?}").contains("super-secret"));
    }

    #[tokio::test]
    async fn test_generate_with_citations() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "tools": [{"google_search": {}}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {"parts": [{"text": "{\"city\":"}, {"text": "\"Paris\"}"}]},
                    "groundingMetadata": {
                        "groundingChunks": [
                            {"web": {"uri": "https://weather.example/paris", "title": "Paris weather"}},
                            {"web": {"uri": "https://news.example/paris"}},
                            {"retrievedContext": {}}
                        ]
                    }
                }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let backend = GeminiBackend::new(&config_for(&mock_server)).unwrap();
        let generation = backend
            .generate("weather please", &GenerateOptions::with_search())
            .await
            .unwrap();

        assert_eq!(generation.text, "{\"city\":\"Paris\"}");
        assert_eq!(generation.citations.len(), 2);
        assert_eq!(generation.citations[0].title, "Paris weather");
        assert_eq!(generation.citations[1].uri, "https://news.example/paris");
        assert_eq!(generation.citations[1].title, "");
    }

    #[tokio::test]
    async fn test_generate_without_candidates_is_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&mock_server)
            .await;

        let backend = GeminiBackend::new(&config_for(&mock_server)).unwrap();
        let generation = backend
            .generate("prompt", &GenerateOptions::default())
            .await
            .unwrap();

        assert_eq!(generation, Generation::default());
    }

    #[tokio::test]
    async fn test_invalid_key_rejection() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT",
                    "details": [{"@type": "type.googleapis.com/google.rpc.ErrorInfo", "reason": "API_KEY_INVALID"}]
                }
            })))
            .mount(&mock_server)
            .await;

        let backend = GeminiBackend::new(&config_for(&mock_server)).unwrap();
        let err = backend
            .generate("prompt", &GenerateOptions::with_search())
            .await
            .unwrap_err();

        match err {
            BackendError::Rejected {
                status,
                provider_status,
                reason,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(provider_status.as_deref(), Some("INVALID_ARGUMENT"));
                assert_eq!(reason.as_deref(), Some("API_KEY_INVALID"));
                assert!(message.contains("API key not valid"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&mock_server)
            .await;

        let backend = GeminiBackend::new(&config_for(&mock_server)).unwrap();
        let err = backend
            .generate("prompt", &GenerateOptions::with_search())
            .await
            .unwrap_err();

        match err {
            BackendError::Rejected { status, message, provider_status, .. } => {
                assert_eq!(status, 503);
                assert!(provider_status.is_none());
                assert!(message.contains("upstream down"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_network_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let config = AiConfig {
            timeout_secs: 1,
            ..config_for(&mock_server)
        };
        let backend = GeminiBackend::new(&config).unwrap();
        let err = backend
            .generate("prompt", &GenerateOptions::with_search())
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Network(NetworkError::Timeout)));
    }
}
