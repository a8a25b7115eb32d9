//! Gemini `generateContent` client.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GenerationConfig;
use crate::error::{GenerationError, GenerationResult};
use crate::generator::{CodeGenerator, GenerationRequest};

/// HTTP client for the hosted Gemini model.
pub struct GeminiClient {
    config: GenerationConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    fn request_body(&self, prompt: String) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: SamplingConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
                top_p: self.config.top_p,
                top_k: self.config.top_k,
            },
        }
    }

    fn map_transport_error(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::timeout(self.config.timeout())
        } else {
            GenerationError::Service(err.to_string())
        }
    }
}

#[async_trait]
impl CodeGenerator for GeminiClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, request: &GenerationRequest) -> GenerationResult<String> {
        let credential = request.validate()?;
        let body = self.request_body(request.prompt());

        debug!(endpoint = %self.config.endpoint(), "POST generateContent");

        let response = self
            .client
            .post(self.config.endpoint())
            .query(&[("key", credential.expose())])
            .timeout(self.config.timeout())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Generation API returned an error");
            return Err(http_error(status, &text));
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Service(format!("Failed to parse response: {}", e)))?;

        parsed.first_text().ok_or_else(|| {
            GenerationError::InvalidResponse("Model returned an empty response.".to_string())
        })
    }
}

/// Build a typed error from a non-success response body.
fn http_error(status: StatusCode, body: &str) -> GenerationError {
    let details: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let message = details
        .as_ref()
        .and_then(|v| serde_json::from_value::<GeminiErrorBody>(v.clone()).ok())
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            format!(
                "API Error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )
            .trim_end()
            .to_string()
        });

    GenerationError::Http {
        status: status.as_u16(),
        message,
        details,
    }
}

// Gemini API types
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: SamplingConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SamplingConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    top_k: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

impl GeminiResponse {
    fn first_text(&self) -> Option<String> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .map(|p| p.text.clone())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let client = GeminiClient::new(GenerationConfig::default());
        let body = serde_json::to_value(client.request_body("hello".to_string())).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 8192);
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert!(body["generationConfig"]["temperature"].is_number());
        assert!(body["generationConfig"]["topP"].is_number());
    }

    #[test]
    fn test_first_text() {
        let parsed: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"<html></html>"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.first_text().as_deref(), Some("<html></html>"));

        let empty: GeminiResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(empty.first_text().is_none());

        let no_content: GeminiResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(no_content.first_text().is_none());
    }

    #[test]
    fn test_http_error_uses_provider_message() {
        let err = http_error(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"message":"API key not valid","code":400}}"#,
        );
        match err {
            GenerationError::Http {
                status,
                message,
                details,
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid");
                assert_eq!(details.unwrap()["error"]["code"], 400);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_http_error_without_body() {
        let err = http_error(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(err.to_string(), "API Error: 503 Service Unavailable");
        assert!(err.details().is_none());
    }
}
