use crate::config::GeminiSettings;
use crate::services::llm::{LlmClient, LlmError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Google Gemini `generateContent` client
///
/// One instance is bound to a single model; the service keeps one for
/// analysis and one for summarization.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    temperature: Option<f32>,
    timeout: Duration,
    client: Client,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        temperature: Option<f32>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            model,
            temperature,
            timeout,
            client,
        })
    }

    /// Client for the conversation-analysis model
    pub fn analysis(settings: &GeminiSettings) -> Result<Self, LlmError> {
        Self::new(
            settings.base_url.clone(),
            settings.api_key.clone(),
            settings.analysis_model.clone(),
            Some(settings.analysis_temperature),
            settings.timeout(),
        )
    }

    /// Client for the summarization model
    pub fn summary(settings: &GeminiSettings) -> Result<Self, LlmError> {
        Self::new(
            settings.base_url.clone(),
            settings.api_key.clone(),
            settings.summary_model.clone(),
            settings.summary_temperature,
            settings.timeout(),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: self.temperature.map(|temperature| GenerationConfig { temperature }),
        };

        tracing::debug!("Requesting completion from {} ({} prompt chars)", self.model, prompt.len());

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout.as_secs())
                } else {
                    LlmError::Request(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            tracing::error!("Gemini {} returned {}: {}", self.model, status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("Missing candidates array".into()))?;

        let text = candidate
            .content
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or(LlmError::EmptyContent)?;

        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::Server) -> GeminiClient {
        GeminiClient::new(
            server.url(),
            "test_key".to_string(),
            "gemini-test".to_string(),
            Some(0.0),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_complete_returns_first_part() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-test:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test_key".into()))
            .match_body(Matcher::PartialJson(serde_json::json!({
                "contents": [{ "parts": [{ "text": "Rate this" }] }],
                "generationConfig": { "temperature": 0.0 }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"{\"Q1\":\"Good\"}"}]}}]}"#)
            .create_async()
            .await;

        let text = client_for(&server).complete("Rate this").await.unwrap();

        assert_eq!(text, r#"{"Q1":"Good"}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_carries_provider_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-test:generateContent")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error":{"code":403,"message":"API key not valid"}}"#)
            .create_async()
            .await;

        let err = client_for(&server).complete("hi").await.unwrap_err();

        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_text_is_empty_content() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-test:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":""}]}}]}"#)
            .create_async()
            .await;

        let err = client_for(&server).complete("hi").await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[tokio::test]
    async fn test_whitespace_text_is_returned() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-test:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"  \n"}]}}]}"#)
            .create_async()
            .await;

        let text = client_for(&server).complete("hi").await.unwrap();
        assert_eq!(text, "  \n");
    }

    #[tokio::test]
    async fn test_no_candidates_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-test:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
            .create_async()
            .await;

        let err = client_for(&server).complete("hi").await.unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    #[test]
    fn test_settings_select_models() {
        let settings = GeminiSettings::default();
        assert_eq!(GeminiClient::analysis(&settings).unwrap().model(), "gemini-2.0-flash-exp");
        assert_eq!(GeminiClient::summary(&settings).unwrap().model(), "gemini-1.5-flash");
    }
}
