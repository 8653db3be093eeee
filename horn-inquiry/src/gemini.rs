use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use horn_store::app_config::GenerationConfig;

use crate::summary::{SummaryError, SummaryGenerator};

/// Gemini `generateContent` client used to draft the email brief.
#[derive(Debug, Clone)]
pub struct GeminiSummaryClient {
    config: GenerationConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

impl GeminiSummaryClient {
    pub fn new(config: GenerationConfig) -> Result<Self, SummaryError> {
        if config.api_key.is_empty() {
            return Err(SummaryError::Api(
                "generation API key is not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl SummaryGenerator for GeminiSummaryClient {
    async fn complete(&self, prompt: &str) -> Result<String, SummaryError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        );
        debug!(model = %self.config.model, "requesting email brief");

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!(%status, "generation service rejected the request");
            return Err(SummaryError::Api(format!("HTTP {}: {}", status, text)));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|err| SummaryError::InvalidResponse(err.to_string()))?;

        // Empty candidate text is legal here; the caller substitutes the
        // stock body.
        let brief = parsed
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        Ok(brief)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> GenerationConfig {
        GenerationConfig {
            model: "gemini-3-flash-preview".to_string(),
            api_key: "test-key".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            timeout_seconds: 30,
        }
    }

    #[test]
    fn test_client_requires_api_key() {
        let mut config = test_config();
        config.api_key = String::new();
        assert!(matches!(
            GeminiSummaryClient::new(config),
            Err(SummaryError::Api(_))
        ));
        assert!(GeminiSummaryClient::new(test_config()).is_ok());
    }

    #[test]
    fn test_response_text_is_joined_across_parts() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "Dear ticketing team,"},
                        {"text": " please see the brief below."}
                    ]
                }
            }]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        let brief: String = parsed.candidates[0]
            .content
            .parts
            .iter()
            .map(|part| part.text.as_str())
            .collect();
        assert_eq!(brief, "Dear ticketing team, please see the brief below.");
    }

    #[test]
    fn test_empty_candidates_deserialize() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
