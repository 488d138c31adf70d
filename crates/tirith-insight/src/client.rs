// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::error::{InsightError, InsightResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tirith_core::InsightConfig;
use tracing::{debug, info};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub thinking_budget: Option<u32>,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            thinking_budget: None,
        }
    }

    pub fn with_thinking_budget(mut self, budget: u32) -> Self {
        self.thinking_budget = Some(budget);
        self
    }
}

/// Anything that turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> InsightResult<String>;

    fn provider_name(&self) -> &'static str;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        endpoint: Option<String>,
        timeout: Duration,
    ) -> InsightResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(InsightError::Configuration("API key is empty".to_string()));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                InsightError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            api_key,
            endpoint: endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &InsightConfig, api_key: impl Into<String>) -> InsightResult<Self> {
        Self::new(api_key, Some(config.endpoint.clone()), config.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.endpoint)
    }

    fn build_payload(&self, request: &GenerationRequest) -> Value {
        let mut payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }]
            }]
        });
        if let Some(budget) = request.thinking_budget {
            payload["generationConfig"] = json!({
                "thinkingConfig": { "thinkingBudget": budget }
            });
        }
        payload
    }

    fn parse_response(&self, response_data: Value) -> InsightResult<String> {
        let response: GenerateContentResponse = serde_json::from_value(response_data)?;
        if let Some(reason) = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
        {
            return Err(InsightError::Provider(format!("Prompt blocked: {reason}")));
        }
        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter(|part| !part.thought)
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(InsightError::Provider(
                "Failed to extract text from Gemini response".to_string(),
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> InsightResult<String> {
        let payload = self.build_payload(request);
        debug!(model = %request.model, "sending request to Gemini API");

        let response = tokio::time::timeout(
            self.timeout,
            self.client
                .post(self.url(&request.model))
                .header(API_KEY_HEADER, &self.api_key)
                .json(&payload)
                .send(),
        )
        .await
        .map_err(|_| InsightError::Timeout)??;

        let status = response.status();
        info!(model = %request.model, %status, "received response from Gemini API");
        match status {
            s if s.is_success() => {
                let data = response.json::<Value>().await?;
                self.parse_response(data)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let body = response.text().await.unwrap_or_default();
                Err(InsightError::Authentication(format!("Gemini API {status}: {body}")))
            }
            StatusCode::TOO_MANY_REQUESTS => Err(InsightError::RateLimit),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(InsightError::Provider(format!("Gemini API error {status}: {body}")))
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeminiClient {
        GeminiClient::new("key", Some("http://localhost:1/v1beta/".into()), Duration::from_secs(5))
            .unwrap()
    }

    #[test]
    fn test_url_and_payload_shape() {
        let client = client();
        assert_eq!(
            client.url("gemini-3-pro-preview"),
            "http://localhost:1/v1beta/models/gemini-3-pro-preview:generateContent"
        );
        let payload = client.build_payload(
            &GenerationRequest::new("gemini-3-pro-preview", "plan").with_thinking_budget(1024),
        );
        assert_eq!(payload["contents"][0]["parts"][0]["text"], "plan");
        assert_eq!(
            payload["generationConfig"]["thinkingConfig"]["thinkingBudget"],
            1024
        );
        let fast = client.build_payload(&GenerationRequest::new("m", "p"));
        assert!(fast.get("generationConfig").is_none());
    }

    #[test]
    fn test_parse_skips_thought_parts() {
        let text = client()
            .parse_response(json!({
                "candidates": [{
                    "content": { "parts": [
                        { "text": "thinking...", "thought": true },
                        { "text": "- one\n" },
                        { "text": "- two" }
                    ]}
                }]
            }))
            .unwrap();
        assert_eq!(text, "- one\n- two");
    }

    #[test]
    fn test_parse_rejects_blocked_and_empty() {
        let blocked = client().parse_response(json!({
            "candidates": [],
            "promptFeedback": { "blockReason": "SAFETY" }
        }));
        assert!(matches!(blocked, Err(InsightError::Provider(msg)) if msg.contains("SAFETY")));
        let empty = client().parse_response(json!({ "candidates": [] }));
        assert!(matches!(empty, Err(InsightError::Provider(_))));
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = GeminiClient::new(" ", None, Duration::from_secs(1)).unwrap_err();
        assert_eq!(err.category(), "configuration");
    }
}
