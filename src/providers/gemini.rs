// src/providers/gemini.rs

use reqwest::Client;
use serde_json::json;
use std::time::Instant;

use crate::config::GeminiConfig;
use crate::errors::{AnalysisError, Result};
use crate::models::ImagePayload;
use crate::providers::VisionProvider;

/// A provider for interacting with Google's Gemini multimodal models.
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider`.
    pub fn new(client: Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }
}

impl VisionProvider for GeminiProvider {
    /// Calls `generateContent` with an inline image part and returns the
    /// model's response text and latency.
    async fn describe_image(
        &self,
        image: &ImagePayload,
        instruction: &str,
        system_prompt: &str,
    ) -> Result<(String, u64)> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        );

        println!("📡 Calling Gemini: {} with model: {}", url, self.config.model);

        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [
                    {"inline_data": {"mime_type": image.media_type, "data": image.encoded_data}},
                    {"text": instruction}
                ]
            }],
            "systemInstruction": {"parts": [{"text": system_prompt}]},
            "generationConfig": {"responseMimeType": "application/json"}
        });

        let start = Instant::now();

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let latency_ms = start.elapsed().as_millis() as u64;

        println!("📥 Gemini response status: {} ({}ms)", status, latency_ms);

        if !status.is_success() {
            let error_body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            return Err(AnalysisError::ApiError {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let response_json: serde_json::Value = resp.json().await?;

        if let Some(error) = response_json.get("error") {
            return Err(AnalysisError::ApiResponse(error.to_string()));
        }

        let output = response_json
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.get(0))
            .and_then(|p| p.get("text"))
            .and_then(|t| t.as_str())
            .ok_or_else(|| AnalysisError::UnexpectedResponse(response_json.to_string()))?;

        if output.is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }

        Ok((output.to_string(), latency_ms))
    }
}
