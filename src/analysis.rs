// src/analysis.rs
//
// The analysis client: one round trip to the model per invocation, with
// every failure path settling into AnalysisOutcome::Failure. Nothing in
// here panics or propagates an error past `analyze`.

use regex::Regex;
use reqwest::Client;
use std::sync::OnceLock;

use crate::config::GeminiConfig;
use crate::errors::{self, AnalysisError};
use crate::models::{AnalysisOutcome, AnalysisRecord, ImagePayload, RepairAssessment};
use crate::prompt;
use crate::providers::gemini::GeminiProvider;
use crate::providers::VisionProvider;

/// How much of an unparseable response to quote back in the error message.
const RAW_EXCERPT_CHARS: usize = 100;

/// Issues analysis requests against the configured provider. Constructed
/// from injected configuration so tests can supply their own credentials
/// and endpoints.
pub struct AnalysisClient {
    client: Client,
    config: Option<GeminiConfig>,
}

impl AnalysisClient {
    pub fn new(client: Client, config: Option<GeminiConfig>) -> Self {
        Self { client, config }
    }

    pub fn credential_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Analyzes one image. Always settles: transport faults, service
    /// errors, and malformed responses all come back as the Failure case.
    pub async fn analyze(&self, image: &ImagePayload) -> AnalysisRecord {
        // Precondition: no credential means no network activity at all.
        let Some(config) = &self.config else {
            log::warn!("analysis requested without a configured credential");
            return AnalysisRecord::new(
                AnalysisOutcome::failure(classify_failure(&AnalysisError::MissingCredential)),
                0,
            );
        };

        let provider = GeminiProvider::new(self.client.clone(), config.clone());

        match provider
            .describe_image(image, prompt::USER_INSTRUCTION, prompt::SYSTEM_PROMPT)
            .await
        {
            Ok((raw_text, latency_ms)) => {
                AnalysisRecord::new(settle_response(&raw_text), latency_ms)
            }
            Err(e) => {
                eprintln!("❌ Gemini call failed: {}", e);
                AnalysisRecord::new(AnalysisOutcome::failure(classify_failure(&e)), 0)
            }
        }
    }
}

/// Turns the model's raw text into an outcome: unwrap an optional code
/// fence, then parse against the assessment schema. The NotFixable field
/// policy is deliberately NOT applied here; parsing stays separate from
/// display policy (models::RepairAssessment::for_display).
pub fn settle_response(raw_text: &str) -> AnalysisOutcome {
    let unwrapped = strip_code_fence(raw_text.trim());

    let format_failure = |parse_err: &dyn std::fmt::Display| {
        log::error!("failed to parse model response as JSON: {}", parse_err);
        let err = AnalysisError::Format { excerpt: truncate_chars(raw_text, RAW_EXCERPT_CHARS) };
        AnalysisOutcome::failure(err.to_string())
    };

    let value: serde_json::Value = match serde_json::from_str(unwrapped) {
        Ok(value) => value,
        Err(parse_err) => return format_failure(&parse_err),
    };

    // A well-formed object with an explicit null verdict means the service
    // declined to judge rather than failed.
    if value.get("isFixable").is_some_and(|v| v.is_null()) && value.get("error").is_none() {
        return AnalysisOutcome::Pending;
    }

    match serde_json::from_value::<RepairAssessment>(value) {
        Ok(assessment) => AnalysisOutcome::Judgment(assessment),
        Err(parse_err) => format_failure(&parse_err),
    }
}

/// Maps a transport or service-level error onto a user-facing message:
/// credential failures normalize to one fixed message, everything else is
/// wrapped under a generic prefix with the raw detail preserved.
pub fn classify_failure(error: &AnalysisError) -> String {
    let detail = error.to_string();
    if matches!(error, AnalysisError::MissingCredential) || errors::is_credential_error(&detail) {
        prompt::CREDENTIAL_ERROR_MESSAGE.to_string()
    } else {
        format!("Failed to get analysis from the model. {}", detail)
    }
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        // Matches text fully enclosed in ``` or ```json fences.
        Regex::new(r"(?s)^```(?:json)?\s*\n?(.*?)\n?\s*```$").unwrap()
    })
}

/// Unwraps a markdown code fence spanning the whole string, for services
/// that ignore the "no markdown" instruction. Partial fences are left alone.
pub fn strip_code_fence(text: &str) -> &str {
    match fence_regex().captures(text) {
        Some(caps) => caps.get(1).map_or(text, |m| m.as_str().trim()),
        None => text,
    }
}

/// First `limit` characters of `text`, respecting char boundaries.
fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Fixability;

    #[test]
    fn test_fenced_json_parses_like_unwrapped() {
        let plain = r#"{"isFixable": true, "confidenceScore": "High"}"#;
        let fenced = format!("```json\n{}\n```", plain);
        let bare_fence = format!("```\n{}\n```", plain);

        for text in [plain.to_string(), fenced, bare_fence] {
            match settle_response(&text) {
                AnalysisOutcome::Judgment(a) => {
                    assert_eq!(a.is_fixable, Fixability::Fixable);
                    assert_eq!(a.confidence_score.as_deref(), Some("High"));
                }
                other => panic!("expected Judgment, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_fence_must_span_whole_string() {
        let text = "preamble ```json\n{}\n```";
        assert_eq!(strip_code_fence(text), text);
    }

    #[test]
    fn test_unparseable_text_reports_truncated_excerpt() {
        let refusal = "Sorry, I can't help.".repeat(20);
        let outcome = settle_response(&refusal);
        let error = outcome.error_text().expect("should be a Failure");
        let excerpt: String = refusal.chars().take(100).collect();
        assert!(error.contains(&excerpt));
        assert!(!error.contains(&refusal));
    }

    #[test]
    fn test_excerpt_respects_multibyte_boundaries() {
        let text = "₹".repeat(120);
        let outcome = settle_response(&text);
        let error = outcome.error_text().unwrap();
        assert!(error.contains(&"₹".repeat(100)));
    }

    #[test]
    fn test_maybe_verdict_parses() {
        let text = r#"{"isFixable": "maybe", "fixabilityReason": "Image is blurry."}"#;
        match settle_response(text) {
            AnalysisOutcome::Judgment(a) => {
                assert_eq!(a.is_fixable, Fixability::Maybe);
                assert_eq!(a.fixability_reason.as_deref(), Some("Image is blurry."));
            }
            other => panic!("expected Judgment, got {:?}", other),
        }
    }

    #[test]
    fn test_null_fields_accepted_when_not_fixable() {
        let text = r#"{"isFixable": false, "fixabilityReason": "Shattered beyond repair.",
                       "repairMethods": null, "estimatedCost": null, "confidenceScore": "High"}"#;
        match settle_response(text) {
            AnalysisOutcome::Judgment(a) => {
                assert_eq!(a.is_fixable, Fixability::NotFixable);
                assert!(a.repair_methods.is_none());
                assert!(a.estimated_cost.is_none());
            }
            other => panic!("expected Judgment, got {:?}", other),
        }
    }

    #[test]
    fn test_null_verdict_settles_as_pending() {
        let text = r#"{"isFixable": null}"#;
        assert!(matches!(settle_response(text), AnalysisOutcome::Pending));
    }

    #[test]
    fn test_classify_credential_failure_normalizes_message() {
        let err = AnalysisError::ApiError {
            status: 400,
            body: "API key not valid. Please pass a valid API key.".to_string(),
        };
        assert_eq!(classify_failure(&err), prompt::CREDENTIAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_classify_missing_credential_normalizes_message() {
        assert_eq!(
            classify_failure(&AnalysisError::MissingCredential),
            prompt::CREDENTIAL_ERROR_MESSAGE
        );
    }

    #[test]
    fn test_classify_generic_failure_keeps_detail() {
        let err = AnalysisError::ApiError { status: 503, body: "model overloaded".to_string() };
        let message = classify_failure(&err);
        assert!(message.starts_with("Failed to get analysis from the model."));
        assert!(message.contains("model overloaded"));
    }

    #[tokio::test]
    async fn test_missing_credential_settles_without_network() {
        let client = AnalysisClient::new(Client::new(), None);
        let image = crate::encoder::encode_bytes("image/png", b"fakepng").unwrap();
        let record = client.analyze(&image).await;
        assert_eq!(record.outcome.error_text(), Some(prompt::CREDENTIAL_ERROR_MESSAGE));
    }
}
