// src/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Unsupported image type '{0}'. Accepted: JPEG, PNG, WEBP, GIF")]
    UnsupportedType(String),

    #[error("Image is {size} bytes, exceeding the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    #[error("Image data is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    #[error("Please select an image of the broken object first.")]
    NoImageStaged,

    #[error("No API credential configured")]
    MissingCredential,

    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("API returned an error: {0}")]
    ApiResponse(String),

    #[error("Unexpected response structure: {0}")]
    UnexpectedResponse(String),

    #[error("Received empty text response from model")]
    EmptyResponse,

    #[error("AI response was not in the expected JSON format. Raw: {excerpt}...")]
    Format { excerpt: String },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Markers the upstream service embeds in credential-related failures.
/// Matched case-insensitively against the full error display text.
const CREDENTIAL_ERROR_MARKERS: [&str; 5] = [
    "api key not valid",
    "permission denied",
    "api_key_invalid",
    "api key is invalid",
    "invalid api key",
];

/// Best-effort classifier for credential-related service errors.
pub fn is_credential_error(message: &str) -> bool {
    let lower = message.to_lowercase();
    CREDENTIAL_ERROR_MARKERS.iter().any(|m| lower.contains(m))
}

/// Coarser check used when deciding which error surface a settled failure
/// belongs on: the persistent credential banner or the transient message.
pub fn routes_to_credential_banner(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("api key") || lower.contains("permission denied")
}
