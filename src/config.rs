// src/config.rs
use crate::prompt;

/// Configuration for the Gemini provider. Holding a value here means a
/// credential was present at startup.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
}

/// High-level application configuration loaded from environment variables.
/// The credential is read exactly once, at startup; its absence is a
/// persistent user-visible condition, never a startup failure.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini: Option<GeminiConfig>,
    pub bind_addr: (String, u16),
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let gemini = std::env::var("GEMINI_API_KEY").ok().map(|api_key| {
            let api_base = std::env::var("GEMINI_API_BASE")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string());
            let model = std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| prompt::GEMINI_MODEL_NAME.to_string());
            GeminiConfig { api_base, api_key, model }
        });

        let host = std::env::var("FIXSIGHT_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("FIXSIGHT_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        AppConfig { gemini, bind_addr: (host, port) }
    }

    pub fn credential_configured(&self) -> bool {
        self.gemini.is_some()
    }
}
