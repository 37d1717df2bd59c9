// src/providers/mod.rs

use crate::errors::Result;
use crate::models::ImagePayload;

pub mod gemini;

/// The seam between the analysis client and a multimodal model backend.
///
/// Note: implementers handle async directly rather than via async_trait.
pub trait VisionProvider: Send + Sync {
    /// Sends one image plus instruction text to the model and returns the
    /// raw response text and the round-trip latency in milliseconds.
    ///
    /// # Arguments
    /// * `image` - The encoded image payload to analyze.
    /// * `instruction` - The per-request user instruction.
    /// * `system_prompt` - The contract constraining the output shape.
    fn describe_image(
        &self,
        image: &ImagePayload,
        instruction: &str,
        system_prompt: &str,
    ) -> impl std::future::Future<Output = Result<(String, u64)>> + Send;
}
