// src/encoder.rs
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::errors::{AnalysisError, Result};
use crate::models::ImagePayload;

/// Hard ceiling on source image size: 5 MiB.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// The four media types the analysis pipeline accepts.
pub const ACCEPTED_MEDIA_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/webp", "image/gif"];

pub fn is_accepted_media_type(media_type: &str) -> bool {
    ACCEPTED_MEDIA_TYPES.contains(&media_type)
}

/// Validates and encodes raw image bytes into a transport-ready payload.
/// Media type is checked before size, so an oversized file of an unsupported
/// type reports the type problem.
pub fn encode_bytes(media_type: &str, bytes: &[u8]) -> Result<ImagePayload> {
    if !is_accepted_media_type(media_type) {
        return Err(AnalysisError::UnsupportedType(media_type.to_string()));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(AnalysisError::TooLarge { size: bytes.len(), limit: MAX_IMAGE_BYTES });
    }

    Ok(ImagePayload {
        encoded_data: BASE64.encode(bytes),
        media_type: media_type.to_string(),
        source_size: bytes.len(),
    })
}

/// Reads an image from disk and encodes it. The media type is guessed from
/// the file extension. Resolves exactly once: a read failure surfaces as
/// `FileRead`, never a hang.
pub async fn encode_file(path: &Path) -> Result<ImagePayload> {
    let media_type = mime_guess::from_path(path).first_or_octet_stream();
    let bytes = tokio::fs::read(path).await?;
    encode_bytes(media_type.as_ref(), &bytes)
}

/// Keeps only the base64 payload of a browser-produced data URI, i.e.
/// everything after the first comma. Text without a `data:` prefix passes
/// through untouched.
pub fn strip_data_uri(data: &str) -> &str {
    if data.starts_with("data:") {
        match data.split_once(',') {
            Some((_, payload)) => payload,
            None => data,
        }
    } else {
        data
    }
}

/// Decodes a staged payload back to raw bytes. Used by the stage endpoint to
/// establish the true source size before re-validating.
pub fn decode_payload(data: &str) -> Result<Vec<u8>> {
    Ok(BASE64.decode(strip_data_uri(data).trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unsupported_media_type() {
        let err = encode_bytes("image/tiff", b"....").unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedType(t) if t == "image/tiff"));

        let err = encode_bytes("application/pdf", b"%PDF").unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedType(_)));
    }

    #[test]
    fn test_rejects_oversized_input() {
        let big = vec![0u8; MAX_IMAGE_BYTES + 1];
        let err = encode_bytes("image/png", &big).unwrap_err();
        assert!(matches!(err, AnalysisError::TooLarge { size, limit }
            if size == MAX_IMAGE_BYTES + 1 && limit == 5_242_880));
    }

    #[test]
    fn test_accepts_exactly_at_limit() {
        let at_limit = vec![0u8; MAX_IMAGE_BYTES];
        let payload = encode_bytes("image/jpeg", &at_limit).unwrap();
        assert_eq!(payload.source_size, MAX_IMAGE_BYTES);
    }

    #[test]
    fn test_round_trip_reproduces_source_bytes() {
        let bytes: Vec<u8> = (0u8..=255).cycle().take(1037).collect();
        let payload = encode_bytes("image/webp", &bytes).unwrap();
        assert_eq!(payload.media_type, "image/webp");
        assert_eq!(decode_payload(&payload.encoded_data).unwrap(), bytes);
    }

    #[test]
    fn test_strip_data_uri() {
        assert_eq!(strip_data_uri("data:image/png;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_uri("AAAA"), "AAAA");
        assert_eq!(strip_data_uri("data:image/png;base64"), "data:image/png;base64");
    }

    #[tokio::test]
    async fn test_encode_file_missing_path_resolves_as_error() {
        let err = encode_file(Path::new("/nonexistent/broken-mug.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::FileRead(_)));
    }
}
