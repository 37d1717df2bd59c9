// src/api/handlers/config.rs
use actix_web::{web, HttpResponse, Result};
use serde_json::json;

use crate::api::AppState;
use crate::encoder;

/// Reports credential availability and the limits the page enforces
/// client-side. Never exposes the key itself.
pub async fn get_config(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "credentialConfigured": state.config.credential_configured(),
        "model": state.config.gemini.as_ref().map(|g| g.model.clone()),
        "acceptedMediaTypes": encoder::ACCEPTED_MEDIA_TYPES,
        "maxImageBytes": encoder::MAX_IMAGE_BYTES
    })))
}
