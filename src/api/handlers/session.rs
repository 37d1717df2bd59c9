// src/api/handlers/session.rs
use actix_web::{web, HttpResponse, Result};
use serde::Deserialize;
use serde_json::json;

use crate::api::AppState;
use crate::encoder;
use crate::errors::AnalysisError;
use crate::session::TriggerOutcome;

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageImageRequest {
    pub media_type: String,
    /// Base64 image data, with or without a data-URI header.
    pub data: String,
}

pub async fn get_session(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.controller.snapshot()))
}

/// Stages an uploaded image. The page already filters type and size, but
/// both checks are re-enforced here; the client-side check is a courtesy,
/// this one holds.
pub async fn stage_image(
    state: web::Data<AppState>,
    req: web::Json<StageImageRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();

    let staged = encoder::decode_payload(&req.data)
        .and_then(|bytes| encoder::encode_bytes(&req.media_type, &bytes));

    match staged {
        Ok(payload) => {
            log::info!("staged {} image ({} bytes)", payload.media_type, payload.source_size);
            state.controller.stage(payload);
            Ok(HttpResponse::Ok().json(state.controller.snapshot()))
        }
        Err(e @ (AnalysisError::UnsupportedType(_)
        | AnalysisError::TooLarge { .. }
        | AnalysisError::InvalidEncoding(_))) => {
            Ok(HttpResponse::BadRequest().json(json!({ "error": e.to_string() })))
        }
        Err(e) => Ok(HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))),
    }
}

pub async fn clear_image(state: web::Data<AppState>) -> Result<HttpResponse> {
    state.controller.clear();
    Ok(HttpResponse::Ok().json(state.controller.snapshot()))
}

/// Triggers one analysis. The trigger is synchronous from the page's point
/// of view: the response carries the settled snapshot.
pub async fn run_analysis(state: web::Data<AppState>) -> Result<HttpResponse> {
    let outcome = state.controller.run_analysis().await;
    let snapshot = state.controller.snapshot();

    let response = match outcome {
        TriggerOutcome::Completed => HttpResponse::Ok().json(snapshot),
        TriggerOutcome::Busy => HttpResponse::Conflict().json(json!({
            "error": "An analysis is already in progress"
        })),
        TriggerOutcome::NoImage | TriggerOutcome::NoCredential => {
            HttpResponse::BadRequest().json(snapshot)
        }
    };
    Ok(response)
}
