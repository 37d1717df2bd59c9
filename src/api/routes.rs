// src/api/routes.rs
use actix_web::web;
use super::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(handlers::health_check))
            .route("/config", web::get().to(handlers::get_config))
            .service(
                web::scope("/session")
                    .route("", web::get().to(handlers::get_session))
                    .route("/image", web::post().to(handlers::stage_image))
                    .route("/image", web::delete().to(handlers::clear_image))
                    .route("/analyze", web::post().to(handlers::run_analysis))
            )
    );
}
