// src/api/handlers/mod.rs
mod health;
mod config;
mod session;

pub use health::health_check;
pub use config::get_config;
pub use session::{clear_image, get_session, run_analysis, stage_image, StageImageRequest};
