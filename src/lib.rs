// src/lib.rs
pub mod analysis;
pub mod api;
pub mod banner;
pub mod config;
pub mod encoder;
pub mod errors;
pub mod models;
pub mod prompt;
pub mod providers;
pub mod session;

/// JSON body ceiling for the upload endpoint: a 5 MiB image grows by ~4/3
/// under base64, plus envelope overhead.
pub const UPLOAD_BODY_LIMIT: usize = 8 * 1024 * 1024;
