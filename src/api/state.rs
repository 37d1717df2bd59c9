// src/api/state.rs
use crate::analysis::AnalysisClient;
use crate::config::AppConfig;
use crate::session::SessionController;
use reqwest::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub controller: Arc<SessionController>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let client = AnalysisClient::new(Client::new(), config.gemini.clone());
        Self {
            config: Arc::new(config),
            controller: SessionController::new(client),
        }
    }
}
