use std::sync::Arc;

use super::security_config::SecurityConfig;
use crate::services::live_scoring::LiveScoringService;

/// Shared resources handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub security: SecurityConfig,
    pub scoring: Arc<LiveScoringService>,
}

impl AppState {
    pub fn new(security: SecurityConfig, scoring: Arc<LiveScoringService>) -> Self {
        Self { security, scoring }
    }
}
