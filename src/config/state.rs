// Application state module
// Shared, read-only state handed to every connection

use std::sync::Arc;

use super::types::Config;
use crate::logger::Log;

/// Application state
pub struct AppState {
    pub config: Config,
    pub log: Arc<dyn Log>,
}

impl AppState {
    pub fn new(config: Config, log: Arc<dyn Log>) -> Self {
        Self { config, log }
    }
}
