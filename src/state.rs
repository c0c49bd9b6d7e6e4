use crate::config::Config;
use crate::service::FinanceService;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: FinanceService,
    pub config: Arc<Config>,
}

impl AppState {
    /// Phone to use when a dashboard request names none
    pub fn phone_or_default(&self, phone: Option<String>) -> String {
        phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| self.config.default_phone.clone())
    }
}
