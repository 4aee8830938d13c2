use service::services::Services;

use crate::errors::StatusPolicy;

/// HTTP-layer settings taken from `[api]`.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub status_policy: StatusPolicy,
    pub expose_debug_endpoint: bool,
    pub debug_check_email: String,
}

impl Default for ApiSettings {
    fn default() -> Self { Self::from_config(&configs::ApiConfig::default()) }
}

impl ApiSettings {
    pub fn from_config(cfg: &configs::ApiConfig) -> Self {
        Self {
            status_policy: StatusPolicy::from_config(cfg.distinct_status_codes),
            expose_debug_endpoint: cfg.expose_debug_endpoint,
            debug_check_email: cfg.debug_check_email.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub api: ApiSettings,
}

impl AppState {
    pub fn new(services: Services, api: ApiSettings) -> Self { Self { services, api } }
}
