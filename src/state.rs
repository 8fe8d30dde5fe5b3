//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::LinkService;
use crate::domain::repositories::LinkStore;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkStore>>,
    /// Public base for short URLs; `None` derives it from request headers.
    pub base_url: Option<String>,
}

impl AppState {
    pub fn new(link_service: Arc<LinkService<dyn LinkStore>>, base_url: Option<String>) -> Self {
        Self {
            link_service,
            base_url,
        }
    }
}
