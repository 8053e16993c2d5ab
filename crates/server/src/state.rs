use std::sync::Arc;
use mediacat_core::{Config, MediaCatalog};

/// Shared application state
pub struct AppState {
    config: Config,
    catalog: Arc<dyn MediaCatalog>,
}

impl AppState {
    pub fn new(config: Config, catalog: Arc<dyn MediaCatalog>) -> Self {
        Self { config, catalog }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &dyn MediaCatalog {
        self.catalog.as_ref()
    }
}
