//! Shared application state handed to the HTTP handlers.

use std::sync::Arc;

use cephprom_core::Registry;

use crate::config::ExporterConfig;

#[derive(Clone)]
pub struct AppState {
    registry: Arc<Registry>,
    cfg: Arc<ExporterConfig>,
}

impl AppState {
    pub fn new(registry: Arc<Registry>, cfg: ExporterConfig) -> Self {
        Self {
            registry,
            cfg: Arc::new(cfg),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn cfg(&self) -> &ExporterConfig {
        &self.cfg
    }
}
