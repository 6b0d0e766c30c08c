pub mod api;
pub mod config;
pub mod dashboard;
pub mod store;

use config::Config;
use std::sync::Arc;

use crate::store::RecordStore;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn RecordStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn RecordStore>) -> Self {
        Self { config, store }
    }
}
