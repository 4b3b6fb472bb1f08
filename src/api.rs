//! HTTP webhook surface
//!
//! One POST endpoint receiving LINE webhook deliveries, plus the
//! endpoint-verification GET and a version probe.

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::line::LineClient;
use crate::runtime::{DatabaseStore, EventProcessor, ProductionProcessor};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<ProductionProcessor>,
}

impl AppState {
    pub fn new(store: DatabaseStore, client: LineClient) -> Self {
        Self {
            processor: Arc::new(EventProcessor::new(store, client)),
        }
    }
}
