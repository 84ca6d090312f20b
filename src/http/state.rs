use crate::pipeline::WellnessPipeline;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Analysis pipeline (owns the history store)
    pub pipeline: Arc<WellnessPipeline>,
}

impl AppState {
    pub fn new(pipeline: WellnessPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}
