//! HTTP API for submitting voice clips and reading history
//!
//! - POST /analyze?filename=<name> - Analyze the audio bytes in the request body
//! - GET /history - Stored wellness records, oldest first
//! - GET /history/trend - Average and direction over recent records
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::ErrorResponse;
pub use routes::{create_router, MAX_UPLOAD_BYTES};
pub use state::AppState;
