use super::state::AppState;
use crate::pipeline::AnalysisReport;
use crate::wellness::{TrendReport, WellnessRecord};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AnalyzeParams {
    /// Original filename, used as a format hint by the decoder
    pub filename: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: String) -> axum::response::Response {
    (status, Json(ErrorResponse { error })).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /analyze
/// Analyze an uploaded voice clip and append the result to history
pub async fn analyze(
    State(state): State<AppState>,
    Query(params): Query<AnalyzeParams>,
    body: Bytes,
) -> impl IntoResponse {
    if body.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "No audio uploaded in request body.".to_string(),
        );
    }

    info!(
        "Analyzing upload: {} bytes, filename {:?}",
        body.len(),
        params.filename
    );

    // Decoding may shell out to ffmpeg; keep it off the async workers
    let pipeline = state.pipeline.clone();
    let result = tokio::task::spawn_blocking(move || {
        pipeline.analyze_bytes(&body, params.filename.as_deref())
    })
    .await;

    match result {
        Ok(Ok(report)) => {
            info!(
                "Analysis complete: index {:.2} ({})",
                report.wellness.wellness_index, report.wellness.category
            );
            (StatusCode::OK, Json::<AnalysisReport>(report)).into_response()
        }
        Ok(Err(e)) if e.is_input_error() => {
            warn!("Rejected upload: {}", e);
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Ok(Err(e)) => {
            error!("Analysis failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        Err(e) => {
            error!("Analysis task failed: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Analysis task failed: {}", e),
            )
        }
    }
}

/// GET /history
/// Stored wellness records, oldest first
pub async fn get_history(State(state): State<AppState>) -> impl IntoResponse {
    let records: Vec<WellnessRecord> = state.pipeline.history();
    (StatusCode::OK, Json(records))
}

/// GET /history/trend
/// Average index and direction over the most recent records
pub async fn get_trend(State(state): State<AppState>) -> impl IntoResponse {
    let trend: TrendReport = state.pipeline.trend();
    (StatusCode::OK, Json(trend))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
