use axum::{extract::State, Json};

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::domain::detection::Detection;

/// List detections, newest first
///
/// GET /api/detections
pub async fn list_detections(
    State(state): State<AppState>,
) -> Result<Json<Vec<Detection>>, ApiError> {
    Ok(Json(state.console.detections().await?))
}
