use axum::{extract::State, Json};

use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::api::state::AppState;
use crate::domain::preferences::LayoutPreferences;

/// Get the operator's console layout, falling back to the default layout
///
/// GET /api/preferences
pub async fn get_preferences(
    State(state): State<AppState>,
    JwtAuth(operator_id): JwtAuth,
) -> Result<Json<LayoutPreferences>, ApiError> {
    let preferences = state
        .preferences
        .get(operator_id)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Failed to load preferences: {}", e)))?
        .unwrap_or_default();

    Ok(Json(preferences))
}

/// Replace the operator's console layout
///
/// PUT /api/preferences
pub async fn put_preferences(
    State(state): State<AppState>,
    JwtAuth(operator_id): JwtAuth,
    Json(preferences): Json<LayoutPreferences>,
) -> Result<Json<LayoutPreferences>, ApiError> {
    preferences.validate().map_err(ApiError::bad_request)?;

    state
        .preferences
        .put(operator_id, preferences.clone())
        .await
        .map_err(|e| {
            ApiError::internal_server_error(format!("Failed to save preferences: {}", e))
        })?;

    Ok(Json(preferences))
}
