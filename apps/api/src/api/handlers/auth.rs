use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::auth::jwt::create_token;
use crate::auth::password::verify_password;
use crate::domain::operator::Email;

/// Request body for operator login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response from successful login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub operator_id: Uuid,
    pub full_name: String,
}

/// Login with email and password
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = Email::new(&req.email)
        .map_err(|e| ApiError::bad_request(format!("Invalid email: {}", e)))?;

    let operator = state
        .operators
        .find_by_email(&email)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Operator lookup failed: {}", e)))?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !operator.is_active {
        return Err(ApiError::unauthorized("Account is disabled"));
    }

    let valid = verify_password(&req.password, &operator.password_hash).map_err(|e| {
        ApiError::internal_server_error(format!("Password verification failed: {}", e))
    })?;
    if !valid {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = create_token(operator.id, &state.jwt_secret)
        .map_err(|e| ApiError::internal_server_error(format!("Failed to create token: {}", e)))?;

    info!(operator_id = %operator.id, "Operator logged in");
    Ok(Json(LoginResponse {
        token,
        operator_id: operator.id,
        full_name: operator.full_name,
    }))
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
