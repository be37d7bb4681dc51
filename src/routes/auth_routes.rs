//! Auth routes
//!
//! Single admin login. The credential is environment-supplied (username +
//! bcrypt hash) so it can be rotated without touching the code.

use axum::{extract::State, routing::post, Json, Router};

use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};

pub fn create_auth_router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let config = &state.config;

    let invalid =
        || AppError::Unauthorized("User not found or invalid password".to_string());

    if payload.username != config.admin_username {
        return Err(invalid());
    }

    let valid = bcrypt::verify(&payload.password, &config.admin_password_hash)
        .map_err(|e| AppError::Internal(format!("Error verifying password: {}", e)))?;

    if !valid {
        return Err(invalid());
    }

    let token = generate_token(&config.admin_username, &JwtConfig::from(config))?;

    Ok(Json(LoginResponse::new(
        token,
        config.admin_username.clone(),
    )))
}
