use std::time::Instant;

use axum::extract::State;
use axum::Json;

use crate::auth::jwt;
use crate::auth::middleware::AuthUser;
use crate::dto::{LoginRequest, LoginResponse};
use crate::error::AppError;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if !state.config.has_auth() {
        // Dev mode: no users configured, issue a token for "anonymous"
        let (token, expires_at) = jwt::create_token(
            &state.config.auth.jwt_secret,
            state.config.auth.jwt_ttl_hours,
            "anonymous",
        )?;
        return Ok(Json(LoginResponse { token, expires_at }));
    }

    let user_config = state
        .config
        .find_user(&body.username)
        .ok_or_else(|| AppError::Auth("Invalid credentials".to_string()))?
        .clone();

    let password = body.password.clone();
    let hash = user_config.password_hash.clone();

    let valid = tokio::task::spawn_blocking(move || {
        crate::auth::password::verify_password(&hash, &password)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    if !valid {
        tracing::warn!("Failed login attempt for user: {}", body.username);
        return Err(AppError::Auth("Invalid credentials".to_string()));
    }

    tracing::info!("User logged in: {}", body.username);

    let (token, expires_at) = jwt::create_token(
        &state.config.auth.jwt_secret,
        state.config.auth.jwt_ttl_hours,
        &body.username,
    )?;

    Ok(Json(LoginResponse { token, expires_at }))
}

pub async fn logout(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !user.jti.is_empty() {
        state.revoked_tokens.insert(user.jti, Instant::now());
    }
    tracing::info!("User logged out: {}", user.sub);
    Ok(Json(serde_json::json!({ "success": true })))
}
