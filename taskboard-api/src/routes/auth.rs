/// Token endpoints
///
/// Credentials go in, opaque bearer tokens come out. Everything else in the
/// API only ever sees the resulting access token.
///
/// # Endpoints
///
/// - `POST /auth/token/` - Exchange username/password for a token pair
/// - `POST /auth/token/refresh/` - Exchange a refresh token for a new access token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::{jwt, password},
    models::user::User,
};

/// Token obtain request
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    /// Login name
    pub username: String,

    /// Plaintext password, verified against the stored Argon2id hash
    pub password: String,
}

/// Token obtain response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Refresh token (30d)
    pub refresh: String,

    /// Access token (24h)
    pub access: String,
}

/// Token refresh request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh: String,
}

/// Token refresh response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access: String,
}

/// Obtains a token pair for a username/password
///
/// # Errors
///
/// - `401 Unauthorized`: unknown username, wrong password, or inactive account
pub async fn obtain_token(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let invalid =
        || ApiError::Unauthorized("No active account found with the given credentials".to_string());

    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(invalid)?;

    if !user.is_active {
        return Err(invalid());
    }

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(invalid());
    }

    let access_claims = jwt::Claims::new(user.id, jwt::TokenType::Access);
    let refresh_claims = jwt::Claims::new(user.id, jwt::TokenType::Refresh);

    let access = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    Ok(Json(TokenResponse { refresh, access }))
}

/// Exchanges a refresh token for a new access token
///
/// # Errors
///
/// - `401 Unauthorized`: invalid or expired refresh token
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access = jwt::refresh_access_token(&req.refresh, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access }))
}
