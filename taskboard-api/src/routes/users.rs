/// User endpoints
///
/// Registration is the one unauthenticated write in the API: it validates the
/// registration schema, hashes the password, and persists the user. Every
/// other operation here sits behind the bearer layer.
///
/// # Endpoints
///
/// - `POST /users/register/` - Register a new user (no auth)
/// - `GET /users/` - List all users
/// - `GET /users/{id}/` - Retrieve a user
/// - `PUT/PATCH /users/{id}/` - Partially update a user
/// - `DELETE /users/{id}/` - Delete a user

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    schema::user::{self as user_schema, UserBody},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use taskboard_shared::{
    auth::password,
    models::user::{CreateUser, User},
};

/// Registers a new user
///
/// The plaintext password is hashed before persistence and appears in no
/// response representation.
///
/// # Errors
///
/// - `400 Bad Request`: validation failure, including a taken username
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<UserBody>)> {
    let data = user_schema::parse_register(&body).map_err(ApiError::Validation)?;

    let password_hash = password::hash_password(&data.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: data.username,
            email: data.email,
            password_hash,
            first_name: data.first_name,
            last_name: data.last_name,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Lists all users
///
/// Unpaginated and unscoped: every account is visible to every
/// authenticated caller.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserBody>>> {
    let users = User::list(&state.db).await?;

    Ok(Json(users.into_iter().map(UserBody::from).collect()))
}

/// Retrieves a user by id
///
/// # Errors
///
/// - `404 Not Found`: no user with that id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserBody>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(user.into()))
}

/// Partially updates a user
///
/// An unknown id answers 404 before the body is validated.
///
/// # Errors
///
/// - `400 Bad Request`: validation failure
/// - `404 Not Found`: no user with that id
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> ApiResult<Json<UserBody>> {
    if User::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    let update = user_schema::parse_update(&body).map_err(ApiError::Validation)?;

    let user = User::update(&state.db, id, update)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(user.into()))
}

/// Deletes a user
///
/// Owned projects and authored comments cascade away; assigned tasks are
/// unassigned and kept.
///
/// # Errors
///
/// - `404 Not Found`: no user with that id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let deleted = User::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
