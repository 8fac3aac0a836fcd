/// Comment endpoints
///
/// Mirrors the task pattern with `task_id` as both the list filter and the
/// creation scoping id. The comment author is the body `user`, not the
/// bearer identity.
///
/// # Endpoints
///
/// - `GET /comments/?task_id=N` - List comments, optionally filtered
/// - `GET /comments/{id}/` - Retrieve a comment
/// - `POST /comments/` - Create a comment
/// - `POST /tasks/{task_id}/comments/` - Create a comment on a task
/// - `PUT/PATCH /comments/{id}/` - Partially update a comment
/// - `DELETE /comments/{id}/` - Delete a comment

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    schema::comment::{self as comment_schema, CommentBody},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use taskboard_shared::models::{comment::Comment, task::Task};

/// Query parameters accepted by the comment list
#[derive(Debug, Deserialize)]
pub struct CommentListQuery {
    /// Restrict the listing to one task
    pub task_id: Option<i64>,
}

/// Lists comments, optionally filtered by task
pub async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<CommentListQuery>,
) -> ApiResult<Json<Vec<CommentBody>>> {
    let comments = Comment::list(&state.db, query.task_id).await?;

    Ok(Json(comments.into_iter().map(CommentBody::from).collect()))
}

/// Retrieves a comment by id
///
/// # Errors
///
/// - `404 Not Found`: no comment with that id
pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<CommentBody>> {
    let comment = Comment::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(comment.into()))
}

/// Creates a comment
///
/// # Errors
///
/// - `400 Bad Request`: validation failure or dangling reference
pub async fn create_comment(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<CommentBody>)> {
    create_comment_inner(state, None, body).await
}

/// Creates a comment scoped to a task path id
///
/// # Errors
///
/// - `400 Bad Request`: validation failure
/// - `404 Not Found`: `{"error": "Task does not exist."}` when the scoping
///   task is absent
pub async fn create_task_comment(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<CommentBody>)> {
    create_comment_inner(state, Some(task_id), body).await
}

async fn create_comment_inner(
    state: AppState,
    scope: Option<i64>,
    body: Value,
) -> ApiResult<(StatusCode, Json<CommentBody>)> {
    let mut data = comment_schema::parse_create(&body).map_err(ApiError::Validation)?;

    if let Some(task_id) = scope {
        if !Task::exists(&state.db, task_id).await? {
            return Err(ApiError::NotFoundMessage("Task does not exist.".to_string()));
        }
        // Path scoping overrides any body-supplied task
        data.task_id = task_id;
    }

    let comment = Comment::create(&state.db, data).await?;

    Ok((StatusCode::CREATED, Json(comment.into())))
}

/// Partially updates a comment
///
/// # Errors
///
/// - `400 Bad Request`: validation failure
/// - `404 Not Found`: no comment with that id
pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> ApiResult<Json<CommentBody>> {
    if Comment::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    let update = comment_schema::parse_update(&body).map_err(ApiError::Validation)?;

    let comment = Comment::update(&state.db, id, update)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(comment.into()))
}

/// Deletes a comment
///
/// # Errors
///
/// - `404 Not Found`: no comment with that id
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let deleted = Comment::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
