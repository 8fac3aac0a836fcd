/// Task endpoints
///
/// Listing takes an optional `project_id` query filter. Creation exists in
/// two forms: plain, and scoped under a project path id. The scoped form
/// validates the body first (validation failures win), then answers
/// `404 {"error": "Project does not exist."}` when the scoping project is
/// absent, and otherwise overrides the body's `project` with the path id.
///
/// # Endpoints
///
/// - `GET /tasks/?project_id=N` - List tasks, optionally filtered
/// - `GET /tasks/{id}/` - Retrieve a task
/// - `POST /tasks/` - Create a task
/// - `POST /projects/{project_id}/tasks/` - Create a task in a project
/// - `PUT/PATCH /tasks/{id}/` - Partially update a task
/// - `DELETE /tasks/{id}/` - Delete a task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    schema::task::{self as task_schema, TaskBody},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use taskboard_shared::models::{project::Project, task::Task};

/// Query parameters accepted by the task list
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    /// Restrict the listing to one project
    pub project_id: Option<i64>,
}

/// Lists tasks, optionally filtered by project
///
/// An unknown `project_id` is not an error; the listing is simply empty.
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<Vec<TaskBody>>> {
    let tasks = Task::list(&state.db, query.project_id).await?;

    Ok(Json(tasks.into_iter().map(TaskBody::from).collect()))
}

/// Retrieves a task by id
///
/// # Errors
///
/// - `404 Not Found`: no task with that id
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TaskBody>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(task.into()))
}

/// Creates a task
///
/// # Errors
///
/// - `400 Bad Request`: validation failure or dangling reference
pub async fn create_task(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<TaskBody>)> {
    create_task_inner(state, None, body).await
}

/// Creates a task scoped to a project path id
///
/// # Errors
///
/// - `400 Bad Request`: validation failure
/// - `404 Not Found`: `{"error": "Project does not exist."}` when the
///   scoping project is absent
pub async fn create_project_task(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<TaskBody>)> {
    create_task_inner(state, Some(project_id), body).await
}

async fn create_task_inner(
    state: AppState,
    scope: Option<i64>,
    body: Value,
) -> ApiResult<(StatusCode, Json<TaskBody>)> {
    let mut data = task_schema::parse_create(&body).map_err(ApiError::Validation)?;

    if let Some(project_id) = scope {
        if !Project::exists(&state.db, project_id).await? {
            return Err(ApiError::NotFoundMessage("Project does not exist.".to_string()));
        }
        // Path scoping overrides any body-supplied project
        data.project_id = project_id;
    }

    let task = Task::create(&state.db, data).await?;

    Ok((StatusCode::CREATED, Json(task.into())))
}

/// Partially updates a task
///
/// # Errors
///
/// - `400 Bad Request`: validation failure
/// - `404 Not Found`: no task with that id
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> ApiResult<Json<TaskBody>> {
    if Task::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    let update = task_schema::parse_update(&body).map_err(ApiError::Validation)?;

    let task = Task::update(&state.db, id, update)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(task.into()))
}

/// Deletes a task
///
/// Comments on the task cascade away.
///
/// # Errors
///
/// - `404 Not Found`: no task with that id
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let deleted = Task::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
