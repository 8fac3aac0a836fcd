/// Project endpoints
///
/// Create assigns ownership to the authenticated caller; a body-supplied
/// `owner` is ignored. Update and destroy deliberately perform no ownership
/// or role check: any authenticated user may mutate any project. The stored
/// member roles are not consulted.
///
/// # Endpoints
///
/// - `GET /projects/` - List all projects
/// - `GET /projects/{id}/` - Retrieve a project
/// - `POST /projects/` - Create a project owned by the caller
/// - `PUT/PATCH /projects/{id}/` - Partially update a project
/// - `DELETE /projects/{id}/` - Delete a project

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    schema::project::{self as project_schema, ProjectBody},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::Value;
use taskboard_shared::{
    auth::middleware::AuthContext,
    models::project::{CreateProject, Project},
};

/// Lists all projects
pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<Vec<ProjectBody>>> {
    let projects = Project::list(&state.db).await?;

    Ok(Json(projects.into_iter().map(ProjectBody::from).collect()))
}

/// Retrieves a project by id
///
/// # Errors
///
/// - `404 Not Found`: no project with that id
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProjectBody>> {
    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(project.into()))
}

/// Creates a project owned by the caller
///
/// # Errors
///
/// - `400 Bad Request`: validation failure
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<ProjectBody>)> {
    let data = project_schema::parse_create(&body).map_err(ApiError::Validation)?;

    let project = Project::create(
        &state.db,
        CreateProject {
            name: data.name,
            description: data.description,
            owner_id: auth.user_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(project.into())))
}

/// Partially updates a project
///
/// No ownership check: the caller does not have to be the owner or a member.
///
/// # Errors
///
/// - `400 Bad Request`: validation failure
/// - `404 Not Found`: no project with that id
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> ApiResult<Json<ProjectBody>> {
    if Project::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    let update = project_schema::parse_update(&body).map_err(ApiError::Validation)?;

    let project = Project::update(&state.db, id, update)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(project.into()))
}

/// Deletes a project
///
/// Member rows and tasks cascade away, and comments follow the tasks.
///
/// # Errors
///
/// - `404 Not Found`: no project with that id
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let deleted = Project::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
