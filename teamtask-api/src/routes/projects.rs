/// Project endpoints
///
/// # Endpoints
///
/// - `POST   /v1/projects` - Create a project
/// - `GET    /v1/projects` - List the caller's projects
/// - `GET    /v1/projects/:id` - Get a project (creator only)
/// - `PUT    /v1/projects/:id` - Update a project (creator only)
/// - `DELETE /v1/projects/:id` - Delete a project (creator only)
///
/// A project created by someone else answers 404 on every operation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use teamtask_shared::authz::Actor;
use teamtask_shared::models::{Project, ProjectPatch};
use teamtask_shared::resources::projects::{ProjectInput, ProjectService};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::{validation_details, ApiResult},
};

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Optional description
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    /// Optional team association
    pub team_id: Option<Uuid>,
}

/// Update project request
///
/// Absent fields are left unchanged; `description` and `team_id`
/// accept an explicit `null` to clear.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,

    #[serde(default, deserialize_with = "super::double_option")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "super::double_option")]
    pub team_id: Option<Option<Uuid>>,
}

/// Create a project owned by the caller
pub async fn create_project(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    req.validate().map_err(validation_details)?;

    let service = ProjectService::new(state.store.as_ref());
    let project = service
        .create(
            &actor,
            ProjectInput {
                name: req.name,
                description: req.description,
                team_id: req.team_id,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// List the caller's projects
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<Project>>> {
    let service = ProjectService::new(state.store.as_ref());
    let projects = service.list(&actor).await?;
    Ok(Json(projects))
}

/// Get a single project
pub async fn get_project(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let service = ProjectService::new(state.store.as_ref());
    let project = service.get(&actor, id).await?;
    Ok(Json(project))
}

/// Update a project
pub async fn update_project(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    let service = ProjectService::new(state.store.as_ref());
    let project = service
        .update(
            &actor,
            id,
            ProjectPatch {
                name: req.name,
                description: req.description,
                team_id: req.team_id,
            },
        )
        .await?;

    Ok(Json(project))
}

/// Delete a project
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let service = ProjectService::new(state.store.as_ref());
    service.delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
