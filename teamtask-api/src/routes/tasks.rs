/// Task endpoints
///
/// # Endpoints
///
/// - `POST   /v1/tasks` - Create a task
/// - `GET    /v1/tasks` - List the caller's tasks
/// - `GET    /v1/tasks/:id` - Get a task (creator only)
/// - `PUT    /v1/tasks/:id` - Update a task (creator only)
/// - `DELETE /v1/tasks/:id` - Delete a task (creator only)
///
/// `priority` validates against the closed enum before anything is
/// persisted; `due_date` accepts an RFC 3339 string or epoch
/// milliseconds and normalizes internally. `completed` is not accepted
/// at creation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use teamtask_shared::authz::Actor;
use teamtask_shared::models::{DueDateInput, Task, TaskPatch, TaskPriority};
use teamtask_shared::resources::tasks::{TaskInput, TaskService};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::{validation_details, ApiResult},
};

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Optional description
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    /// Optional due date: RFC 3339 string or epoch milliseconds
    pub due_date: Option<DueDateInput>,

    /// Priority: one of `low`, `medium`, `high` (default `medium`)
    pub priority: Option<String>,

    /// Optional project link
    pub project_id: Option<Uuid>,

    /// Optional team association
    pub team_id: Option<Uuid>,

    /// Optional assignee
    pub assigned_to: Option<Uuid>,
}

/// Update task request
///
/// Absent fields are left unchanged; nullable fields accept an
/// explicit `null` to clear.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,

    #[serde(default, deserialize_with = "super::double_option")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "super::double_option")]
    pub due_date: Option<Option<DueDateInput>>,

    pub completed: Option<bool>,

    pub priority: Option<String>,

    #[serde(default, deserialize_with = "super::double_option")]
    pub project_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "super::double_option")]
    pub team_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "super::double_option")]
    pub assigned_to: Option<Option<Uuid>>,
}

/// Create a task owned by the caller
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Priority outside the enum, or
///   malformed due date; nothing is persisted
pub async fn create_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate().map_err(validation_details)?;

    let priority = req
        .priority
        .as_deref()
        .map(TaskPriority::parse)
        .transpose()?;

    let service = TaskService::new(state.store.as_ref());
    let task = service
        .create(
            &actor,
            TaskInput {
                title: req.title,
                description: req.description,
                due_date: req.due_date,
                priority,
                project_id: req.project_id,
                team_id: req.team_id,
                assigned_to: req.assigned_to,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// List the caller's tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<Task>>> {
    let service = TaskService::new(state.store.as_ref());
    let tasks = service.list(&actor).await?;
    Ok(Json(tasks))
}

/// Get a single task
pub async fn get_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let service = TaskService::new(state.store.as_ref());
    let task = service.get(&actor, id).await?;
    Ok(Json(task))
}

/// Update a task
pub async fn update_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let priority = req
        .priority
        .as_deref()
        .map(TaskPriority::parse)
        .transpose()?;

    let due_date = match req.due_date {
        None => None,
        Some(None) => Some(None),
        Some(Some(input)) => Some(Some(input.resolve()?)),
    };

    let service = TaskService::new(state.store.as_ref());
    let task = service
        .update(
            &actor,
            id,
            TaskPatch {
                title: req.title,
                description: req.description,
                due_date,
                completed: req.completed,
                priority,
                project_id: req.project_id,
                team_id: req.team_id,
                assigned_to: req.assigned_to,
            },
        )
        .await?;

    Ok(Json(task))
}

/// Delete a task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let service = TaskService::new(state.store.as_ref());
    service.delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
