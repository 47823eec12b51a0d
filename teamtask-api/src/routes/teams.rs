/// Team and membership endpoints
///
/// # Endpoints
///
/// - `POST   /v1/teams` - Create a team (caller becomes owner)
/// - `GET    /v1/teams` - List the caller's teams
/// - `GET    /v1/teams/:id` - Get a team (members only)
/// - `DELETE /v1/teams/:id` - Delete a team (owner only)
/// - `GET    /v1/teams/:id/members` - List members (members only)
/// - `POST   /v1/teams/:id/members` - Add a member (owner/admin)
/// - `PUT    /v1/teams/:id/members/:user_id` - Change a member's role (owner/admin)
/// - `DELETE /v1/teams/:id/members/:user_id` - Remove a member (owner/admin)
///
/// Requests against teams the caller cannot see answer 404, the same
/// as for teams that do not exist.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use teamtask_shared::authz::Actor;
use teamtask_shared::models::{NewTeam, Team, TeamMembership, TeamRole};
use teamtask_shared::registry::TeamRegistry;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::{validation_details, ApiResult},
};

/// Create team request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequest {
    /// Team name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Optional description
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

/// Add member request
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// User to add
    pub user_id: Uuid,

    /// Role: one of `owner`, `admin`, `member`
    pub role: String,
}

/// Role change request
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    /// New role: one of `owner`, `admin`, `member`
    pub role: String,
}

/// Create a team
///
/// The caller becomes the team's owner; the owner membership is
/// created atomically with the team.
pub async fn create_team(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateTeamRequest>,
) -> ApiResult<(StatusCode, Json<Team>)> {
    req.validate().map_err(validation_details)?;

    let registry = TeamRegistry::new(state.store.as_ref());
    let team = registry
        .create_team(
            &actor,
            NewTeam {
                name: req.name,
                description: req.description,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(team)))
}

/// List the caller's teams
pub async fn list_teams(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<Team>>> {
    let registry = TeamRegistry::new(state.store.as_ref());
    let teams = registry.list_teams(&actor).await?;
    Ok(Json(teams))
}

/// Get a single team
pub async fn get_team(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Team>> {
    let registry = TeamRegistry::new(state.store.as_ref());
    let team = registry.get_team(&actor, id).await?;
    Ok(Json(team))
}

/// Delete a team and its memberships
pub async fn delete_team(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let registry = TeamRegistry::new(state.store.as_ref());
    registry.delete_team(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List a team's members
pub async fn list_members(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<TeamMembership>>> {
    let registry = TeamRegistry::new(state.store.as_ref());
    let members = registry.list_members(&actor, id).await?;
    Ok(Json(members))
}

/// Add a member to a team
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Role not one of the enumerated values
/// - `409 Conflict`: The user is already a member (`duplicate_membership`)
pub async fn add_member(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<TeamMembership>)> {
    let role = TeamRole::parse(&req.role)?;

    let registry = TeamRegistry::new(state.store.as_ref());
    let membership = registry.add_member(&actor, id, req.user_id, role).await?;

    Ok((StatusCode::CREATED, Json(membership)))
}

/// Change a member's role
///
/// # Errors
///
/// - `409 Conflict`: Demoting the sole owner (`last_owner`)
pub async fn update_member_role(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateRoleRequest>,
) -> ApiResult<Json<TeamMembership>> {
    let role = TeamRole::parse(&req.role)?;

    let registry = TeamRegistry::new(state.store.as_ref());
    let membership = registry
        .update_member_role(&actor, id, user_id, role)
        .await?;

    Ok(Json(membership))
}

/// Remove a member from a team
///
/// # Errors
///
/// - `409 Conflict`: Removing the sole owner (`last_owner`)
/// - `404 Not Found`: No such membership (including repeat removals)
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let registry = TeamRegistry::new(state.store.as_ref());
    registry.remove_member(&actor, id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
