/// Storage abstraction for TeamTask
///
/// The core depends on the `Store` capability, not on a process-wide
/// database handle: the registry, ownership layer, and identity store
/// all take `&dyn Store`, so any backend can be injected. Two backends
/// ship with the crate:
///
/// - `PgStore`: PostgreSQL via sqlx, used in production
/// - `MemStore`: in-memory maps, used by the test suites
///
/// # Atomicity
///
/// Invariant checks that must not race with the mutation they guard
/// live *inside* the store implementations, where they can be made
/// atomic (a transaction in Postgres, a single write-lock acquisition
/// in memory):
///
/// - team creation inserts the owner membership in the same transaction
/// - team deletion removes all memberships in the same transaction
/// - membership insertion fails `DuplicateMembership` on an existing
///   (team, user) pair rather than duplicating or upserting
/// - removing or demoting the sole `owner` membership fails `LastOwner`
///   with the owner count evaluated atomically with the mutation
///
/// A failed mutation leaves prior state unchanged; there are no
/// partial writes.

pub mod memory;
pub mod postgres;

pub use memory::MemStore;
pub use postgres::{create_pool, run_migrations, PgStore};

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    NewProject, NewTask, NewTeam, NewUser, Project, ProjectPatch, Task, TaskPatch, Team,
    TeamMembership, TeamRole, User,
};

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No such record
    #[error("record not found")]
    NotFound,

    /// Username uniqueness violated
    #[error("username '{0}' already exists")]
    DuplicateUsername(String),

    /// A membership row already exists for this (team, user) pair
    #[error("membership already exists")]
    DuplicateMembership,

    /// The mutation would leave the team without an owner membership
    #[error("team would be left without an owner")]
    LastOwner,

    /// Underlying storage unavailable or misbehaving
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// Persistence capability consumed by the TeamTask core
///
/// Identifiers are generated by the implementation (v4 UUIDs in both
/// shipped backends); callers never supply or assume an ID strategy.
#[async_trait]
pub trait Store: Send + Sync {
    // --- users ---

    /// Inserts a user; fails `DuplicateUsername` if the name is taken
    async fn create_user(&self, data: NewUser) -> Result<User, StoreError>;

    /// Finds a user by ID
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Finds a user by username
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    // --- teams ---

    /// Creates a team and its owner membership atomically
    ///
    /// Both rows become visible together or not at all; there is never
    /// an observable team without its `owner` membership.
    async fn create_team(&self, data: NewTeam, owner_id: Uuid) -> Result<Team, StoreError>;

    /// Finds a team by ID
    async fn find_team(&self, id: Uuid) -> Result<Option<Team>, StoreError>;

    /// Deletes a team and all of its memberships atomically
    async fn delete_team(&self, id: Uuid) -> Result<(), StoreError>;

    /// Lists teams where the user holds any membership
    async fn teams_for_user(&self, user_id: Uuid) -> Result<Vec<Team>, StoreError>;

    // --- memberships ---

    /// Inserts a membership; fails `DuplicateMembership` on an existing pair
    async fn insert_membership(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        role: TeamRole,
    ) -> Result<TeamMembership, StoreError>;

    /// Finds a specific membership
    async fn find_membership(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<TeamMembership>, StoreError>;

    /// Changes a member's role; demoting the sole owner fails `LastOwner`
    async fn update_membership_role(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        role: TeamRole,
    ) -> Result<TeamMembership, StoreError>;

    /// Removes a membership; removing the sole owner fails `LastOwner`
    async fn delete_membership(&self, team_id: Uuid, user_id: Uuid) -> Result<(), StoreError>;

    /// Lists all memberships of a team
    async fn list_members(&self, team_id: Uuid) -> Result<Vec<TeamMembership>, StoreError>;

    /// Lists all memberships held by a user
    async fn memberships_for_user(&self, user_id: Uuid)
        -> Result<Vec<TeamMembership>, StoreError>;

    // --- projects ---

    /// Inserts a project
    async fn create_project(&self, data: NewProject) -> Result<Project, StoreError>;

    /// Finds a project by ID
    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, StoreError>;

    /// Lists projects created by the user
    async fn projects_for_user(&self, user_id: Uuid) -> Result<Vec<Project>, StoreError>;

    /// Merges the provided fields into an existing project
    async fn update_project(&self, id: Uuid, patch: ProjectPatch) -> Result<Project, StoreError>;

    /// Deletes a project
    async fn delete_project(&self, id: Uuid) -> Result<(), StoreError>;

    // --- tasks ---

    /// Inserts a task
    async fn create_task(&self, data: NewTask) -> Result<Task, StoreError>;

    /// Finds a task by ID
    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    /// Lists tasks created by the user
    async fn tasks_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, StoreError>;

    /// Merges the provided fields into an existing task
    async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<Task, StoreError>;

    /// Deletes a task
    async fn delete_task(&self, id: Uuid) -> Result<(), StoreError>;
}
