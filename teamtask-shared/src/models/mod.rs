/// Domain models for TeamTask
///
/// This module contains the entity structs persisted by the storage
/// layer together with their creation inputs and partial-update
/// patches. Models are plain data: all persistence goes through the
/// `store::Store` trait so that the core never depends on a particular
/// backend.
///
/// # Models
///
/// - `user`: Accounts with a unique username and hashed credential
/// - `team`: Named collaborative groups with a fixed owner
/// - `membership`: (team, user, role) rows with role-based permissions
/// - `project`: User-owned projects, optionally attached to a team
/// - `task`: User-owned tasks with priority, due date, and assignee

pub mod membership;
pub mod project;
pub mod task;
pub mod team;
pub mod user;

pub use membership::{TeamMembership, TeamRole};
pub use project::{NewProject, Project, ProjectPatch};
pub use task::{DueDateInput, NewTask, Task, TaskPatch, TaskPriority};
pub use team::{NewTeam, Team};
pub use user::{NewUser, User};
