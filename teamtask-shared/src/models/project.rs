/// Project model
///
/// A project belongs to exactly one creating user (`user_id`, stamped
/// at creation and never mutated). The optional `team_id` is a
/// non-owning association: it enables team-scoped listing but grants no
/// mutation rights to other team members.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name TEXT NOT NULL,
///     description TEXT,
///     user_id UUID NOT NULL REFERENCES users(id),
///     team_id UUID REFERENCES teams(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID (store-generated)
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Creating user; the sole basis for mutation rights
    pub user_id: Uuid,

    /// Optional team association (non-owning)
    pub team_id: Option<Uuid>,

    /// When the project was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new project
///
/// `user_id` is stamped by the ownership layer from the acting
/// identity, never taken from the payload.
#[derive(Debug, Clone)]
pub struct NewProject {
    /// Project name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Creating user
    pub user_id: Uuid,

    /// Optional team association
    pub team_id: Option<Uuid>,
}

/// Partial update for a project
///
/// Only provided fields are merged; `id` and `user_id` are never
/// mutated by an update. Double-`Option` fields distinguish "leave
/// unchanged" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    /// New name
    pub name: Option<String>,

    /// New description (use `Some(None)` to clear)
    pub description: Option<Option<String>>,

    /// New team association (use `Some(None)` to detach)
    pub team_id: Option<Option<Uuid>>,
}

impl ProjectPatch {
    /// True when the patch touches nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.team_id.is_none()
    }
}
