/// Task model
///
/// A task belongs to exactly one creating user and may be linked to a
/// project, a team, and an assignee. `completed` defaults to `false`
/// and is only settable after creation; `priority` defaults to
/// `medium` and validates against the closed enum at the boundary —
/// invalid values are rejected before persistence, never coerced.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title TEXT NOT NULL,
///     description TEXT,
///     due_date TIMESTAMPTZ,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     priority task_priority NOT NULL DEFAULT 'medium',
///     user_id UUID NOT NULL REFERENCES users(id),
///     project_id UUID REFERENCES projects(id) ON DELETE SET NULL,
///     team_id UUID REFERENCES teams(id) ON DELETE SET NULL,
///     assigned_to UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority
    Low,

    /// Default priority
    #[default]
    Medium,

    /// High priority
    High,
}

impl TaskPriority {
    /// Converts priority to string for display and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    /// Parses a priority from its wire representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(TaskPriority::Low),
            "medium" => Some(TaskPriority::Medium),
            "high" => Some(TaskPriority::High),
            _ => None,
        }
    }

    /// Parses a priority at the input boundary, rejecting out-of-enum values
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Self::from_str(s)
            .ok_or_else(|| CoreError::validation("priority", "must be one of low, medium, high"))
    }
}

/// Due date as accepted at the API boundary
///
/// Clients may send either an RFC 3339 timestamp string or a Unix
/// epoch in milliseconds; both normalize to a single internal
/// `DateTime<Utc>` representation.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum DueDateInput {
    /// RFC 3339 timestamp, e.g. `"2024-05-01T00:00:00Z"`
    Timestamp(DateTime<Utc>),

    /// Unix epoch milliseconds, e.g. `1714521600000`
    Millis(i64),
}

impl DueDateInput {
    /// Normalizes to the internal timestamp representation
    ///
    /// Out-of-range epoch values are a validation error, not a panic
    /// or a silent clamp.
    pub fn resolve(self) -> Result<DateTime<Utc>, CoreError> {
        match self {
            DueDateInput::Timestamp(ts) => Ok(ts),
            DueDateInput::Millis(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| CoreError::validation("due_date", "timestamp out of range")),
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (store-generated)
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Completion flag, defaults to false at creation
    pub completed: bool,

    /// Priority, defaults to medium
    pub priority: TaskPriority,

    /// Creating user; the sole basis for mutation rights
    pub user_id: Uuid,

    /// Optional project link
    pub project_id: Option<Uuid>,

    /// Optional team association (non-owning)
    pub team_id: Option<Uuid>,

    /// Optional assignee
    pub assigned_to: Option<Uuid>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// `user_id` is stamped by the ownership layer from the acting
/// identity. `completed` is not accepted at creation; it starts false.
#[derive(Debug, Clone)]
pub struct NewTask {
    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Optional due date (already normalized)
    pub due_date: Option<DateTime<Utc>>,

    /// Priority (boundary applies the `medium` default)
    pub priority: TaskPriority,

    /// Creating user
    pub user_id: Uuid,

    /// Optional project link
    pub project_id: Option<Uuid>,

    /// Optional team association
    pub team_id: Option<Uuid>,

    /// Optional assignee
    pub assigned_to: Option<Uuid>,
}

/// Partial update for a task
///
/// Only provided fields are merged; `id` and `user_id` are never
/// mutated. Double-`Option` fields distinguish "leave unchanged"
/// (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    /// New title
    pub title: Option<String>,

    /// New description (use `Some(None)` to clear)
    pub description: Option<Option<String>>,

    /// New due date (use `Some(None)` to clear)
    pub due_date: Option<Option<DateTime<Utc>>>,

    /// New completion flag
    pub completed: Option<bool>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New project link (use `Some(None)` to detach)
    pub project_id: Option<Option<Uuid>>,

    /// New team association (use `Some(None)` to detach)
    pub team_id: Option<Option<Uuid>>,

    /// New assignee (use `Some(None)` to unassign)
    pub assigned_to: Option<Option<Uuid>>,
}

impl TaskPatch {
    /// True when the patch touches nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
            && self.project_id.is_none()
            && self.team_id.is_none()
            && self.assigned_to.is_none()
    }
}
