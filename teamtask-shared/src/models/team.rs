/// Team model
///
/// A team is a named collaborative group with exactly one owner, fixed
/// at creation. The owner is also recorded as an `owner`-role
/// membership row, created atomically with the team (see
/// `store::Store::create_team`); deleting a team removes its
/// memberships in the same transaction so no role grant outlives the
/// team.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teams (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name TEXT NOT NULL,
///     description TEXT,
///     owner_id UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Team model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    /// Unique team ID (store-generated)
    pub id: Uuid,

    /// Team name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Owning user, immutable after creation
    pub owner_id: Uuid,

    /// When the team was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new team
///
/// The owner is supplied separately by the registry (it is always the
/// acting user), never by the caller's payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTeam {
    /// Team name
    pub name: String,

    /// Optional description
    pub description: Option<String>,
}
