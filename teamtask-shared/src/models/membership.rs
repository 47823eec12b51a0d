/// Team membership model
///
/// A membership is the ternary relation (team, user, role). Roles
/// govern membership-mutation rights only; they never grant access to
/// another member's projects or tasks (ownership stays with the
/// creating user, see `resources`).
///
/// # Schema
///
/// ```sql
/// CREATE TYPE team_role AS ENUM ('owner', 'admin', 'member');
///
/// CREATE TABLE team_memberships (
///     team_id UUID NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role team_role NOT NULL DEFAULT 'member',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (team_id, user_id)
/// );
/// ```
///
/// # Roles
///
/// - **owner**: May manage members and delete the team
/// - **admin**: May manage members
/// - **member**: May participate; no membership mutations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Role attached to a (team, user) membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "team_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
    /// Full control including team deletion
    Owner,

    /// May add and remove members
    Admin,

    /// Ordinary member, no membership mutations
    Member,
}

impl TeamRole {
    /// Converts role to string for display and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamRole::Owner => "owner",
            TeamRole::Admin => "admin",
            TeamRole::Member => "member",
        }
    }

    /// Parses a role from its wire representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "owner" => Some(TeamRole::Owner),
            "admin" => Some(TeamRole::Admin),
            "member" => Some(TeamRole::Member),
            _ => None,
        }
    }

    /// Parses a role at the input boundary, rejecting out-of-enum values
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Self::from_str(s)
            .ok_or_else(|| CoreError::validation("role", "must be one of owner, admin, member"))
    }

    /// Whether this role may add or remove members
    ///
    /// Hierarchy: owner ⊇ admin ⊇ member for membership mutations.
    pub fn can_manage_members(&self) -> bool {
        matches!(self, TeamRole::Owner | TeamRole::Admin)
    }

    /// Checks if this role meets or exceeds the required role
    pub fn has_permission(&self, required: &TeamRole) -> bool {
        self.permission_level() >= required.permission_level()
    }

    /// Numeric permission level for comparison
    fn permission_level(&self) -> u8 {
        match self {
            TeamRole::Owner => 3,
            TeamRole::Admin => 2,
            TeamRole::Member => 1,
        }
    }
}

/// Membership row linking a user to a team with a role
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamMembership {
    /// Team ID
    pub team_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the team
    pub role: TeamRole,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(TeamRole::Owner.as_str(), "owner");
        assert_eq!(TeamRole::Admin.as_str(), "admin");
        assert_eq!(TeamRole::Member.as_str(), "member");
    }

    #[test]
    fn test_role_roundtrip() {
        for role in [TeamRole::Owner, TeamRole::Admin, TeamRole::Member] {
            assert_eq!(TeamRole::from_str(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_invalid_role_is_validation_error() {
        assert_eq!(TeamRole::from_str("viewer"), None);
        assert!(matches!(
            TeamRole::parse("superuser"),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_member_management_rights() {
        assert!(TeamRole::Owner.can_manage_members());
        assert!(TeamRole::Admin.can_manage_members());
        assert!(!TeamRole::Member.can_manage_members());
    }

    #[test]
    fn test_role_hierarchy() {
        assert!(TeamRole::Owner.has_permission(&TeamRole::Admin));
        assert!(TeamRole::Owner.has_permission(&TeamRole::Member));
        assert!(TeamRole::Admin.has_permission(&TeamRole::Member));
        assert!(!TeamRole::Admin.has_permission(&TeamRole::Owner));
        assert!(!TeamRole::Member.has_permission(&TeamRole::Admin));
    }
}
