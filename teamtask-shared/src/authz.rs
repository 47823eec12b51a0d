/// Authorization gate
///
/// Single choke point for access decisions. The gate is pure: callers
/// fetch the resource (or membership) first, then ask for a decision on
/// an (actor, action, target) triple. No storage access happens here,
/// so the decision logic is exhaustively testable in isolation.
///
/// # Decision model
///
/// 1. An unauthenticated actor is denied everything.
/// 2. Any authenticated actor may create resources.
/// 3. Read, update, and delete on a creator-owned resource require the
///    actor to be its creator.
/// 4. Updating or deleting a team requires the actor to be the team's
///    owner.
/// 5. Reading a team or its member roster requires any membership in
///    the team; managing members requires an `owner` or `admin`
///    membership.
///
/// Denials collapse to `NotFound` when surfaced: a caller probing a
/// resource it cannot touch gets the same answer as for a resource
/// that does not exist.
///
/// # Example
///
/// ```
/// use teamtask_shared::authz::{decide, Action, Actor, Decision, Target};
/// use uuid::Uuid;
///
/// let me = Actor { user_id: Uuid::new_v4() };
/// let mine = Target::Owned { owner_id: me.user_id };
/// assert_eq!(decide(Some(&me), Action::Update, mine), Decision::Allow);
///
/// let theirs = Target::Owned { owner_id: Uuid::new_v4() };
/// assert!(decide(Some(&me), Action::Update, theirs).is_denied());
/// ```

use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::TeamRole;

/// The verified identity performing an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// Verified user ID (from a validated access token)
    pub user_id: Uuid,
}

/// Operation kinds the gate distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Read a single resource or listing
    Read,

    /// Create a new resource
    Create,

    /// Mutate an existing resource
    Update,

    /// Remove an existing resource
    Delete,

    /// Add, remove, or re-role team members
    ManageMembers,
}

/// What the action operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A creator-owned resource (project or task)
    Owned {
        /// The resource's creating user
        owner_id: Uuid,
    },

    /// A team record
    Team {
        /// The team's owning user
        owner_id: Uuid,
    },

    /// A team's member roster
    Members {
        /// The actor's role in the team, if any membership exists
        actor_role: Option<TeamRole>,
    },
}

/// Why a decision denied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No verified actor
    Unauthenticated,

    /// Actor is not the resource's creator
    NotOwner,

    /// Actor holds no membership in the team
    NotMember,

    /// Actor's role does not permit the action
    InsufficientRole,
}

/// Outcome of an authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The operation may proceed
    Allow,

    /// The operation is denied
    Deny(DenyReason),
}

impl Decision {
    /// True when the decision is a denial
    pub fn is_denied(&self) -> bool {
        matches!(self, Decision::Deny(_))
    }

    /// Converts the decision into a result, collapsing denials
    ///
    /// `Unauthenticated` stays distinct (the caller never presented an
    /// identity); every other denial becomes `NotFound` so existence
    /// does not leak.
    pub fn authorize(self) -> CoreResult<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(DenyReason::Unauthenticated) => Err(CoreError::Unauthenticated),
            Decision::Deny(_) => Err(CoreError::NotFound),
        }
    }
}

/// Decides whether `actor` may perform `action` on `target`
pub fn decide(actor: Option<&Actor>, action: Action, target: Target) -> Decision {
    let Some(actor) = actor else {
        return Decision::Deny(DenyReason::Unauthenticated);
    };

    match (action, target) {
        // Authenticated creation is always permitted; ownership is
        // stamped from the actor, not granted by it.
        (Action::Create, _) => Decision::Allow,

        (Action::Read | Action::Update | Action::Delete, Target::Owned { owner_id }) => {
            if actor.user_id == owner_id {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::NotOwner)
            }
        }

        // Team reads are decided on the actor's membership, so callers
        // pass `Target::Members` for them; a raw team target only
        // grants its owner.
        (Action::Read, Target::Team { owner_id }) => {
            if actor.user_id == owner_id {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::NotMember)
            }
        }

        (Action::Update | Action::Delete, Target::Team { owner_id }) => {
            if actor.user_id == owner_id {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::NotOwner)
            }
        }

        (Action::Read, Target::Members { actor_role }) => {
            if actor_role.is_some() {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::NotMember)
            }
        }

        (Action::Update | Action::Delete | Action::ManageMembers, Target::Members { actor_role }) => {
            match actor_role {
                Some(role) if role.can_manage_members() => Decision::Allow,
                Some(_) => Decision::Deny(DenyReason::InsufficientRole),
                None => Decision::Deny(DenyReason::NotMember),
            }
        }

        (Action::ManageMembers, Target::Owned { .. } | Target::Team { .. }) => {
            Decision::Deny(DenyReason::InsufficientRole)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> Actor {
        Actor {
            user_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_unauthenticated_denied_everything() {
        let target = Target::Owned {
            owner_id: Uuid::new_v4(),
        };
        for action in [
            Action::Read,
            Action::Create,
            Action::Update,
            Action::Delete,
        ] {
            assert_eq!(
                decide(None, action, target),
                Decision::Deny(DenyReason::Unauthenticated)
            );
        }
    }

    #[test]
    fn test_create_allowed_for_any_authenticated_actor() {
        let me = actor();
        let target = Target::Owned {
            owner_id: Uuid::new_v4(),
        };
        assert_eq!(decide(Some(&me), Action::Create, target), Decision::Allow);
    }

    #[test]
    fn test_owner_may_mutate_own_resource() {
        let me = actor();
        let mine = Target::Owned {
            owner_id: me.user_id,
        };
        assert_eq!(decide(Some(&me), Action::Read, mine), Decision::Allow);
        assert_eq!(decide(Some(&me), Action::Update, mine), Decision::Allow);
        assert_eq!(decide(Some(&me), Action::Delete, mine), Decision::Allow);
    }

    #[test]
    fn test_non_owner_denied_foreign_resource() {
        let me = actor();
        let theirs = Target::Owned {
            owner_id: Uuid::new_v4(),
        };
        for action in [Action::Read, Action::Update, Action::Delete] {
            assert_eq!(
                decide(Some(&me), action, theirs),
                Decision::Deny(DenyReason::NotOwner)
            );
        }
    }

    #[test]
    fn test_team_delete_requires_team_owner() {
        let me = actor();
        let my_team = Target::Team {
            owner_id: me.user_id,
        };
        let their_team = Target::Team {
            owner_id: Uuid::new_v4(),
        };
        assert_eq!(decide(Some(&me), Action::Delete, my_team), Decision::Allow);
        assert_eq!(
            decide(Some(&me), Action::Delete, their_team),
            Decision::Deny(DenyReason::NotOwner)
        );
    }

    #[test]
    fn test_roster_read_requires_any_membership() {
        let me = actor();
        assert_eq!(
            decide(
                Some(&me),
                Action::Read,
                Target::Members {
                    actor_role: Some(TeamRole::Member)
                }
            ),
            Decision::Allow
        );
        assert_eq!(
            decide(Some(&me), Action::Read, Target::Members { actor_role: None }),
            Decision::Deny(DenyReason::NotMember)
        );
    }

    #[test]
    fn test_manage_members_requires_admin_or_owner() {
        let me = actor();
        for role in [TeamRole::Owner, TeamRole::Admin] {
            assert_eq!(
                decide(
                    Some(&me),
                    Action::ManageMembers,
                    Target::Members {
                        actor_role: Some(role)
                    }
                ),
                Decision::Allow
            );
        }
        assert_eq!(
            decide(
                Some(&me),
                Action::ManageMembers,
                Target::Members {
                    actor_role: Some(TeamRole::Member)
                }
            ),
            Decision::Deny(DenyReason::InsufficientRole)
        );
        assert_eq!(
            decide(
                Some(&me),
                Action::ManageMembers,
                Target::Members { actor_role: None }
            ),
            Decision::Deny(DenyReason::NotMember)
        );
    }

    #[test]
    fn test_denials_collapse_to_not_found() {
        assert!(matches!(
            Decision::Deny(DenyReason::NotOwner).authorize(),
            Err(CoreError::NotFound)
        ));
        assert!(matches!(
            Decision::Deny(DenyReason::NotMember).authorize(),
            Err(CoreError::NotFound)
        ));
        assert!(matches!(
            Decision::Deny(DenyReason::InsufficientRole).authorize(),
            Err(CoreError::NotFound)
        ));
        assert!(matches!(
            Decision::Deny(DenyReason::Unauthenticated).authorize(),
            Err(CoreError::Unauthenticated)
        ));
        assert!(Decision::Allow.authorize().is_ok());
    }
}
