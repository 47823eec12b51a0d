/// Team membership registry
///
/// Team and membership operations, each consulting the authorization
/// gate before touching the store. The registry checks structural
/// validity (target team and user exist, role parses); the identity of
/// the caller is taken on trust as a verified `Actor` produced by the
/// transport layer.
///
/// Multi-row effects (owner membership on creation, membership cascade
/// on deletion, last-owner protection) are guaranteed by the store, so
/// they hold under concurrency for any backend.

use tracing::info;
use uuid::Uuid;

use crate::authz::{decide, Action, Actor, Target};
use crate::error::{CoreError, CoreResult};
use crate::models::{NewTeam, Team, TeamMembership, TeamRole};
use crate::store::Store;

/// Registry operations over an injected store
pub struct TeamRegistry<'a> {
    store: &'a dyn Store,
}

impl<'a> TeamRegistry<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Creates a team owned by the actor
    ///
    /// The owner membership is created atomically with the team; the
    /// new team is never observable without it.
    pub async fn create_team(&self, actor: &Actor, data: NewTeam) -> CoreResult<Team> {
        if data.name.trim().is_empty() {
            return Err(CoreError::validation("name", "must not be empty"));
        }

        decide(
            Some(actor),
            Action::Create,
            Target::Team {
                owner_id: actor.user_id,
            },
        )
        .authorize()?;

        let team = self.store.create_team(data, actor.user_id).await?;
        info!(team_id = %team.id, owner_id = %actor.user_id, "team created");
        Ok(team)
    }

    /// Fetches a team the actor belongs to
    pub async fn get_team(&self, actor: &Actor, team_id: Uuid) -> CoreResult<Team> {
        let team = self
            .store
            .find_team(team_id)
            .await?
            .ok_or(CoreError::NotFound)?;

        let membership = self.store.find_membership(team_id, actor.user_id).await?;
        decide(
            Some(actor),
            Action::Read,
            Target::Members {
                actor_role: membership.map(|m| m.role),
            },
        )
        .authorize()?;

        Ok(team)
    }

    /// Lists teams where the actor holds any membership
    pub async fn list_teams(&self, actor: &Actor) -> CoreResult<Vec<Team>> {
        decide(
            Some(actor),
            Action::Read,
            Target::Owned {
                owner_id: actor.user_id,
            },
        )
        .authorize()?;

        Ok(self.store.teams_for_user(actor.user_id).await?)
    }

    /// Deletes a team and all of its memberships
    ///
    /// Only the team's owner may delete it. A non-owner gets the same
    /// answer as for a missing team.
    pub async fn delete_team(&self, actor: &Actor, team_id: Uuid) -> CoreResult<()> {
        let team = self
            .store
            .find_team(team_id)
            .await?
            .ok_or(CoreError::NotFound)?;

        decide(
            Some(actor),
            Action::Delete,
            Target::Team {
                owner_id: team.owner_id,
            },
        )
        .authorize()?;

        self.store.delete_team(team_id).await?;
        info!(team_id = %team_id, "team deleted");
        Ok(())
    }

    /// Adds a member to a team
    ///
    /// Requires an `owner` or `admin` membership held by the actor.
    /// The target user must exist; an existing (team, user) pair fails
    /// as an invariant violation, never a duplicate row.
    pub async fn add_member(
        &self,
        actor: &Actor,
        team_id: Uuid,
        user_id: Uuid,
        role: TeamRole,
    ) -> CoreResult<TeamMembership> {
        self.store
            .find_team(team_id)
            .await?
            .ok_or(CoreError::NotFound)?;

        let actor_membership = self.store.find_membership(team_id, actor.user_id).await?;
        decide(
            Some(actor),
            Action::ManageMembers,
            Target::Members {
                actor_role: actor_membership.map(|m| m.role),
            },
        )
        .authorize()?;

        self.store
            .find_user(user_id)
            .await?
            .ok_or(CoreError::NotFound)?;

        let membership = self.store.insert_membership(team_id, user_id, role).await?;
        info!(team_id = %team_id, user_id = %user_id, role = role.as_str(), "member added");
        Ok(membership)
    }

    /// Changes an existing member's role
    ///
    /// Demoting the sole owner fails as an invariant violation with
    /// the membership unchanged.
    pub async fn update_member_role(
        &self,
        actor: &Actor,
        team_id: Uuid,
        user_id: Uuid,
        role: TeamRole,
    ) -> CoreResult<TeamMembership> {
        self.store
            .find_team(team_id)
            .await?
            .ok_or(CoreError::NotFound)?;

        let actor_membership = self.store.find_membership(team_id, actor.user_id).await?;
        decide(
            Some(actor),
            Action::ManageMembers,
            Target::Members {
                actor_role: actor_membership.map(|m| m.role),
            },
        )
        .authorize()?;

        let membership = self
            .store
            .update_membership_role(team_id, user_id, role)
            .await?;
        info!(team_id = %team_id, user_id = %user_id, role = role.as_str(), "member role changed");
        Ok(membership)
    }

    /// Removes a member from a team
    ///
    /// Removing the last `owner` membership fails as an invariant
    /// violation with the membership set unchanged. Removing an
    /// already-removed member is `NotFound`, same as the first call
    /// after success.
    pub async fn remove_member(
        &self,
        actor: &Actor,
        team_id: Uuid,
        user_id: Uuid,
    ) -> CoreResult<()> {
        self.store
            .find_team(team_id)
            .await?
            .ok_or(CoreError::NotFound)?;

        let actor_membership = self.store.find_membership(team_id, actor.user_id).await?;
        decide(
            Some(actor),
            Action::ManageMembers,
            Target::Members {
                actor_role: actor_membership.map(|m| m.role),
            },
        )
        .authorize()?;

        self.store.delete_membership(team_id, user_id).await?;
        info!(team_id = %team_id, user_id = %user_id, "member removed");
        Ok(())
    }

    /// Lists a team's members
    ///
    /// Requires any membership held by the actor.
    pub async fn list_members(
        &self,
        actor: &Actor,
        team_id: Uuid,
    ) -> CoreResult<Vec<TeamMembership>> {
        self.store
            .find_team(team_id)
            .await?
            .ok_or(CoreError::NotFound)?;

        let actor_membership = self.store.find_membership(team_id, actor.user_id).await?;
        decide(
            Some(actor),
            Action::Read,
            Target::Members {
                actor_role: actor_membership.map(|m| m.role),
            },
        )
        .authorize()?;

        Ok(self.store.list_members(team_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;

    async fn user(store: &MemStore, name: &str) -> Actor {
        let user = store
            .create_user(crate::models::NewUser {
                username: name.to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        Actor { user_id: user.id }
    }

    fn team_input(name: &str) -> NewTeam {
        NewTeam {
            name: name.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_team_rejects_empty_name() {
        let store = MemStore::new();
        let registry = TeamRegistry::new(&store);
        let owner = user(&store, "owner").await;

        let err = registry
            .create_team(&owner, team_input("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_member_cannot_manage_but_admin_can() {
        let store = MemStore::new();
        let registry = TeamRegistry::new(&store);

        let u1 = user(&store, "u1").await;
        let u2 = user(&store, "u2").await;
        let u3 = user(&store, "u3").await;

        let team = registry.create_team(&u1, team_input("Eng")).await.unwrap();

        registry
            .add_member(&u1, team.id, u2.user_id, TeamRole::Member)
            .await
            .unwrap();

        // A plain member gets the collapsed denial.
        let err = registry
            .add_member(&u2, team.id, u3.user_id, TeamRole::Member)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound));

        // After promotion to admin the same call succeeds.
        registry
            .update_member_role(&u1, team.id, u2.user_id, TeamRole::Admin)
            .await
            .unwrap();
        registry
            .add_member(&u2, team.id, u3.user_id, TeamRole::Member)
            .await
            .unwrap();

        let members = registry.list_members(&u1, team.id).await.unwrap();
        assert_eq!(members.len(), 3);
    }

    #[tokio::test]
    async fn test_list_teams_scoped_to_memberships() {
        let store = MemStore::new();
        let registry = TeamRegistry::new(&store);

        let a = user(&store, "a").await;
        let b = user(&store, "b").await;

        let team_a = registry.create_team(&a, team_input("Eng")).await.unwrap();
        let team_b = registry.create_team(&b, team_input("Ops")).await.unwrap();

        let teams = registry.list_teams(&a).await.unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].id, team_a.id);

        // Joining the other team makes it visible.
        registry
            .add_member(&b, team_b.id, a.user_id, TeamRole::Member)
            .await
            .unwrap();
        assert_eq!(registry.list_teams(&a).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_non_member_cannot_list_members() {
        let store = MemStore::new();
        let registry = TeamRegistry::new(&store);

        let owner = user(&store, "owner").await;
        let outsider = user(&store, "outsider").await;

        let team = registry
            .create_team(&owner, team_input("Eng"))
            .await
            .unwrap();

        let err = registry.list_members(&outsider, team.id).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound));
    }

    #[tokio::test]
    async fn test_only_owner_can_delete_team() {
        let store = MemStore::new();
        let registry = TeamRegistry::new(&store);

        let owner = user(&store, "owner").await;
        let admin = user(&store, "admin").await;

        let team = registry
            .create_team(&owner, team_input("Eng"))
            .await
            .unwrap();
        registry
            .add_member(&owner, team.id, admin.user_id, TeamRole::Admin)
            .await
            .unwrap();

        // Even an admin gets the collapsed denial on team deletion.
        let err = registry.delete_team(&admin, team.id).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound));

        registry.delete_team(&owner, team.id).await.unwrap();
        assert!(store.find_team(team.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_member_idempotence() {
        let store = MemStore::new();
        let registry = TeamRegistry::new(&store);

        let owner = user(&store, "owner").await;
        let member = user(&store, "member").await;

        let team = registry
            .create_team(&owner, team_input("Eng"))
            .await
            .unwrap();
        registry
            .add_member(&owner, team.id, member.user_id, TeamRole::Member)
            .await
            .unwrap();

        registry
            .remove_member(&owner, team.id, member.user_id)
            .await
            .unwrap();

        // Second removal is NotFound, never a different error.
        let err = registry
            .remove_member(&owner, team.id, member.user_id)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound));
    }

    #[tokio::test]
    async fn test_add_member_requires_existing_user() {
        let store = MemStore::new();
        let registry = TeamRegistry::new(&store);

        let owner = user(&store, "owner").await;
        let team = registry
            .create_team(&owner, team_input("Eng"))
            .await
            .unwrap();

        let err = registry
            .add_member(&owner, team.id, Uuid::new_v4(), TeamRole::Member)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound));
    }

    #[tokio::test]
    async fn test_duplicate_membership_is_invariant_violation() {
        let store = MemStore::new();
        let registry = TeamRegistry::new(&store);

        let owner = user(&store, "owner").await;
        let member = user(&store, "member").await;

        let team = registry
            .create_team(&owner, team_input("Eng"))
            .await
            .unwrap();
        registry
            .add_member(&owner, team.id, member.user_id, TeamRole::Member)
            .await
            .unwrap();

        let err = registry
            .add_member(&owner, team.id, member.user_id, TeamRole::Admin)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvariantViolation(crate::error::Invariant::DuplicateMembership)
        ));
    }

    #[tokio::test]
    async fn test_last_owner_protected() {
        let store = MemStore::new();
        let registry = TeamRegistry::new(&store);

        let owner = user(&store, "owner").await;
        let team = registry
            .create_team(&owner, team_input("Eng"))
            .await
            .unwrap();

        let err = registry
            .remove_member(&owner, team.id, owner.user_id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvariantViolation(crate::error::Invariant::LastOwner)
        ));

        // Membership set unchanged.
        let members = registry.list_members(&owner, team.id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].role, TeamRole::Owner);
    }
}
