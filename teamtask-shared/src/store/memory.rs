/// In-memory store backend
///
/// `MemStore` keeps all entities in `HashMap`s behind a single
/// `tokio::sync::RwLock`. Every operation takes the lock exactly once,
/// so the multi-record operations (team + owner membership creation,
/// team + membership deletion, last-owner checks) are atomic by
/// construction and a failed operation leaves state untouched.
///
/// This backend is primarily used by the test suites; it is a complete
/// implementation of `Store`, not a stub.
///
/// # Example
///
/// ```no_run
/// use teamtask_shared::store::{MemStore, Store};
/// use teamtask_shared::models::NewUser;
///
/// # async fn example() -> Result<(), teamtask_shared::store::StoreError> {
/// let store = MemStore::new();
/// let user = store.create_user(NewUser {
///     username: "alice".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
/// assert_eq!(user.username, "alice");
/// # Ok(())
/// # }
/// ```

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::{
    NewProject, NewTask, NewTeam, NewUser, Project, ProjectPatch, Task, TaskPatch, Team,
    TeamMembership, TeamRole, User,
};

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    teams: HashMap<Uuid, Team>,
    memberships: HashMap<(Uuid, Uuid), TeamMembership>,
    projects: HashMap<Uuid, Project>,
    tasks: HashMap<Uuid, Task>,
}

impl Inner {
    /// Counts `owner` memberships of a team; callers hold the lock, so
    /// the count cannot race with the mutation it guards.
    fn owner_count(&self, team_id: Uuid) -> usize {
        self.memberships
            .values()
            .filter(|m| m.team_id == team_id && m.role == TeamRole::Owner)
            .count()
    }
}

/// In-memory implementation of `Store`
#[derive(Default)]
pub struct MemStore {
    inner: RwLock<Inner>,
}

impl MemStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn create_user(&self, data: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.username == data.username) {
            return Err(StoreError::DuplicateUsername(data.username));
        }
        let user = User {
            id: Uuid::new_v4(),
            username: data.username,
            password_hash: data.password_hash,
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_team(&self, data: NewTeam, owner_id: Uuid) -> Result<Team, StoreError> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let team = Team {
            id: Uuid::new_v4(),
            name: data.name,
            description: data.description,
            owner_id,
            created_at: now,
        };
        let membership = TeamMembership {
            team_id: team.id,
            user_id: owner_id,
            role: TeamRole::Owner,
            created_at: now,
        };
        inner.teams.insert(team.id, team.clone());
        inner.memberships.insert((team.id, owner_id), membership);
        Ok(team)
    }

    async fn find_team(&self, id: Uuid) -> Result<Option<Team>, StoreError> {
        Ok(self.inner.read().await.teams.get(&id).cloned())
    }

    async fn delete_team(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.teams.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }
        inner.memberships.retain(|(team_id, _), _| *team_id != id);
        // Detach, matching the SQL backend's ON DELETE SET NULL.
        for project in inner.projects.values_mut() {
            if project.team_id == Some(id) {
                project.team_id = None;
            }
        }
        for task in inner.tasks.values_mut() {
            if task.team_id == Some(id) {
                task.team_id = None;
            }
        }
        Ok(())
    }

    async fn teams_for_user(&self, user_id: Uuid) -> Result<Vec<Team>, StoreError> {
        let inner = self.inner.read().await;
        let mut teams: Vec<Team> = inner
            .memberships
            .values()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| inner.teams.get(&m.team_id).cloned())
            .collect();
        teams.sort_by_key(|t| t.created_at);
        Ok(teams)
    }

    async fn insert_membership(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        role: TeamRole,
    ) -> Result<TeamMembership, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.memberships.contains_key(&(team_id, user_id)) {
            return Err(StoreError::DuplicateMembership);
        }
        let membership = TeamMembership {
            team_id,
            user_id,
            role,
            created_at: Utc::now(),
        };
        inner
            .memberships
            .insert((team_id, user_id), membership.clone());
        Ok(membership)
    }

    async fn find_membership(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<TeamMembership>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .memberships
            .get(&(team_id, user_id))
            .cloned())
    }

    async fn update_membership_role(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        role: TeamRole,
    ) -> Result<TeamMembership, StoreError> {
        let mut inner = self.inner.write().await;
        let current = inner
            .memberships
            .get(&(team_id, user_id))
            .cloned()
            .ok_or(StoreError::NotFound)?;
        if current.role == TeamRole::Owner
            && role != TeamRole::Owner
            && inner.owner_count(team_id) <= 1
        {
            return Err(StoreError::LastOwner);
        }
        let membership = inner
            .memberships
            .get_mut(&(team_id, user_id))
            .ok_or(StoreError::NotFound)?;
        membership.role = role;
        Ok(membership.clone())
    }

    async fn delete_membership(&self, team_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let current = inner
            .memberships
            .get(&(team_id, user_id))
            .cloned()
            .ok_or(StoreError::NotFound)?;
        if current.role == TeamRole::Owner && inner.owner_count(team_id) <= 1 {
            return Err(StoreError::LastOwner);
        }
        inner.memberships.remove(&(team_id, user_id));
        Ok(())
    }

    async fn list_members(&self, team_id: Uuid) -> Result<Vec<TeamMembership>, StoreError> {
        let inner = self.inner.read().await;
        let mut members: Vec<TeamMembership> = inner
            .memberships
            .values()
            .filter(|m| m.team_id == team_id)
            .cloned()
            .collect();
        members.sort_by_key(|m| m.created_at);
        Ok(members)
    }

    async fn memberships_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<TeamMembership>, StoreError> {
        let inner = self.inner.read().await;
        let mut memberships: Vec<TeamMembership> = inner
            .memberships
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        memberships.sort_by_key(|m| m.created_at);
        Ok(memberships)
    }

    async fn create_project(&self, data: NewProject) -> Result<Project, StoreError> {
        let mut inner = self.inner.write().await;
        let project = Project {
            id: Uuid::new_v4(),
            name: data.name,
            description: data.description,
            user_id: data.user_id,
            team_id: data.team_id,
            created_at: Utc::now(),
        };
        inner.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        Ok(self.inner.read().await.projects.get(&id).cloned())
    }

    async fn projects_for_user(&self, user_id: Uuid) -> Result<Vec<Project>, StoreError> {
        let inner = self.inner.read().await;
        let mut projects: Vec<Project> = inner
            .projects
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        projects.sort_by_key(|p| p.created_at);
        Ok(projects)
    }

    async fn update_project(&self, id: Uuid, patch: ProjectPatch) -> Result<Project, StoreError> {
        let mut inner = self.inner.write().await;
        let project = inner.projects.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(name) = patch.name {
            project.name = name;
        }
        if let Some(description) = patch.description {
            project.description = description;
        }
        if let Some(team_id) = patch.team_id {
            project.team_id = team_id;
        }
        Ok(project.clone())
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.projects.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }
        // Detach, matching the SQL backend's ON DELETE SET NULL.
        for task in inner.tasks.values_mut() {
            if task.project_id == Some(id) {
                task.project_id = None;
            }
        }
        Ok(())
    }

    async fn create_task(&self, data: NewTask) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            due_date: data.due_date,
            completed: false,
            priority: data.priority,
            user_id: data.user_id,
            project_id: data.project_id,
            team_id: data.team_id,
            assigned_to: data.assigned_to,
            created_at: now,
            updated_at: now,
        };
        inner.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(self.inner.read().await.tasks.get(&id).cloned())
    }

    async fn tasks_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.read().await;
        let mut tasks: Vec<Task> = inner
            .tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.created_at);
        Ok(tasks)
    }

    async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().await;
        let task = inner.tasks.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(project_id) = patch.project_id {
            task.project_id = project_id;
        }
        if let Some(team_id) = patch.team_id {
            task.team_id = team_id;
        }
        if let Some(assigned_to) = patch.assigned_to {
            task.assigned_to = assigned_to;
        }
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = MemStore::new();
        store.create_user(new_user("alice")).await.unwrap();

        let err = store.create_user(new_user("alice")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUsername(_)));
    }

    #[tokio::test]
    async fn test_team_creation_is_atomic_with_owner_membership() {
        let store = MemStore::new();
        let owner = store.create_user(new_user("alice")).await.unwrap();
        let team = store
            .create_team(
                NewTeam {
                    name: "Eng".to_string(),
                    description: None,
                },
                owner.id,
            )
            .await
            .unwrap();

        let members = store.list_members(team.id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user_id, owner.id);
        assert_eq!(members[0].role, TeamRole::Owner);
    }

    #[tokio::test]
    async fn test_delete_team_removes_memberships() {
        let store = MemStore::new();
        let owner = store.create_user(new_user("alice")).await.unwrap();
        let team = store
            .create_team(
                NewTeam {
                    name: "Eng".to_string(),
                    description: None,
                },
                owner.id,
            )
            .await
            .unwrap();

        store.delete_team(team.id).await.unwrap();
        assert!(store.list_members(team.id).await.unwrap().is_empty());
        assert!(store
            .memberships_for_user(owner.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_last_owner_cannot_be_removed() {
        let store = MemStore::new();
        let owner = store.create_user(new_user("alice")).await.unwrap();
        let team = store
            .create_team(
                NewTeam {
                    name: "Eng".to_string(),
                    description: None,
                },
                owner.id,
            )
            .await
            .unwrap();

        let err = store
            .delete_membership(team.id, owner.id)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::LastOwner));

        // State must be unchanged after the failed removal.
        assert_eq!(store.list_members(team.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_second_owner_allows_removal() {
        let store = MemStore::new();
        let alice = store.create_user(new_user("alice")).await.unwrap();
        let bob = store.create_user(new_user("bob")).await.unwrap();
        let team = store
            .create_team(
                NewTeam {
                    name: "Eng".to_string(),
                    description: None,
                },
                alice.id,
            )
            .await
            .unwrap();

        store
            .insert_membership(team.id, bob.id, TeamRole::Owner)
            .await
            .unwrap();
        store.delete_membership(team.id, alice.id).await.unwrap();

        let members = store.list_members(team.id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user_id, bob.id);
    }
}
