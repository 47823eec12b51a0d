/// Project operations
///
/// Every operation on an existing project fetches it first and asks
/// the gate for a decision against the actor; a project the actor did
/// not create is indistinguishable from one that does not exist.

use tracing::info;
use uuid::Uuid;

use crate::authz::{decide, Action, Actor, Target};
use crate::error::{CoreError, CoreResult};
use crate::models::{NewProject, Project, ProjectPatch};
use crate::store::Store;

/// Input accepted at the project creation boundary
#[derive(Debug, Clone)]
pub struct ProjectInput {
    pub name: String,
    pub description: Option<String>,
    pub team_id: Option<Uuid>,
}

/// Project operations over an injected store
pub struct ProjectService<'a> {
    store: &'a dyn Store,
}

impl<'a> ProjectService<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Creates a project owned by the actor
    pub async fn create(&self, actor: &Actor, input: ProjectInput) -> CoreResult<Project> {
        if input.name.trim().is_empty() {
            return Err(CoreError::validation("name", "must not be empty"));
        }

        decide(
            Some(actor),
            Action::Create,
            Target::Owned {
                owner_id: actor.user_id,
            },
        )
        .authorize()?;

        let project = self
            .store
            .create_project(NewProject {
                name: input.name,
                description: input.description,
                user_id: actor.user_id,
                team_id: input.team_id,
            })
            .await?;

        info!(project_id = %project.id, "project created");
        Ok(project)
    }

    /// Lists the actor's projects
    pub async fn list(&self, actor: &Actor) -> CoreResult<Vec<Project>> {
        decide(
            Some(actor),
            Action::Read,
            Target::Owned {
                owner_id: actor.user_id,
            },
        )
        .authorize()?;

        Ok(self.store.projects_for_user(actor.user_id).await?)
    }

    /// Fetches a project the actor created
    pub async fn get(&self, actor: &Actor, id: Uuid) -> CoreResult<Project> {
        let project = self
            .store
            .find_project(id)
            .await?
            .ok_or(CoreError::NotFound)?;

        decide(
            Some(actor),
            Action::Read,
            Target::Owned {
                owner_id: project.user_id,
            },
        )
        .authorize()?;

        Ok(project)
    }

    /// Merges the provided fields into a project the actor created
    ///
    /// `id` and `user_id` are never touched by an update.
    pub async fn update(&self, actor: &Actor, id: Uuid, patch: ProjectPatch) -> CoreResult<Project> {
        let project = self
            .store
            .find_project(id)
            .await?
            .ok_or(CoreError::NotFound)?;

        decide(
            Some(actor),
            Action::Update,
            Target::Owned {
                owner_id: project.user_id,
            },
        )
        .authorize()?;

        if patch.is_empty() {
            return Ok(project);
        }

        Ok(self.store.update_project(id, patch).await?)
    }

    /// Deletes a project the actor created
    pub async fn delete(&self, actor: &Actor, id: Uuid) -> CoreResult<()> {
        let project = self
            .store
            .find_project(id)
            .await?
            .ok_or(CoreError::NotFound)?;

        decide(
            Some(actor),
            Action::Delete,
            Target::Owned {
                owner_id: project.user_id,
            },
        )
        .authorize()?;

        self.store.delete_project(id).await?;
        info!(project_id = %id, "project deleted");
        Ok(())
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

    fn input(name: &str) -> ProjectInput {
        ProjectInput {
            name: name.to_string(),
            description: None,
            team_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_stamps_creator() {
        let store = MemStore::new();
        let service = ProjectService::new(&store);
        let me = user(&store, "me").await;

        let project = service.create(&me, input("Website")).await.unwrap();
        assert_eq!(project.user_id, me.user_id);
    }

    #[tokio::test]
    async fn test_foreign_project_is_not_found() {
        let store = MemStore::new();
        let service = ProjectService::new(&store);

        let owner = user(&store, "owner").await;
        let other = user(&store, "other").await;

        let project = service.create(&owner, input("Website")).await.unwrap();

        // Read, update, and delete by a non-owner all collapse to the
        // missing-resource answer.
        assert!(matches!(
            service.get(&other, project.id).await.unwrap_err(),
            CoreError::NotFound
        ));
        assert!(matches!(
            service
                .update(
                    &other,
                    project.id,
                    ProjectPatch {
                        name: Some("Hijacked".to_string()),
                        ..Default::default()
                    }
                )
                .await
                .unwrap_err(),
            CoreError::NotFound
        ));
        assert!(matches!(
            service.delete(&other, project.id).await.unwrap_err(),
            CoreError::NotFound
        ));

        // Unchanged.
        let fetched = service.get(&owner, project.id).await.unwrap();
        assert_eq!(fetched.name, "Website");
    }

    #[tokio::test]
    async fn test_list_is_creator_scoped() {
        let store = MemStore::new();
        let service = ProjectService::new(&store);

        let a = user(&store, "a").await;
        let b = user(&store, "b").await;

        service.create(&a, input("A1")).await.unwrap();
        service.create(&a, input("A2")).await.unwrap();
        service.create(&b, input("B1")).await.unwrap();

        assert_eq!(service.list(&a).await.unwrap().len(), 2);
        assert_eq!(service.list(&b).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_merges_only_provided_fields() {
        let store = MemStore::new();
        let service = ProjectService::new(&store);
        let me = user(&store, "me").await;

        let project = service
            .create(
                &me,
                ProjectInput {
                    name: "Website".to_string(),
                    description: Some("v1".to_string()),
                    team_id: None,
                },
            )
            .await
            .unwrap();

        let updated = service
            .update(
                &me,
                project.id,
                ProjectPatch {
                    name: Some("Website v2".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Website v2");
        assert_eq!(updated.description.as_deref(), Some("v1"));
        assert_eq!(updated.user_id, me.user_id);
    }
}
