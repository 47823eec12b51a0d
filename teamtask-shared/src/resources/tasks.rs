/// Task operations
///
/// Same ownership shape as projects, plus boundary validation of the
/// closed `priority` enum and due-date normalization. `completed` is
/// never accepted at creation; it starts `false` and is only settable
/// through update.

use tracing::info;
use uuid::Uuid;

use crate::authz::{decide, Action, Actor, Target};
use crate::error::{CoreError, CoreResult};
use crate::models::{DueDateInput, NewTask, Task, TaskPatch, TaskPriority};
use crate::store::Store;

/// Input accepted at the task creation boundary
#[derive(Debug, Clone, Default)]
pub struct TaskInput {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DueDateInput>,
    pub priority: Option<TaskPriority>,
    pub project_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
}

/// Task operations over an injected store
pub struct TaskService<'a> {
    store: &'a dyn Store,
}

impl<'a> TaskService<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Creates a task owned by the actor
    ///
    /// Applies defaults: `completed = false`, `priority = medium` when
    /// unset. The due date normalizes to a single internal timestamp.
    pub async fn create(&self, actor: &Actor, input: TaskInput) -> CoreResult<Task> {
        if input.title.trim().is_empty() {
            return Err(CoreError::validation("title", "must not be empty"));
        }

        let due_date = input.due_date.map(DueDateInput::resolve).transpose()?;

        decide(
            Some(actor),
            Action::Create,
            Target::Owned {
                owner_id: actor.user_id,
            },
        )
        .authorize()?;

        let task = self
            .store
            .create_task(NewTask {
                title: input.title,
                description: input.description,
                due_date,
                priority: input.priority.unwrap_or_default(),
                user_id: actor.user_id,
                project_id: input.project_id,
                team_id: input.team_id,
                assigned_to: input.assigned_to,
            })
            .await?;

        info!(task_id = %task.id, "task created");
        Ok(task)
    }

    /// Lists the actor's tasks
    pub async fn list(&self, actor: &Actor) -> CoreResult<Vec<Task>> {
        decide(
            Some(actor),
            Action::Read,
            Target::Owned {
                owner_id: actor.user_id,
            },
        )
        .authorize()?;

        Ok(self.store.tasks_for_user(actor.user_id).await?)
    }

    /// Fetches a task the actor created
    pub async fn get(&self, actor: &Actor, id: Uuid) -> CoreResult<Task> {
        let task = self.store.find_task(id).await?.ok_or(CoreError::NotFound)?;

        decide(
            Some(actor),
            Action::Read,
            Target::Owned {
                owner_id: task.user_id,
            },
        )
        .authorize()?;

        Ok(task)
    }

    /// Merges the provided fields into a task the actor created
    ///
    /// `id` and `user_id` are never touched by an update.
    pub async fn update(&self, actor: &Actor, id: Uuid, patch: TaskPatch) -> CoreResult<Task> {
        let task = self.store.find_task(id).await?.ok_or(CoreError::NotFound)?;

        decide(
            Some(actor),
            Action::Update,
            Target::Owned {
                owner_id: task.user_id,
            },
        )
        .authorize()?;

        if patch.is_empty() {
            return Ok(task);
        }

        Ok(self.store.update_task(id, patch).await?)
    }

    /// Deletes a task the actor created
    pub async fn delete(&self, actor: &Actor, id: Uuid) -> CoreResult<()> {
        let task = self.store.find_task(id).await?.ok_or(CoreError::NotFound)?;

        decide(
            Some(actor),
            Action::Delete,
            Target::Owned {
                owner_id: task.user_id,
            },
        )
        .authorize()?;

        self.store.delete_task(id).await?;
        info!(task_id = %id, "task deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
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

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let store = MemStore::new();
        let service = TaskService::new(&store);
        let me = user(&store, "me").await;

        let task = service
            .create(
                &me,
                TaskInput {
                    title: "Write docs".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(!task.completed);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.user_id, me.user_id);
    }

    #[tokio::test]
    async fn test_due_date_normalizes_from_millis() {
        let store = MemStore::new();
        let service = TaskService::new(&store);
        let me = user(&store, "me").await;

        let task = service
            .create(
                &me,
                TaskInput {
                    title: "Ship v1".to_string(),
                    due_date: Some(DueDateInput::Millis(1714521600000)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(
            task.due_date,
            Some(Utc.timestamp_millis_opt(1714521600000).unwrap())
        );
    }

    #[tokio::test]
    async fn test_invalid_due_date_persists_nothing() {
        let store = MemStore::new();
        let service = TaskService::new(&store);
        let me = user(&store, "me").await;

        let err = service
            .create(
                &me,
                TaskInput {
                    title: "Broken".to_string(),
                    due_date: Some(DueDateInput::Millis(i64::MAX)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Validation(_)));
        assert!(service.list(&me).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_completion_flow_with_denied_foreign_update() {
        let store = MemStore::new();
        let service = TaskService::new(&store);

        let u1 = user(&store, "u1").await;
        let u2 = user(&store, "u2").await;

        let task = service
            .create(
                &u1,
                TaskInput {
                    title: "Ship v1".to_string(),
                    priority: Some(TaskPriority::High),
                    due_date: Some(DueDateInput::Timestamp(
                        Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
                    )),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!task.completed);

        let updated = service
            .update(
                &u1,
                task.id,
                TaskPatch {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.completed);

        // A non-owner's attempt is denied and has no effect.
        let err = service
            .update(
                &u2,
                task.id,
                TaskPatch {
                    completed: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound));

        let fetched = service.get(&u1, task.id).await.unwrap();
        assert!(fetched.completed);
    }

    #[tokio::test]
    async fn test_delete_foreign_task_denied() {
        let store = MemStore::new();
        let service = TaskService::new(&store);

        let owner = user(&store, "owner").await;
        let other = user(&store, "other").await;

        let task = service
            .create(
                &owner,
                TaskInput {
                    title: "Mine".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = service.delete(&other, task.id).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound));
        assert!(service.get(&owner, task.id).await.is_ok());
    }
}
