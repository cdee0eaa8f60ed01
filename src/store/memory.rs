use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{TaskScope, TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{ListedTask, NewUser, Task, User};

/// Process-local store. Data lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    // Insertion order doubles as the tie-breaker for equal timestamps.
    tasks: RwLock<Vec<Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        // Check and insert under one write lock, like the unique index would.
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(AppError::Conflict("Email already registered".into()));
        }
        let user = User::new(user);
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert(&self, task: Task) -> Result<Task, AppError> {
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().find(|task| task.id == id).cloned())
    }

    async fn list(&self, scope: TaskScope) -> Result<Vec<ListedTask>, AppError> {
        let tasks = self.tasks.read().await;
        let users = self.users.read().await;
        // Tasks whose owner is unknown are skipped, as the inner join would.
        let mut listed: Vec<ListedTask> = tasks
            .iter()
            .rev()
            .filter(|task| match scope {
                TaskScope::All => true,
                TaskScope::OwnedBy(owner) => task.owner_id == owner,
            })
            .filter_map(|task| {
                let owner = users.get(&task.owner_id)?;
                Some(ListedTask::new(task.clone(), owner.name.clone()))
            })
            .collect();
        // Stable, so equal timestamps keep newest-inserted first.
        listed.sort_by(|a, b| b.task.created_at.cmp(&a.task.created_at));
        Ok(listed)
    }

    async fn update(&self, task: &Task) -> Result<Option<Task>, AppError> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks.iter_mut().find(|stored| stored.id == task.id).map(|stored| {
            stored.title = task.title.clone();
            stored.description = task.description.clone();
            stored.completed = task.completed;
            stored.updated_at = task.updated_at;
            stored.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        Ok(tasks.len() != before)
    }
}
