use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{TaskScope, TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{ListedTask, NewUser, Task, User};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at";
const TASK_COLUMNS: &str = "id, title, description, completed, owner_id, created_at, updated_at";

/// A task row joined with its owner's name.
#[derive(FromRow)]
struct ListedTaskRow {
    #[sqlx(flatten)]
    task: Task,
    owner_name: String,
}

/// PostgreSQL-backed store. Schema lives in `migrations/`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects and applies any pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPool::connect(database_url).await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Migration failed: {}", e)))?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let user = User::new(user);
        // A unique violation on email surfaces as AppError::Conflict.
        let stored = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, name, email, password_hash, role, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(stored)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert(&self, task: Task) -> Result<Task, AppError> {
        let stored = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (id, title, description, completed, owner_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(task.owner_id)
        .bind(task.created_at)
        .bind(task.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(stored)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn list(&self, scope: TaskScope) -> Result<Vec<ListedTask>, AppError> {
        let owner = match scope {
            TaskScope::All => None,
            TaskScope::OwnedBy(owner) => Some(owner),
        };
        let rows = sqlx::query_as::<_, ListedTaskRow>(
            "SELECT t.id, t.title, t.description, t.completed, t.owner_id,
                    t.created_at, t.updated_at, u.name AS owner_name
             FROM tasks t
             JOIN users u ON u.id = t.owner_id
             WHERE ($1::uuid IS NULL OR t.owner_id = $1)
             ORDER BY t.created_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|row| ListedTask::new(row.task, row.owner_name))
            .collect())
    }

    async fn update(&self, task: &Task) -> Result<Option<Task>, AppError> {
        let updated = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks
             SET title = $1, description = $2, completed = $3, updated_at = $4
             WHERE id = $5
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(task.updated_at)
        .bind(task.id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
