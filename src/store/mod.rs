//! Persistence port for identities and tasks.
//!
//! The core only ever talks to these traits; the Postgres adapter backs the
//! running service and the in-memory adapter backs development runs and tests.
//! Stored tasks refer to their owner by id only; listings add the owner's name.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{ListedTask, NewUser, Task, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Which tasks a listing may return. Built from the caller by
/// [`crate::access::list_scope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    All,
    OwnedBy(Uuid),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// `email` must already be normalised.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Persists a new identity. Fails with `AppError::Conflict` if the email is taken.
    async fn insert(&self, user: NewUser) -> Result<User, AppError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert(&self, task: Task) -> Result<Task, AppError>;

    async fn find(&self, id: Uuid) -> Result<Option<Task>, AppError>;

    /// Tasks within `scope`, newest first, each with its owner's name.
    async fn list(&self, scope: TaskScope) -> Result<Vec<ListedTask>, AppError>;

    /// Writes the mutable fields of `task`. Returns `None` if it no longer exists.
    async fn update(&self, task: &Task) -> Result<Option<Task>, AppError>;

    /// Returns whether a task was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}
