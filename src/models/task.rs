use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validation::not_blank;

/// Input structure for creating a task.
///
/// Fields are optional at the serde level so a missing title is reported as
/// a validation message rather than a deserialisation failure.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task. Required and non-blank.
    #[validate(required, custom = "not_blank")]
    pub title: Option<String>,

    /// An optional description for the task.
    pub description: Option<String>,
}

/// Partial update of a task. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TaskUpdate {
    /// When present, must be non-blank.
    #[validate(custom = "not_blank")]
    pub title: Option<String>,

    /// `None` leaves the description alone, `Some(None)` (an explicit `null`) clears it.
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,

    pub completed: Option<bool>,
}

/// Distinguishes an explicit `null` from an absent field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Represents a task entity as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    /// Identity that created the task. Set once, never changed.
    pub owner_id: Uuid,
    /// Listing order key, newest first.
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The owning identity as shown next to a listed task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOwner {
    pub id: Uuid,
    pub name: String,
}

/// A task as returned by a listing: the stored fields plus its owner's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListedTask {
    #[serde(flatten)]
    pub task: Task,
    pub owner: TaskOwner,
}

impl ListedTask {
    pub fn new(task: Task, owner_name: String) -> Self {
        let owner = TaskOwner {
            id: task.owner_id,
            name: owner_name,
        };
        Self { task, owner }
    }
}

impl Task {
    /// Creates a new task owned by `owner_id` from an already validated input.
    pub fn new(title: &str, description: Option<String>, owner_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.trim().to_string(),
            description,
            completed: false,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies an already validated partial update in place.
    pub fn apply(&mut self, update: TaskUpdate) {
        if let Some(title) = update.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
        self.updated_at = Utc::now();
    }
}
