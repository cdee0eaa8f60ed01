pub mod task;
pub mod user;

pub use task::{ListedTask, Task, TaskInput, TaskOwner, TaskUpdate};
pub use user::{normalize_email, NewUser, PublicUser, Role, User};
