//! Who may see and change which task.
//!
//! Admins may act on every task; everyone else only on tasks they own. The
//! same rule covers read, update and delete. Listing applies it as a query
//! scope instead, so a non-admin's listing never contains foreign tasks.

use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::models::Role;
use crate::store::TaskScope;

/// Whether a caller may read, update or delete a task owned by `owner_id`.
pub fn can_access(caller_role: Role, caller_id: Uuid, owner_id: Uuid) -> bool {
    caller_role.is_admin() || caller_id == owner_id
}

/// The listing scope for a caller.
pub fn list_scope(caller: &AuthenticatedUser) -> TaskScope {
    match caller.role {
        Role::Admin => TaskScope::All,
        Role::User => TaskScope::OwnedBy(caller.id),
    }
}
