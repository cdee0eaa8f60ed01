use crate::models::Role;

/// Decides which role a new registration receives.
///
/// Self-registration as `admin` is a deliberate, configurable choice here
/// (`ALLOW_ADMIN_REGISTRATION`) rather than a side effect of parsing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationRolePolicy {
    /// Grants `admin` when the request asks for exactly `"admin"`; anything else is `user`.
    SelfDeclared,
    /// Every registration is `user`, whatever was requested.
    UsersOnly,
}

impl RegistrationRolePolicy {
    pub fn from_config(allow_admin_registration: bool) -> Self {
        if allow_admin_registration {
            RegistrationRolePolicy::SelfDeclared
        } else {
            RegistrationRolePolicy::UsersOnly
        }
    }

    pub fn resolve(self, requested: Option<&str>) -> Role {
        match (self, requested) {
            (RegistrationRolePolicy::SelfDeclared, Some("admin")) => Role::Admin,
            _ => Role::User,
        }
    }
}
