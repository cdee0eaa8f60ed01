pub mod extractors;
pub mod middleware;
pub mod password;
pub mod policy;
pub mod service;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::PublicUser;
use crate::validation::{not_blank, EMAIL_REGEX};

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::PasswordHasher;
pub use policy::RegistrationRolePolicy;
pub use service::{AuthService, AuthSession};
pub use token::{Claims, TokenService};

// Request payloads deliberately do not derive `Debug`: they carry plaintext passwords.

/// Represents the payload for a new user registration request.
///
/// Every field is optional at the serde level; `validate` reports all
/// missing or invalid fields together.
#[derive(Default, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name. Must not be blank.
    #[validate(required(message = "Name is required"), custom = "not_blank")]
    pub name: Option<String>,
    /// Must contain exactly one `@` with text on both sides.
    #[validate(
        required(message = "Valid email is required"),
        regex(path = "EMAIL_REGEX", message = "Valid email is required")
    )]
    pub email: Option<String>,
    /// Must be at least 6 characters long. A missing password reports the same.
    #[validate(
        required(message = "Password must be at least 6 characters"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: Option<String>,
    /// Requested role, interpreted by [`RegistrationRolePolicy`].
    pub role: Option<String>,
}

/// Represents the payload for a user login request.
#[derive(Default, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        required(message = "Valid email is required"),
        regex(path = "EMAIL_REGEX", message = "Valid email is required")
    )]
    pub email: Option<String>,
    /// Only presence is checked here; length rules apply at registration.
    #[validate(
        required(message = "Password is required"),
        length(min = 1, message = "Password is required")
    )]
    pub password: Option<String>,
}

/// Response body after successful registration or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: PublicUser,
    /// The JWT for session authentication.
    pub token: String,
}

impl AuthResponse {
    pub fn new(message: &str, session: AuthSession) -> Self {
        Self {
            message: message.to_string(),
            user: session.user,
            token: session.token,
        }
    }
}
