//! Registration and login.
//!
//! Both flows validate their payload, talk to the [`UserStore`] and end by
//! issuing a session token. Hashing runs on the blocking pool so a slow bcrypt
//! round never stalls the actix workers.

use std::sync::Arc;

use tokio::sync::OnceCell;
use validator::Validate;

use crate::auth::password::PasswordHasher;
use crate::auth::policy::RegistrationRolePolicy;
use crate::auth::token::TokenService;
use crate::auth::{LoginRequest, RegisterRequest};
use crate::error::AppError;
use crate::models::{normalize_email, NewUser, PublicUser};
use crate::store::UserStore;

/// The outcome of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: PublicUser,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenService>,
    role_policy: RegistrationRolePolicy,
    // Verified against when the email is unknown, so both login failures cost one bcrypt round.
    dummy_digest: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        tokens: Arc<TokenService>,
        role_policy: RegistrationRolePolicy,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            role_policy,
            dummy_digest: Arc::new(OnceCell::new()),
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<AuthSession, AppError> {
        request.validate()?;

        // Presence is guaranteed by `validate`.
        let name = request.name.unwrap_or_default();
        let email = normalize_email(&request.email.unwrap_or_default());
        let password = request.password.unwrap_or_default();

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".into()));
        }

        let hasher = self.hasher;
        let password_hash = run_blocking(move || hasher.hash(&password)).await?;

        let user = self
            .users
            .insert(NewUser {
                name: name.trim().to_string(),
                email,
                password_hash,
                role: self.role_policy.resolve(request.role.as_deref()),
            })
            .await?;
        log::info!("registered user {} with role {:?}", user.id, user.role);

        let token = self.tokens.issue(user.id, user.role)?;
        Ok(AuthSession {
            user: PublicUser::from(&user),
            token,
        })
    }

    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthSession, AppError> {
        request.validate()?;

        let email = normalize_email(&request.email.unwrap_or_default());
        let password = request.password.unwrap_or_default();

        let user = self.users.find_by_email(&email).await?;
        let digest = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.dummy_digest().await?,
        };

        let hasher = self.hasher;
        let matches = run_blocking(move || hasher.verify(&password, &digest)).await?;
        let user = match user {
            Some(user) if matches => user,
            Some(user) => {
                log::debug!("login rejected for user {}: password mismatch", user.id);
                return Err(AppError::InvalidCredentials);
            }
            None => {
                log::debug!("login rejected: no such account");
                return Err(AppError::InvalidCredentials);
            }
        };

        log::info!("user {} logged in", user.id);
        let token = self.tokens.issue(user.id, user.role)?;
        Ok(AuthSession {
            user: PublicUser::from(&user),
            token,
        })
    }

    /// A digest of a throwaway password at the configured cost, hashed once on first use.
    async fn dummy_digest(&self) -> Result<String, AppError> {
        let hasher = self.hasher;
        let digest = self
            .dummy_digest
            .get_or_try_init(|| run_blocking(move || hasher.hash("no-such-account")))
            .await?;
        Ok(digest.clone())
    }
}

async fn run_blocking<T, F>(job: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Blocking task failed: {}", e)))?
}
