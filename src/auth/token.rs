use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ConfigError;
use crate::error::AppError;
use crate::models::Role;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the identity id.
    pub sub: Uuid,
    /// Role at the time the token was issued.
    pub role: Role,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiration, seconds since epoch.
    pub exp: i64,
}

/// Issues and verifies HS256 session tokens.
///
/// Verification is self-contained: a token is accepted for its whole lifetime
/// on the strength of its signature alone, so role changes or removed accounts
/// only take effect once the holder gets a new token.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Builds the service around the process-wide signing secret.
    ///
    /// A blank secret is rejected here as well as in [`crate::config::Config`],
    /// so the service can never be constructed in a state that signs with an empty key.
    pub fn new(secret: &str, lifetime: Duration) -> Result<Self, ConfigError> {
        if secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }

        // Expiry is checked against our own clock in `verify_at`.
        let mut validation = Validation::default();
        validation.validate_exp = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime,
        })
    }

    /// Issues a token for `user_id` expiring one lifetime from now.
    pub fn issue(&self, user_id: Uuid, role: Role) -> Result<String, AppError> {
        self.issue_at(user_id, role, Utc::now())
    }

    pub fn issue_at(&self, user_id: Uuid, role: Role, now: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id,
            role,
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies signature and expiry and returns the embedded claims.
    ///
    /// Returns `AppError::Unauthorized` if the token is malformed, its signature
    /// is invalid, or it has expired.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        self.verify_at(token, Utc::now())
    }

    /// Like [`verify`](Self::verify), judged at `now`. A token is valid strictly
    /// before its `exp` instant.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;

        if now.timestamp() >= claims.exp {
            return Err(AppError::Unauthorized("Token expired".into()));
        }
        Ok(claims)
    }
}
