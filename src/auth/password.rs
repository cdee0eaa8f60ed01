use crate::error::AppError;
use bcrypt::{hash, verify};

/// Salted one-way hashing of passwords with a tunable work factor.
///
/// Each digest embeds its own random salt and cost, so two hashes of the same
/// password differ and `verify` needs nothing but the stored digest.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash(password, self.cost)
            .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
    }

    /// Checks `password` against a stored digest. A digest that cannot be
    /// parsed is an internal error, not a mismatch.
    pub fn verify(&self, password: &str, digest: &str) -> Result<bool, AppError> {
        verify(password, digest)
            .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
