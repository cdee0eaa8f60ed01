//! Field rules shared by the request payloads.

use lazy_static::lazy_static;
use validator::ValidationError;

lazy_static! {
    /// Exactly one `@`, with something on either side of it.
    pub static ref EMAIL_REGEX: regex::Regex = regex::Regex::new(r"^[^@]+@[^@]+$").unwrap();
}

/// Rejects values that are empty once surrounding whitespace is removed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
