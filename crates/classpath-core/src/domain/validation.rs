//! Write-time validation of classpath fields.
//!
//! The hierarchy builder relies on these checks having run before a record
//! was stored and never repeats them.

use thiserror::Error;

use super::{ClasspathUpdate, NewClasspath};

/// Sequences rejected in any user-supplied classpath text.
pub const FORBIDDEN_SEQUENCES: &[&str] = &["<", ">", "&", "'", "\"", "file://", "../"];

/// Field-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Classpath path cannot be empty")]
    EmptyPath,

    #[error("Classpath path has invalid characters")]
    PathWhitespace,

    #[error("Classpath {field} has invalid characters")]
    InvalidCharacters { field: &'static str },

    #[error("Resource identifier cannot be empty")]
    EmptyIdentifier,
}

/// Returns `true` if `s` contains a forbidden sequence.
pub fn is_dangerous(s: &str) -> bool {
    FORBIDDEN_SEQUENCES.iter().any(|seq| s.contains(seq))
}

/// Validate a classpath path.
pub fn validate_path(path: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::EmptyPath);
    }
    if is_dangerous(path) {
        return Err(ValidationError::InvalidCharacters { field: "path" });
    }
    if path.chars().any(char::is_whitespace) {
        return Err(ValidationError::PathWhitespace);
    }
    Ok(())
}

/// Validate a classpath note.
pub fn validate_note(note: &str) -> Result<(), ValidationError> {
    if is_dangerous(note) {
        return Err(ValidationError::InvalidCharacters { field: "note" });
    }
    Ok(())
}

/// Validate a classpath before insert.
pub fn validate_new(classpath: &NewClasspath) -> Result<(), ValidationError> {
    validate_path(&classpath.path)?;
    validate_note(&classpath.note)
}

/// Validate the fields an update would write.
pub fn validate_update(update: &ClasspathUpdate) -> Result<(), ValidationError> {
    if let Some(ref path) = update.path {
        validate_path(path)?;
    }
    if let Some(ref note) = update.note {
        validate_note(note)?;
    }
    Ok(())
}
