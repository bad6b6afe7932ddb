//! Classpath service error types.

use thiserror::Error;

use crate::domain::validation::ValidationError;

/// What still references a classpath that was asked to be deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    Resources,
    CollectRules,
}

impl DependencyKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Resources => "resources",
            Self::CollectRules => "collect rules",
        }
    }
}

impl std::fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors returned by `ClasspathService`.
///
/// Storage failures are logged where they happen and surface only as
/// `Internal`, without backend detail. Every other variant is meant for the
/// caller.
#[derive(Debug, Error)]
pub enum ClasspathError {
    /// Input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A classpath with the same path already exists.
    #[error("Classpath {0} already exists")]
    Conflict(String),

    /// Delete refused because something still references the classpath.
    #[error("There are still {0} under the classpath")]
    Dependency(DependencyKind),

    /// The classpath (or a referenced resource) does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage or internal failure. Details are in the logs.
    #[error("Internal server error")]
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_message_names_blocker() {
        let err = ClasspathError::Dependency(DependencyKind::CollectRules);
        assert_eq!(
            err.to_string(),
            "There are still collect rules under the classpath"
        );
    }

    #[test]
    fn test_internal_hides_detail() {
        assert_eq!(ClasspathError::Internal.to_string(), "Internal server error");
    }

    #[test]
    fn test_validation_is_verbatim() {
        let err = ClasspathError::from(ValidationError::PathWhitespace);
        assert_eq!(err.to_string(), "Classpath path has invalid characters");
    }
}
