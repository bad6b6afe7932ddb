//! Path utilities for the classpath data directory.
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - The environment is read only by the thin public wrappers; resolution
//!   itself is pure so it can be tested without touching process state

mod database;
mod error;

pub use database::{DATABASE_FILE_NAME, database_path, database_path_in};
pub use error::PathError;

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the data root.
pub const DATA_DIR_ENV: &str = "CLASSPATH_DATA_DIR";

/// Get the root directory for application data.
///
/// Resolution order:
/// 1. `CLASSPATH_DATA_DIR` environment variable
/// 2. System data directory (e.g., `~/.local/share/classpath`)
pub fn data_root() -> Result<PathBuf, PathError> {
    resolve_data_root(env::var(DATA_DIR_ENV).ok().as_deref())
}

/// Resolve the data root from an optional override value.
pub fn resolve_data_root(override_dir: Option<&str>) -> Result<PathBuf, PathError> {
    if let Some(raw) = override_dir {
        return expand_user_path(raw);
    }

    let data_dir = dirs::data_local_dir().ok_or(PathError::NoDataDir)?;
    Ok(data_dir.join("classpath"))
}

/// Expand a leading `~` and make the path absolute.
fn expand_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let expanded = if trimmed == "~" {
        dirs::home_dir().ok_or(PathError::NoHomeDir)?
    } else if let Some(rest) = trimmed.strip_prefix("~/") {
        dirs::home_dir().ok_or(PathError::NoHomeDir)?.join(rest)
    } else {
        PathBuf::from(trimmed)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(expanded))
            .map_err(|e| PathError::CurrentDirError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let root = resolve_data_root(Some("/srv/classpath")).unwrap();
        assert_eq!(root, PathBuf::from("/srv/classpath"));
    }

    #[test]
    fn test_relative_override_is_absolutized() {
        let root = resolve_data_root(Some("data-dir")).unwrap();
        assert!(root.is_absolute());
        assert!(root.ends_with("data-dir"));
    }

    #[test]
    fn test_blank_override_rejected() {
        assert!(matches!(
            resolve_data_root(Some("   ")),
            Err(PathError::EmptyPath)
        ));
    }
}
