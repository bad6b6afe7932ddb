//! Database path resolution.

use std::fs;
use std::path::{Path, PathBuf};

use super::data_root;
use super::error::PathError;

/// File name of the `SQLite` database inside `<data root>/data`.
pub const DATABASE_FILE_NAME: &str = "classpath.db";

/// Get the path to the classpath database file.
///
/// The `data/` subdirectory is created if it doesn't exist.
pub fn database_path() -> Result<PathBuf, PathError> {
    database_path_in(&data_root()?)
}

/// Database path below an explicit data root, creating `data/` as needed.
pub fn database_path_in(root: &Path) -> Result<PathBuf, PathError> {
    let data_dir = root.join("data");

    fs::create_dir_all(&data_dir).map_err(|e| PathError::CreateFailed {
        path: data_dir.clone(),
        reason: e.to_string(),
    })?;

    Ok(data_dir.join(DATABASE_FILE_NAME))
}
