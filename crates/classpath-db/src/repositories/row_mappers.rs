//! Row mapping helpers for `SQLite` queries.

use chrono::{DateTime, Utc};
use classpath_core::{Classpath, RepositoryError};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

/// Shared SELECT column list for classpath queries.
pub const CLASSPATH_SELECT_COLUMNS: &str =
    "id, path, note, preset, create_at, create_by, update_at, update_by";

/// Convert stored unix seconds back into a timestamp.
pub fn from_unix_seconds(secs: i64) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| RepositoryError::Storage(format!("timestamp out of range: {secs}")))
}

/// Parse a database row into a Classpath.
pub fn row_to_classpath(row: &SqliteRow) -> Result<Classpath, RepositoryError> {
    let create_at: i64 = row.try_get("create_at").map_err(storage)?;
    let update_at: i64 = row.try_get("update_at").map_err(storage)?;

    Ok(Classpath {
        id: row.try_get("id").map_err(storage)?,
        path: row.try_get("path").map_err(storage)?,
        note: row.try_get("note").map_err(storage)?,
        preset: row.try_get("preset").map_err(storage)?,
        create_at: from_unix_seconds(create_at)?,
        create_by: row.try_get("create_by").map_err(storage)?,
        update_at: from_unix_seconds(update_at)?,
        update_by: row.try_get("update_by").map_err(storage)?,
    })
}

/// Map a driver error, reporting constraint violations by kind.
///
/// `subject` names what was being written and ends up in
/// `AlreadyExists` for unique violations.
pub fn map_sqlx_error(err: sqlx::Error, subject: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db) = err {
        if db.is_unique_violation() {
            return RepositoryError::AlreadyExists(subject.to_string());
        }
        if db.is_foreign_key_violation() || db.is_check_violation() {
            return RepositoryError::Constraint(db.message().to_string());
        }
    }
    RepositoryError::Storage(err.to_string())
}

/// Plain storage error for failures that carry no constraint meaning.
pub fn storage(err: sqlx::Error) -> RepositoryError {
    RepositoryError::Storage(err.to_string())
}
