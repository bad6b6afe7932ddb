//! Classpath repository trait definition.
//!
//! This port is the path store: flat classpath records plus the per-user
//! favorites that reference them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::RepositoryError;
use crate::domain::{Classpath, ClasspathFilter, ClasspathUpdate, NewClasspath};

/// Repository for classpath persistence operations.
///
/// # Design Rules
///
/// - Every method returning several classpaths orders them by `path`
///   ascending, byte-wise
/// - `path` is unique; implementations should enforce it in storage too and
///   report violations as `RepositoryError::AlreadyExists`
/// - `delete` removes the record and its favorites atomically
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClasspathRepository: Send + Sync {
    /// Insert a new classpath stamped with `now` as creation and update time.
    ///
    /// Returns the persisted classpath with its assigned ID.
    async fn insert(
        &self,
        classpath: &NewClasspath,
        now: DateTime<Utc>,
    ) -> Result<Classpath, RepositoryError>;

    /// Get a classpath by its ID.
    async fn get_by_id(&self, id: i64) -> Result<Option<Classpath>, RepositoryError>;

    /// Get a classpath by its exact path.
    async fn get_by_path(&self, path: &str) -> Result<Option<Classpath>, RepositoryError>;

    /// Count classpaths whose path equals `path`.
    async fn count_by_path(&self, path: &str) -> Result<i64, RepositoryError>;

    /// Count classpaths matching the filter's query. Paging is ignored.
    async fn count(&self, filter: &ClasspathFilter) -> Result<i64, RepositoryError>;

    /// List classpaths matching the filter, ordered by path.
    async fn list(&self, filter: &ClasspathFilter) -> Result<Vec<Classpath>, RepositoryError>;

    /// List every classpath whose path starts with `prefix` (including the
    /// exact match), ordered by path.
    async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<Classpath>, RepositoryError>;

    /// Write the fields present in `update` and stamp `now` as update time.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if the classpath doesn't exist.
    async fn update(
        &self,
        id: i64,
        update: &ClasspathUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;

    /// Delete a classpath and its favorites in one transaction.
    ///
    /// Either both are removed or neither is.
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// Bookmark a classpath for `username`. Idempotent.
    async fn add_favorite(&self, id: i64, username: &str) -> Result<(), RepositoryError>;

    /// Remove a bookmark. Removing a missing bookmark is not an error.
    async fn remove_favorite(&self, id: i64, username: &str) -> Result<(), RepositoryError>;

    /// Classpaths bookmarked by `username`, ordered by path.
    async fn list_favorites(&self, username: &str) -> Result<Vec<Classpath>, RepositoryError>;
}
