//! `SQLite` implementation of the `CollectRuleRepository` trait.

use async_trait::async_trait;
use sqlx::SqlitePool;

use classpath_core::{CollectRuleRepository, RepositoryError};

use super::row_mappers::storage;

/// Read-only view of `collect_rule` for dependency checks.
pub struct SqliteCollectRuleRepository {
    pool: SqlitePool,
}

impl SqliteCollectRuleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CollectRuleRepository for SqliteCollectRuleRepository {
    async fn count_by_classpath(&self, classpath_id: i64) -> Result<i64, RepositoryError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM collect_rule WHERE classpath_id = ?")
                .bind(classpath_id)
                .fetch_one(&self.pool)
                .await
                .map_err(storage)?;
        Ok(count)
    }
}
