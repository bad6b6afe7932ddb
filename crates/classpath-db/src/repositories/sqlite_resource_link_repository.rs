//! `SQLite` implementation of the `ResourceLinkRepository` trait.

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use classpath_core::{RepositoryError, ResourceLinkRepository};

use super::row_mappers::{map_sqlx_error, storage};

/// Links rows in `classpath_resource` to identifiers in `resource`.
pub struct SqliteResourceLinkRepository {
    pool: SqlitePool,
}

impl SqliteResourceLinkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceLinkRepository for SqliteResourceLinkRepository {
    async fn count_by_classpath(&self, classpath_id: i64) -> Result<i64, RepositoryError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM classpath_resource WHERE classpath_id = ?")
                .bind(classpath_id)
                .fetch_one(&self.pool)
                .await
                .map_err(storage)?;
        Ok(count)
    }

    async fn attach(&self, classpath_id: i64, ident: &str) -> Result<(), RepositoryError> {
        let (known,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM resource WHERE ident = ?")
            .bind(ident)
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;
        if known == 0 {
            return Err(RepositoryError::NotFound(format!("resource {ident}")));
        }

        sqlx::query(
            "INSERT OR IGNORE INTO classpath_resource (classpath_id, res_ident) VALUES (?, ?)",
        )
        .bind(classpath_id)
        .bind(ident)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, ident))?;

        Ok(())
    }

    async fn detach(&self, classpath_id: i64, idents: &[String]) -> Result<(), RepositoryError> {
        if idents.is_empty() {
            return Ok(());
        }

        let mut builder =
            QueryBuilder::<Sqlite>::new("DELETE FROM classpath_resource WHERE classpath_id = ");
        builder.push_bind(classpath_id).push(" AND res_ident IN (");
        let mut separated = builder.separated(", ");
        for ident in idents {
            separated.push_bind(ident.as_str());
        }
        separated.push_unseparated(")");

        builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::setup_test_database;

    async fn setup() -> (SqlitePool, i64) {
        let pool = setup_test_database().await.unwrap();
        for ident in ["host-a", "host-b", "host-c"] {
            sqlx::query("INSERT INTO resource (ident) VALUES (?)")
                .bind(ident)
                .execute(&pool)
                .await
                .unwrap();
        }
        let id = sqlx::query(
            "INSERT INTO classpath (path, create_at, update_at) VALUES ('infra', 0, 0)",
        )
        .execute(&pool)
        .await
        .unwrap()
        .last_insert_rowid();
        (pool, id)
    }

    #[tokio::test]
    async fn test_attach_count_detach() {
        let (pool, id) = setup().await;
        let repo = SqliteResourceLinkRepository::new(pool);

        repo.attach(id, "host-a").await.unwrap();
        repo.attach(id, "host-b").await.unwrap();
        repo.attach(id, "host-b").await.unwrap();
        assert_eq!(repo.count_by_classpath(id).await.unwrap(), 2);

        repo.detach(id, &["host-b".to_string(), "host-c".to_string()])
            .await
            .unwrap();
        assert_eq!(repo.count_by_classpath(id).await.unwrap(), 1);

        repo.detach(id, &[]).await.unwrap();
        assert_eq!(repo.count_by_classpath(id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_attach_unknown_resource() {
        let (pool, id) = setup().await;
        let repo = SqliteResourceLinkRepository::new(pool);

        let err = repo.attach(id, "host-z").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(what) if what == "resource host-z"));
        assert_eq!(repo.count_by_classpath(id).await.unwrap(), 0);
    }
}
