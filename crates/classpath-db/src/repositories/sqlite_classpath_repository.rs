//! `SQLite` implementation of the `ClasspathRepository` trait.
//!
//! Path matching avoids `LIKE`: it is case-insensitive for ASCII and treats
//! `%` and `_` as wildcards, both of which would break prefix semantics.
//! Prefixes use `substr(path, 1, length(?)) = ?` and substring filters use
//! `instr(path, ?) > 0`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use classpath_core::{
    Classpath, ClasspathFilter, ClasspathRepository, ClasspathUpdate, NewClasspath,
    RepositoryError,
};

use super::row_mappers::{CLASSPATH_SELECT_COLUMNS, map_sqlx_error, row_to_classpath, storage};

/// `SQLite` implementation of the `ClasspathRepository` trait.
pub struct SqliteClasspathRepository {
    pool: SqlitePool,
}

impl SqliteClasspathRepository {
    /// Create a new `SQLite` classpath repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// `LIMIT -1` is unbounded in `SQLite`.
fn limit_of(filter: &ClasspathFilter) -> i64 {
    filter.limit.unwrap_or(-1)
}

#[async_trait]
impl ClasspathRepository for SqliteClasspathRepository {
    async fn insert(
        &self,
        classpath: &NewClasspath,
        now: DateTime<Utc>,
    ) -> Result<Classpath, RepositoryError> {
        let result = sqlx::query(
            r#"INSERT INTO classpath (
                path, note, preset, create_at, create_by, update_at, update_by
            ) VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&classpath.path)
        .bind(&classpath.note)
        .bind(classpath.preset)
        .bind(now.timestamp())
        .bind(&classpath.create_by)
        .bind(now.timestamp())
        .bind(&classpath.create_by)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, &classpath.path))?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("classpath {id}")))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Classpath>, RepositoryError> {
        let query = format!("SELECT {CLASSPATH_SELECT_COLUMNS} FROM classpath WHERE id = ?");

        sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?
            .as_ref()
            .map(row_to_classpath)
            .transpose()
    }

    async fn get_by_path(&self, path: &str) -> Result<Option<Classpath>, RepositoryError> {
        let query = format!("SELECT {CLASSPATH_SELECT_COLUMNS} FROM classpath WHERE path = ?");

        sqlx::query(&query)
            .bind(path)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?
            .as_ref()
            .map(row_to_classpath)
            .transpose()
    }

    async fn count_by_path(&self, path: &str) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM classpath WHERE path = ?")
            .bind(path)
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;
        Ok(count)
    }

    async fn count(&self, filter: &ClasspathFilter) -> Result<i64, RepositoryError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM classpath WHERE (? = '' OR instr(path, ?) > 0)")
                .bind(&filter.query)
                .bind(&filter.query)
                .fetch_one(&self.pool)
                .await
                .map_err(storage)?;
        Ok(count)
    }

    async fn list(&self, filter: &ClasspathFilter) -> Result<Vec<Classpath>, RepositoryError> {
        let query = format!(
            "SELECT {CLASSPATH_SELECT_COLUMNS} FROM classpath \
             WHERE (? = '' OR instr(path, ?) > 0) \
             ORDER BY path LIMIT ? OFFSET ?"
        );

        let rows = sqlx::query(&query)
            .bind(&filter.query)
            .bind(&filter.query)
            .bind(limit_of(filter))
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;

        rows.iter().map(row_to_classpath).collect()
    }

    async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<Classpath>, RepositoryError> {
        let query = format!(
            "SELECT {CLASSPATH_SELECT_COLUMNS} FROM classpath \
             WHERE substr(path, 1, length(?)) = ? ORDER BY path"
        );

        let rows = sqlx::query(&query)
            .bind(prefix)
            .bind(prefix)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;

        rows.iter().map(row_to_classpath).collect()
    }

    async fn update(
        &self,
        id: i64,
        update: &ClasspathUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE classpath SET
                path = COALESCE(?, path),
                note = COALESCE(?, note),
                preset = COALESCE(?, preset),
                update_by = COALESCE(?, update_by),
                update_at = ?
            WHERE id = ?"#,
        )
        .bind(update.path.as_deref())
        .bind(update.note.as_deref())
        .bind(update.preset)
        .bind(update.update_by.as_deref())
        .bind(now.timestamp())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, update.path.as_deref().unwrap_or_default()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("classpath {id}")));
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let favorites = sqlx::query("DELETE FROM classpath_favorite WHERE classpath_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error(e, "classpath_favorite"))?;

        let result = sqlx::query("DELETE FROM classpath WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error(e, "classpath"))?;

        // Dropping `tx` without commit rolls the favorites back.
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("classpath {id}")));
        }

        tx.commit().await.map_err(storage)?;

        debug!(id, favorites = favorites.rows_affected(), "classpath row deleted");
        Ok(())
    }

    async fn add_favorite(&self, id: i64, username: &str) -> Result<(), RepositoryError> {
        sqlx::query("INSERT OR IGNORE INTO classpath_favorite (classpath_id, username) VALUES (?, ?)")
            .bind(id)
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, username))?;
        Ok(())
    }

    async fn remove_favorite(&self, id: i64, username: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM classpath_favorite WHERE classpath_id = ? AND username = ?")
            .bind(id)
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(())
    }

    async fn list_favorites(&self, username: &str) -> Result<Vec<Classpath>, RepositoryError> {
        let query = format!(
            "SELECT {CLASSPATH_SELECT_COLUMNS} FROM classpath \
             WHERE id IN (SELECT classpath_id FROM classpath_favorite WHERE username = ?) \
             ORDER BY path"
        );

        let rows = sqlx::query(&query)
            .bind(username)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;

        rows.iter().map(row_to_classpath).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::setup_test_database;

    async fn repo_with(paths: &[&str]) -> SqliteClasspathRepository {
        let repo = SqliteClasspathRepository::new(setup_test_database().await.unwrap());
        for path in paths {
            repo.insert(&NewClasspath::new(*path, ""), Utc::now())
                .await
                .unwrap();
        }
        repo
    }

    fn paths(records: &[Classpath]) -> Vec<&str> {
        records.iter().map(|r| r.path.as_str()).collect()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = repo_with(&[]).await;
        let now = Utc::now();

        let new = NewClasspath::new("infra", "infrastructure").created_by("alice");
        let created = repo.insert(&new, now).await.unwrap();

        assert!(created.id > 0);
        assert_eq!(created.path, "infra");
        assert_eq!(created.note, "infrastructure");
        assert_eq!(created.create_by, "alice");
        assert_eq!(created.update_by, "alice");
        assert_eq!(created.create_at.timestamp(), now.timestamp());
        assert_eq!(created.create_at, created.update_at);

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        let by_path = repo.get_by_path("infra").await.unwrap().unwrap();
        assert_eq!(by_path.id, created.id);
        assert!(repo.get_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_path_is_already_exists() {
        let repo = repo_with(&["infra"]).await;

        let err = repo
            .insert(&NewClasspath::new("infra", ""), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::AlreadyExists(path) if path == "infra"));
        assert_eq!(repo.count_by_path("infra").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_bytes() {
        let repo = repo_with(&["infraweb", "Infra", "infra", "infra-db", "ops"]).await;

        let all = repo.list(&ClasspathFilter::all()).await.unwrap();
        assert_eq!(
            paths(&all),
            vec!["Infra", "infra", "infra-db", "infraweb", "ops"]
        );
    }

    #[tokio::test]
    async fn test_filter_is_literal_substring() {
        let repo = repo_with(&["a_b", "axb", "a%c", "INFRA", "infra"]).await;

        let hits = repo.list(&ClasspathFilter::matching("_")).await.unwrap();
        assert_eq!(paths(&hits), vec!["a_b"]);

        let hits = repo.list(&ClasspathFilter::matching("infra")).await.unwrap();
        assert_eq!(paths(&hits), vec!["infra"]);

        assert_eq!(repo.count(&ClasspathFilter::matching("a")).await.unwrap(), 4);
        assert_eq!(repo.count(&ClasspathFilter::all()).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_list_pages() {
        let repo = repo_with(&["a", "b", "c", "d", "e"]).await;

        let page = repo
            .list(&ClasspathFilter::all().page(2, 1))
            .await
            .unwrap();
        assert_eq!(paths(&page), vec!["b", "c"]);

        let page = repo
            .list(&ClasspathFilter::all().page(2, 4))
            .await
            .unwrap();
        assert_eq!(paths(&page), vec!["e"]);
    }

    #[tokio::test]
    async fn test_list_by_prefix() {
        let repo = repo_with(&["a", "ab", "abc", "ax", "b", "A", "a%"]).await;

        let hits = repo.list_by_prefix("a").await.unwrap();
        assert_eq!(paths(&hits), vec!["a", "a%", "ab", "abc", "ax"]);

        let hits = repo.list_by_prefix("a%").await.unwrap();
        assert_eq!(paths(&hits), vec!["a%"]);

        assert!(repo.list_by_prefix("zz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_partial() {
        let repo = repo_with(&["infra"]).await;
        let id = repo.get_by_path("infra").await.unwrap().unwrap().id;
        let later = Utc::now() + chrono::Duration::seconds(60);

        let update = ClasspathUpdate {
            note: Some("edited".to_string()),
            update_by: Some("bob".to_string()),
            ..Default::default()
        };
        repo.update(id, &update, later).await.unwrap();

        let cp = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(cp.path, "infra");
        assert_eq!(cp.note, "edited");
        assert_eq!(cp.update_by, "bob");
        assert_eq!(cp.update_at.timestamp(), later.timestamp());
        assert!(cp.create_at < cp.update_at);
    }

    #[tokio::test]
    async fn test_update_missing_and_conflicting() {
        let repo = repo_with(&["a", "b"]).await;

        let err = repo
            .update(999, &ClasspathUpdate::default(), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));

        let id = repo.get_by_path("b").await.unwrap().unwrap().id;
        let update = ClasspathUpdate {
            path: Some("a".to_string()),
            ..Default::default()
        };
        let err = repo.update(id, &update, Utc::now()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_favorites() {
        let repo = repo_with(&["infra", "ops"]).await;
        let infra = repo.get_by_path("infra").await.unwrap().unwrap().id;
        let ops = repo.get_by_path("ops").await.unwrap().unwrap().id;

        repo.add_favorite(infra, "alice").await.unwrap();
        repo.add_favorite(ops, "alice").await.unwrap();

        repo.delete(infra).await.unwrap();

        assert!(repo.get_by_id(infra).await.unwrap().is_none());
        let favorites = repo.list_favorites("alice").await.unwrap();
        assert_eq!(paths(&favorites), vec!["ops"]);

        let err = repo.delete(infra).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_favorites() {
        let repo = repo_with(&["web", "infra"]).await;
        let web = repo.get_by_path("web").await.unwrap().unwrap().id;
        let infra = repo.get_by_path("infra").await.unwrap().unwrap().id;

        repo.add_favorite(web, "alice").await.unwrap();
        repo.add_favorite(web, "alice").await.unwrap();
        repo.add_favorite(infra, "alice").await.unwrap();
        repo.add_favorite(infra, "bob").await.unwrap();

        let favorites = repo.list_favorites("alice").await.unwrap();
        assert_eq!(paths(&favorites), vec!["infra", "web"]);

        repo.remove_favorite(web, "alice").await.unwrap();
        repo.remove_favorite(web, "alice").await.unwrap();
        let favorites = repo.list_favorites("alice").await.unwrap();
        assert_eq!(paths(&favorites), vec!["infra"]);

        assert!(repo.list_favorites("carol").await.unwrap().is_empty());
    }
}
