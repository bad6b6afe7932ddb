//! Composition utilities for building `ClasspathService` with `SQLite`
//! backends.
//!
//! Construction only; no domain logic lives here.

use sqlx::SqlitePool;
use std::sync::Arc;

use classpath_core::{ClasspathRepos, ClasspathService, database_path};

use crate::repositories::{
    SqliteClasspathRepository, SqliteCollectRuleRepository, SqliteResourceLinkRepository,
};
use crate::setup::setup_database;

/// Factory for creating repository instances with `SQLite` backends.
pub struct CoreFactory;

impl CoreFactory {
    /// Create a `SQLite` connection pool from a URL such as
    /// `sqlite:/var/lib/classpath/data/classpath.db`.
    ///
    /// The schema is not applied; use [`setup_database`] for that.
    pub async fn create_pool(db_url: &str) -> anyhow::Result<SqlitePool> {
        let pool = SqlitePool::connect(db_url).await?;
        Ok(pool)
    }

    /// Build all `SQLite` repositories from a pool.
    pub fn build_repos(pool: SqlitePool) -> ClasspathRepos {
        ClasspathRepos::new(
            Arc::new(SqliteClasspathRepository::new(pool.clone())),
            Arc::new(SqliteResourceLinkRepository::new(pool.clone())),
            Arc::new(SqliteCollectRuleRepository::new(pool)),
        )
    }

    /// Build a `ClasspathService` over `SQLite` repositories. Equivalent to:
    ///
    /// ```ignore
    /// let repos = CoreFactory::build_repos(pool);
    /// let service = ClasspathService::new(repos);
    /// ```
    pub fn build_service(pool: SqlitePool) -> ClasspathService {
        ClasspathService::new(Self::build_repos(pool))
    }

    /// Open the database at the default location and build the service.
    ///
    /// The location honours `CLASSPATH_DATA_DIR`.
    pub async fn open_default() -> anyhow::Result<ClasspathService> {
        let db_path = database_path()?;
        let pool = setup_database(&db_path).await?;
        Ok(Self::build_service(pool))
    }
}

/// Test database helper.
///
/// An in-memory database with the production schema, plus seeding helpers
/// for the tables owned by other subsystems.
#[cfg(any(test, feature = "test-utils"))]
pub struct TestDb {
    pool: SqlitePool,
}

#[cfg(any(test, feature = "test-utils"))]
impl TestDb {
    /// Create a new in-memory test database with full schema.
    pub async fn new() -> anyhow::Result<Self> {
        let pool = crate::setup::setup_test_database().await?;
        Ok(Self { pool })
    }

    /// Get the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Service over this database.
    pub fn service(&self) -> ClasspathService {
        CoreFactory::build_service(self.pool.clone())
    }

    /// Create a classpath repository using this test database.
    pub fn classpath_repository(&self) -> SqliteClasspathRepository {
        SqliteClasspathRepository::new(self.pool.clone())
    }

    /// Register a resource so it can be attached.
    pub async fn add_resource(&self, ident: &str) -> anyhow::Result<()> {
        sqlx::query("INSERT INTO resource (ident) VALUES (?)")
            .bind(ident)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Add a collection rule scoped to `classpath_id`.
    pub async fn add_collect_rule(&self, classpath_id: i64, name: &str) -> anyhow::Result<()> {
        sqlx::query("INSERT INTO collect_rule (classpath_id, name, type) VALUES (?, ?, 'host')")
            .bind(classpath_id)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classpath_core::{ClasspathError, ClasspathRepository, DependencyKind, NewClasspath};

    #[tokio::test]
    async fn test_service_over_test_db() {
        let db = TestDb::new().await.unwrap();
        let service = db.service();

        let infra = service.add(NewClasspath::new("infra", "")).await.unwrap();
        db.add_collect_rule(infra.id, "cpu").await.unwrap();

        let err = service.delete(infra.id).await.unwrap_err();
        assert!(matches!(
            err,
            ClasspathError::Dependency(DependencyKind::CollectRules)
        ));
        assert!(service.get(infra.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_seeded_resource_can_be_attached() {
        let db = TestDb::new().await.unwrap();
        db.add_resource("host-a").await.unwrap();
        let service = db.service();

        let infra = service.add(NewClasspath::new("infra", "")).await.unwrap();
        service
            .attach_resources(infra.id, &["host-a".to_string()])
            .await
            .unwrap();

        let (links,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM classpath_resource")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(links, 1);

        let stored = db.classpath_repository();
        assert_eq!(stored.count_by_path("infra").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_pool() {
        let pool = CoreFactory::create_pool("sqlite::memory:").await.unwrap();
        let (one,): (i64,) = sqlx::query_as("SELECT 1").fetch_one(&pool).await.unwrap();
        assert_eq!(one, 1);
    }
}
