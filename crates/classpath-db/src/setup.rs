//! Database setup and initialization.
//!
//! `setup_database()` opens the `SQLite` file and applies the schema. Entry
//! points call it with the path from `classpath_core::database_path()`.

use anyhow::Result;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::path::Path;
use tracing::debug;

/// Opens (creating if needed) the `SQLite` database at `db_path` and ensures
/// the schema exists.
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The database file cannot be opened or created
/// - Schema creation fails
///
/// # Example
///
/// ```rust,no_run
/// use classpath_db::setup_database;
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// let pool = setup_database(Path::new("/var/lib/classpath/data/classpath.db")).await?;
/// # Ok(())
/// # }
/// ```
pub async fn setup_database(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let pool = SqlitePool::connect_with(
        SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .foreign_keys(true),
    )
    .await?;

    create_schema(&pool).await?;
    debug!(path = %db_path.display(), "classpath database ready");

    Ok(pool)
}

/// Sets up an in-memory `SQLite` database for testing.
///
/// Every connection to `sqlite::memory:` sees its own empty database, so the
/// pool is pinned to a single connection that is never recycled.
#[cfg(any(test, feature = "test-utils"))]
pub async fn setup_test_database() -> Result<SqlitePool> {
    use sqlx::sqlite::SqlitePoolOptions;

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(
            SqliteConnectOptions::new()
                .in_memory(true)
                .foreign_keys(true),
        )
        .await?;
    create_schema(&pool).await?;
    Ok(pool)
}

/// Creates the complete database schema.
///
/// Safe to call repeatedly; every statement uses IF NOT EXISTS.
async fn create_schema(pool: &SqlitePool) -> Result<()> {
    // Paths use the default BINARY collation so ORDER BY path agrees with
    // byte-wise `str` ordering.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS classpath (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            path TEXT NOT NULL UNIQUE,
            note TEXT NOT NULL DEFAULT '',
            preset INTEGER NOT NULL DEFAULT 0,
            create_at INTEGER NOT NULL,
            create_by TEXT NOT NULL DEFAULT '',
            update_at INTEGER NOT NULL,
            update_by TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS classpath_favorite (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            classpath_id INTEGER NOT NULL,
            username TEXT NOT NULL,
            FOREIGN KEY (classpath_id) REFERENCES classpath(id),
            UNIQUE(classpath_id, username)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_classpath_favorite_user ON classpath_favorite(username)",
    )
    .execute(pool)
    .await?;

    // Resources are registered by the monitoring side; only the identifier
    // matters here.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS resource (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            ident TEXT NOT NULL UNIQUE,
            note TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS classpath_resource (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            classpath_id INTEGER NOT NULL,
            res_ident TEXT NOT NULL,
            FOREIGN KEY (classpath_id) REFERENCES classpath(id),
            UNIQUE(classpath_id, res_ident)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS collect_rule (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            classpath_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            data TEXT NOT NULL DEFAULT '{}',
            create_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
            FOREIGN KEY (classpath_id) REFERENCES classpath(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_collect_rule_classpath ON collect_rule(classpath_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
