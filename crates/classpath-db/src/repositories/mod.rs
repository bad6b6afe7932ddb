//! Repository implementations using `SQLite`.
//!
//! These implementations encapsulate all SQL queries and database access.
//! The `SqlitePool` is confined to this module and never exposed through
//! the port trait signatures.

mod row_mappers;
mod sqlite_classpath_repository;
mod sqlite_collect_rule_repository;
mod sqlite_resource_link_repository;

pub use sqlite_classpath_repository::SqliteClasspathRepository;
pub use sqlite_collect_rule_repository::SqliteCollectRuleRepository;
pub use sqlite_resource_link_repository::SqliteResourceLinkRepository;
