//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `sqlx` types in any signature
//! - Repositories are CRUD-focused; validation and dependency checks belong
//!   in `ClasspathService`
//! - Every list is ordered by path, which the hierarchy builder relies on

pub mod classpath_error;
pub mod classpath_repository;
pub mod collect_rules;
pub mod resource_links;

use std::sync::Arc;
use thiserror::Error;

pub use classpath_error::{ClasspathError, DependencyKind};
pub use classpath_repository::ClasspathRepository;
pub use collect_rules::CollectRuleRepository;
pub use resource_links::ResourceLinkRepository;

/// Container for all repository trait objects.
///
/// Adapters build this once at startup and hand it to `ClasspathService`;
/// the core never opens or owns a storage handle itself.
///
/// # Example
///
/// ```ignore
/// // In classpath-db factory:
/// let repos = CoreFactory::build_repos(pool);
/// let service = ClasspathService::new(repos);
/// ```
#[derive(Clone)]
pub struct ClasspathRepos {
    /// Classpath records and their favorites.
    pub classpaths: Arc<dyn ClasspathRepository>,
    /// Links between classpaths and monitored resources.
    pub resources: Arc<dyn ResourceLinkRepository>,
    /// Collection rules scoped to a classpath.
    pub collect_rules: Arc<dyn CollectRuleRepository>,
}

impl ClasspathRepos {
    /// Create a new repository container.
    pub fn new(
        classpaths: Arc<dyn ClasspathRepository>,
        resources: Arc<dyn ResourceLinkRepository>,
        collect_rules: Arc<dyn CollectRuleRepository>,
    ) -> Self {
        Self {
            classpaths,
            resources,
            collect_rules,
        }
    }
}

/// Domain-specific errors for repository operations.
///
/// This error type abstracts away storage implementation details (e.g., sqlx errors)
/// and provides a clean interface for services to handle storage failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An entity with the same identifier already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Storage backend error (database, filesystem, etc.).
    #[error("Storage error: {0}")]
    Storage(String),

    /// A constraint was violated (e.g., foreign key).
    #[error("Constraint violation: {0}")]
    Constraint(String),
}
