//! Resource link repository trait definition.

use async_trait::async_trait;

use super::RepositoryError;

/// Links between classpaths and monitored resources, by resource identifier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceLinkRepository: Send + Sync {
    /// Number of resources attached to the classpath.
    async fn count_by_classpath(&self, classpath_id: i64) -> Result<i64, RepositoryError>;

    /// Attach one resource. Attaching an already linked resource is a no-op.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if no resource has `ident`.
    async fn attach(&self, classpath_id: i64, ident: &str) -> Result<(), RepositoryError>;

    /// Detach every listed resource from the classpath.
    async fn detach(&self, classpath_id: i64, idents: &[String]) -> Result<(), RepositoryError>;
}
