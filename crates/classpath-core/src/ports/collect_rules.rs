//! Collection rule repository trait definition.
//!
//! Rules are managed elsewhere; the classpath core only needs to know
//! whether any still point at a classpath.

use async_trait::async_trait;

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectRuleRepository: Send + Sync {
    /// Number of collection rules scoped to the classpath.
    async fn count_by_classpath(&self, classpath_id: i64) -> Result<i64, RepositoryError>;
}
