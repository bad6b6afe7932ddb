//! Classpath service - orchestrates classpath operations.
//!
//! Validation, uniqueness and dependency checks live here; storage goes
//! through the injected ports and tree reconstruction through
//! [`crate::hierarchy`]. The service keeps no state between calls.

use std::fmt::Display;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::domain::validation::{self, ValidationError};
use crate::domain::{Classpath, ClasspathFilter, ClasspathNode, ClasspathUpdate, NewClasspath};
use crate::hierarchy::{self, HierarchyError};
use crate::ports::{ClasspathError, ClasspathRepos, DependencyKind, RepositoryError};

/// Service for classpath operations.
pub struct ClasspathService {
    repos: ClasspathRepos,
}

/// Map a repository error to the service error, logging storage failures
/// once with the failing operation and its identifying argument.
fn repo_error(
    operation: &'static str,
    subject: impl Display,
    err: RepositoryError,
) -> ClasspathError {
    match err {
        RepositoryError::NotFound(what) => ClasspathError::NotFound(what),
        RepositoryError::AlreadyExists(what) => ClasspathError::Conflict(what),
        RepositoryError::Storage(_) | RepositoryError::Constraint(_) => {
            error!(operation, subject = %subject, error = %err, "classpath store failure");
            ClasspathError::Internal
        }
    }
}

fn hierarchy_error(
    operation: &'static str,
    subject: impl Display,
    err: &HierarchyError,
) -> ClasspathError {
    error!(operation, subject = %subject, error = %err, "classpath hierarchy rebuild failed");
    ClasspathError::Internal
}

impl ClasspathService {
    /// Create a new classpath service over the given repositories.
    pub fn new(repos: ClasspathRepos) -> Self {
        Self { repos }
    }

    /// Add a new classpath.
    ///
    /// The path must be valid and unused. Creation and update time are set
    /// to now and the creator is recorded as the last updater.
    pub async fn add(&self, classpath: NewClasspath) -> Result<Classpath, ClasspathError> {
        validation::validate_new(&classpath)?;

        let existing = self
            .repos
            .classpaths
            .count_by_path(&classpath.path)
            .await
            .map_err(|e| repo_error("count classpath", &classpath.path, e))?;
        if existing > 0 {
            warn!(path = %classpath.path, "classpath already exists");
            return Err(ClasspathError::Conflict(classpath.path));
        }

        let created = self
            .repos
            .classpaths
            .insert(&classpath, Utc::now())
            .await
            .map_err(|e| repo_error("insert classpath", &classpath.path, e))?;

        info!(id = created.id, path = %created.path, "classpath added");
        Ok(created)
    }

    /// Update the fields present in `update`.
    ///
    /// Moving a classpath onto a path another record already uses is a
    /// conflict. An update without fields leaves the record, including its
    /// update time, untouched.
    pub async fn update(&self, id: i64, update: ClasspathUpdate) -> Result<(), ClasspathError> {
        if update.is_empty() {
            self.require(id).await?;
            debug!(id, "empty classpath update ignored");
            return Ok(());
        }

        validation::validate_update(&update)?;

        if let Some(ref path) = update.path {
            let holder = self
                .repos
                .classpaths
                .get_by_path(path)
                .await
                .map_err(|e| repo_error("query classpath", path, e))?;
            if holder.is_some_and(|other| other.id != id) {
                warn!(id, path = %path, "classpath path already taken");
                return Err(ClasspathError::Conflict(path.clone()));
            }
        }

        self.repos
            .classpaths
            .update(id, &update, Utc::now())
            .await
            .map_err(|e| repo_error("update classpath", format_args!("id={id}"), e))?;

        info!(id, "classpath updated");
        Ok(())
    }

    /// Delete a classpath.
    ///
    /// Refused while any resource or collection rule still references it.
    /// The checks run before the delete transaction, so a reference added in
    /// between is not detected.
    pub async fn delete(&self, id: i64) -> Result<(), ClasspathError> {
        self.require(id).await?;

        let resources = self
            .repos
            .resources
            .count_by_classpath(id)
            .await
            .map_err(|e| repo_error("count classpath resources", format_args!("id={id}"), e))?;
        if resources > 0 {
            warn!(id, resources, "classpath delete refused");
            return Err(ClasspathError::Dependency(DependencyKind::Resources));
        }

        let rules = self
            .repos
            .collect_rules
            .count_by_classpath(id)
            .await
            .map_err(|e| repo_error("count collect rules", format_args!("id={id}"), e))?;
        if rules > 0 {
            warn!(id, rules, "classpath delete refused");
            return Err(ClasspathError::Dependency(DependencyKind::CollectRules));
        }

        self.repos
            .classpaths
            .delete(id)
            .await
            .map_err(|e| repo_error("delete classpath", format_args!("id={id}"), e))?;

        info!(id, "classpath deleted");
        Ok(())
    }

    /// Get a classpath by ID.
    pub async fn get(&self, id: i64) -> Result<Option<Classpath>, ClasspathError> {
        self.repos
            .classpaths
            .get_by_id(id)
            .await
            .map_err(|e| repo_error("query classpath", format_args!("id={id}"), e))
    }

    /// Get a classpath by its exact path.
    pub async fn get_by_path(&self, path: &str) -> Result<Option<Classpath>, ClasspathError> {
        self.repos
            .classpaths
            .get_by_path(path)
            .await
            .map_err(|e| repo_error("query classpath", path, e))
    }

    /// List classpaths matching `filter`, ordered by path.
    pub async fn list(&self, filter: &ClasspathFilter) -> Result<Vec<Classpath>, ClasspathError> {
        debug!(
            query = %filter.query,
            limit = ?filter.limit,
            offset = filter.offset,
            "listing classpaths"
        );
        self.repos
            .classpaths
            .list(filter)
            .await
            .map_err(|e| repo_error("query classpath", &filter.query, e))
    }

    /// List every classpath, ordered by path.
    pub async fn list_all(&self) -> Result<Vec<Classpath>, ClasspathError> {
        self.list(&ClasspathFilter::all()).await
    }

    /// Number of classpaths whose path contains `query`.
    pub async fn total(&self, query: &str) -> Result<i64, ClasspathError> {
        self.repos
            .classpaths
            .count(&ClasspathFilter::matching(query))
            .await
            .map_err(|e| repo_error("count classpath", query, e))
    }

    /// Rebuild the hierarchy of the classpaths whose path contains `query`.
    pub async fn get_tree(&self, query: &str) -> Result<Vec<ClasspathNode>, ClasspathError> {
        let records = self.list(&ClasspathFilter::matching(query)).await?;
        debug!(query, records = records.len(), "building classpath tree");
        hierarchy::build_tree(&records).map_err(|e| hierarchy_error("build tree", query, &e))
    }

    /// Immediate children of the classpath at `path`, each carrying only the
    /// part of its path below `path`.
    pub async fn get_direct_children(&self, path: &str) -> Result<Vec<Classpath>, ClasspathError> {
        let records = self
            .repos
            .classpaths
            .list_by_prefix(path)
            .await
            .map_err(|e| repo_error("query prefix classpath", path, e))?;
        hierarchy::direct_children(&records, path)
            .map_err(|e| hierarchy_error("direct children", path, &e))
    }

    /// Attach resources by identifier.
    ///
    /// Identifiers are trimmed and attached in order; the first failure
    /// stops the operation and is returned. Earlier attachments stay.
    pub async fn attach_resources(
        &self,
        id: i64,
        idents: &[String],
    ) -> Result<(), ClasspathError> {
        self.require(id).await?;

        for ident in idents {
            let ident = ident.trim();
            if ident.is_empty() {
                return Err(ValidationError::EmptyIdentifier.into());
            }
            self.repos
                .resources
                .attach(id, ident)
                .await
                .map_err(|e| {
                    repo_error("attach resource", format_args!("id={id} ident={ident}"), e)
                })?;
        }

        info!(id, count = idents.len(), "resources attached");
        Ok(())
    }

    /// Detach resources by identifier.
    pub async fn detach_resources(
        &self,
        id: i64,
        idents: &[String],
    ) -> Result<(), ClasspathError> {
        self.repos
            .resources
            .detach(id, idents)
            .await
            .map_err(|e| repo_error("detach resources", format_args!("id={id}"), e))?;

        info!(id, count = idents.len(), "resources detached");
        Ok(())
    }

    /// Bookmark a classpath for `username`.
    pub async fn add_favorite(&self, id: i64, username: &str) -> Result<(), ClasspathError> {
        self.require(id).await?;
        self.repos
            .classpaths
            .add_favorite(id, username)
            .await
            .map_err(|e| {
                repo_error("add classpath favorite", format_args!("id={id} user={username}"), e)
            })
    }

    /// Remove a bookmark.
    pub async fn remove_favorite(&self, id: i64, username: &str) -> Result<(), ClasspathError> {
        self.repos
            .classpaths
            .remove_favorite(id, username)
            .await
            .map_err(|e| {
                repo_error("delete classpath favorite", format_args!("id={id} user={username}"), e)
            })
    }

    /// Classpaths bookmarked by `username`, ordered by path.
    pub async fn list_favorites(&self, username: &str) -> Result<Vec<Classpath>, ClasspathError> {
        self.repos
            .classpaths
            .list_favorites(username)
            .await
            .map_err(|e| repo_error("query classpath favorites", username, e))
    }

    async fn require(&self, id: i64) -> Result<Classpath, ClasspathError> {
        self.get(id)
            .await?
            .ok_or_else(|| ClasspathError::NotFound(format!("classpath {id}")))
    }
}
