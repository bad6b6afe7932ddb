#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod hierarchy;
pub mod paths;
pub mod ports;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::validation::ValidationError;
pub use domain::{
    Classpath, ClasspathFilter, ClasspathNode, ClasspathUpdate, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
    NewClasspath,
};
pub use hierarchy::{HierarchyError, build_tree, direct_children};
pub use paths::{DATA_DIR_ENV, PathError, data_root, database_path};
pub use ports::{
    ClasspathError, ClasspathRepos, ClasspathRepository, CollectRuleRepository, DependencyKind,
    RepositoryError, ResourceLinkRepository,
};
pub use services::ClasspathService;
