//! Core domain types.
//!
//! These types represent the pure domain model, independent of any
//! infrastructure concerns (database, transport, etc.).
//!
//! # Structure
//!
//! - `classpath` - Stored records, write inputs and the derived tree node
//! - `validation` - Write-time checks on paths and notes

mod classpath;
pub mod validation;

pub use classpath::{
    Classpath, ClasspathFilter, ClasspathNode, ClasspathUpdate, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
    NewClasspath,
};
