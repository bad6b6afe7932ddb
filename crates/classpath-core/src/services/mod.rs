//! Core services - the application's business logic layer.
//!
//! Services here are pure orchestrators over the port traits - they don't
//! know about concrete implementations.

mod classpath_service;

pub use classpath_service::ClasspathService;
