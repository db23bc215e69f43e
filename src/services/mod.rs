//! Services layer - reconciliation logic
//!
//! Coordinates the domain types with the record store adapters. Every
//! routine here is a pure function of its stores and inputs; no state is
//! held between calls.

pub mod environments;
pub mod git_services;
pub mod workflows;

// Re-export commonly used types
pub use environments::StoredEnvironmentSource;
pub use git_services::GitServiceRegistry;
pub use workflows::WorkflowDefaulter;
