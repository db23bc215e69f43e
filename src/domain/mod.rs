//! Domain layer - resource types and well-known constants
//!
//! Custom resource definitions for git services, environments and workflows,
//! plus the static tables the resolution logic is built on. No external I/O.

pub mod environment;
pub mod git_service;
pub mod workflow;

// Re-export commonly used types
pub use environment::{Environment, EnvironmentKind, EnvironmentSpec, PromotionStrategy};
pub use git_service::{GitService, GitServiceSpec, DEFAULT_GIT_KIND};
pub use workflow::{
    PromoteWorkflowStep, Workflow, WorkflowSpec, WorkflowStep, WorkflowStepKind,
    DEFAULT_WORKFLOW_NAME,
};
