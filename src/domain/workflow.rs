//! Workflow resource
//!
//! An ordered sequence of promotion steps. Step order is execution order.
//! Steps are immutable value objects once constructed.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::names::to_valid_name;

/// Workflow name used when no explicit workflow is requested
pub const DEFAULT_WORKFLOW_NAME: &str = "default";

/// Discriminator for workflow step payloads
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize, JsonSchema)]
pub enum WorkflowStepKind {
    #[default]
    Promote,
}

/// Promotion payload of a workflow step
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromoteWorkflowStep {
    /// Environment the release is promoted to
    pub environment: String,
    /// Whether this step may run concurrently with its siblings
    pub parallel: bool,
}

/// One step of a promotion workflow
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub kind: WorkflowStepKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promote: Option<PromoteWorkflowStep>,
}

impl WorkflowStep {
    /// Create a promote step for the given environment
    pub fn promote(environment: &str, parallel: bool) -> Self {
        WorkflowStep {
            kind: WorkflowStepKind::Promote,
            name: format!("step-promote-{}", environment),
            promote: Some(PromoteWorkflowStep {
                environment: environment.to_string(),
                parallel,
            }),
        }
    }
}

/// A promotion pipeline through a set of environments
#[derive(CustomResource, Clone, Debug, Default, Deserialize, PartialEq, Serialize, JsonSchema)]
#[kube(group = "drydock.dev", version = "v1", kind = "Workflow", namespaced)]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSpec {
    /// Steps in execution order
    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
}

impl Workflow {
    /// Construct a workflow value with a sanitized name
    pub fn named(namespace: &str, name: &str, steps: Vec<WorkflowStep>) -> Self {
        let mut workflow = Workflow::new(&to_valid_name(name), WorkflowSpec { steps });
        workflow.metadata.namespace = Some(namespace.to_string());
        workflow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::ResourceExt;

    #[test]
    fn test_promote_step_shape() {
        let step = WorkflowStep::promote("staging", false);

        assert_eq!(step.kind, WorkflowStepKind::Promote);
        assert_eq!(step.name, "step-promote-staging");
        let promote = step.promote.expect("promote payload");
        assert_eq!(promote.environment, "staging");
        assert!(!promote.parallel);
    }

    #[test]
    fn test_named_sanitizes_and_scopes() {
        let workflow = Workflow::named("deploy", "My Workflow", vec![]);

        assert_eq!(workflow.name_any(), "my-workflow");
        assert_eq!(workflow.namespace().as_deref(), Some("deploy"));
        assert!(workflow.spec.steps.is_empty());
    }
}
