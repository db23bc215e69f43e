//! Workflow lookup and defaulting
//!
//! A requested workflow is served from the store when present. Only the
//! distinguished default name is synthesized on a miss, from the
//! automatically promoted permanent environments in promotion order.

use crate::domain::{Workflow, WorkflowStep, DEFAULT_WORKFLOW_NAME};
use crate::error::StoreError;
use crate::infrastructure::{EnvironmentSource, RecordStore};

/// Serves workflows by name, deriving the default when absent
pub struct WorkflowDefaulter<'a> {
    workflows: &'a dyn RecordStore<Workflow>,
    environments: &'a dyn EnvironmentSource,
}

impl<'a> WorkflowDefaulter<'a> {
    pub fn new(
        workflows: &'a dyn RecordStore<Workflow>,
        environments: &'a dyn EnvironmentSource,
    ) -> Self {
        Self {
            workflows,
            environments,
        }
    }

    /// Return the workflow with the given name; an empty name means the
    /// default workflow
    ///
    /// A miss for a non-default name is returned unchanged, error included.
    /// A miss for the default name synthesizes a sequential promote step
    /// per automatically promoted permanent environment, in promotion
    /// order. The synthesized workflow is not persisted; that is the
    /// caller's call.
    pub async fn get_workflow(&self, name: &str, namespace: &str) -> Result<Workflow, StoreError> {
        let name = if name.is_empty() {
            DEFAULT_WORKFLOW_NAME
        } else {
            name
        };

        match self.workflows.get(namespace, name).await {
            Ok(workflow) => return Ok(workflow),
            Err(err) if name != DEFAULT_WORKFLOW_NAME => return Err(err),
            Err(_) => {}
        }

        let (environments, names) = self.environments.ordered_environments(namespace).await?;

        let mut steps = Vec::new();
        for env_name in &names {
            if let Some(environment) = environments.get(env_name) {
                if environment.spec.auto_promoted() {
                    steps.push(WorkflowStep::promote(env_name, false));
                }
            }
        }

        Ok(Workflow::named(namespace, DEFAULT_WORKFLOW_NAME, steps))
    }
}
