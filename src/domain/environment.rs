//! Environment resource
//!
//! Deployment targets an application is promoted through. Only permanent
//! environments with automatic promotion participate in generated default
//! workflows.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How releases reach an environment
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize, JsonSchema)]
pub enum PromotionStrategy {
    /// Promoted by the pipeline without human approval
    Automatic,
    /// Promoted on explicit request
    Manual,
    /// Never promoted to
    #[default]
    Never,
}

/// Lifecycle classification of an environment
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize, JsonSchema)]
pub enum EnvironmentKind {
    /// Long-lived deployment target
    #[default]
    Permanent,
    /// Ephemeral preview for a change under review
    Preview,
    /// Developer scratch environment
    Edit,
}

/// A deployment target within the promotion pipeline
#[derive(CustomResource, Clone, Debug, Default, Deserialize, PartialEq, Serialize, JsonSchema)]
#[kube(group = "drydock.dev", version = "v1", kind = "Environment", namespaced)]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSpec {
    /// Human-readable label
    #[serde(default)]
    pub label: String,

    /// Namespace the environment's workloads run in
    #[serde(default)]
    pub namespace: String,

    /// Position within the promotion order; lower promotes first
    #[serde(default)]
    pub order: i32,

    #[serde(default)]
    pub kind: EnvironmentKind,

    #[serde(default)]
    pub promotion_strategy: PromotionStrategy,
}

impl EnvironmentSpec {
    /// Whether this environment contributes a step to generated workflows
    pub fn auto_promoted(&self) -> bool {
        self.promotion_strategy == PromotionStrategy::Automatic
            && self.kind == EnvironmentKind::Permanent
    }
}
