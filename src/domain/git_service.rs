//! Git service resource and well-known host tables
//!
//! A `GitService` record maps a git host URL to the "git kind" identifying
//! which hosting API dialect the host speaks. At most one record exists per
//! distinct URL within a namespace.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Git kind for GitHub and GitHub Enterprise hosts
pub const KIND_GITHUB: &str = "github";
/// Git kind for GitLab hosts
pub const KIND_GITLAB: &str = "gitlab";
/// Git kind for Bitbucket Cloud
pub const KIND_BITBUCKET_CLOUD: &str = "bitbucketcloud";
/// Git kind for self-hosted Bitbucket Server
pub const KIND_BITBUCKET_SERVER: &str = "bitbucketserver";
/// Git kind for Gitea hosts
pub const KIND_GITEA: &str = "gitea";

/// The platform's default git kind. Hosts of this kind need no record.
pub const DEFAULT_GIT_KIND: &str = KIND_GITHUB;

/// Name prefix of credential secrets carrying git service metadata
pub const SECRET_GIT_CREDENTIALS_PREFIX: &str = "drydock-pipeline-git-";

/// Annotation holding the git host URL on a credential secret
pub const ANNOTATION_URL: &str = "drydock.dev/url";

/// Label holding the git service kind on a credential secret
pub const LABEL_SERVICE_KIND: &str = "drydock.dev/service-kind";

/// Durable mapping from a git host URL to its kind
#[derive(CustomResource, Clone, Debug, Default, Deserialize, PartialEq, Serialize, JsonSchema)]
#[kube(group = "drydock.dev", version = "v1", kind = "GitService", namespaced)]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct GitServiceSpec {
    /// Display name of the service
    pub name: String,
    /// Canonical host URL; unique within a namespace
    pub url: String,
    /// Hosting API dialect, e.g. "gitlab" or "bitbucketserver"
    pub git_kind: String,
}

/// Look up the git kind for a well-known SaaS host URL
///
/// Never consults external state; unknown hosts return `None`.
pub fn saas_git_kind(git_service_url: &str) -> Option<&'static str> {
    match git_service_url.trim_end_matches('/') {
        "https://github.com" => Some(KIND_GITHUB),
        "https://gitlab.com" => Some(KIND_GITLAB),
        "https://bitbucket.org" => Some(KIND_BITBUCKET_CLOUD),
        _ => None,
    }
}
