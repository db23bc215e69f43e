//! Git service resolution and registration
//!
//! Resolution walks a three-tier precedence chain: the static SaaS host
//! table, then credential-secret metadata, then stored GitService records.
//! Registration keeps exactly one record per host URL, creating or updating
//! in place as the kind changes.

use std::io::Write;

use kube::ResourceExt;
use tracing::warn;
use url::Url;

use crate::domain::git_service::{
    saas_git_kind, GitService, GitServiceSpec, ANNOTATION_URL, DEFAULT_GIT_KIND,
    LABEL_SERVICE_KIND, SECRET_GIT_CREDENTIALS_PREFIX,
};
use crate::error::GitServiceError;
use crate::infrastructure::{RecordStore, SecretStore};
use crate::names::to_valid_name_with_dots;

/// Entry points for registering git hosts with the platform
pub struct GitServiceRegistry<'a> {
    services: &'a dyn RecordStore<GitService>,
    secrets: &'a dyn SecretStore,
}

impl<'a> GitServiceRegistry<'a> {
    pub fn new(services: &'a dyn RecordStore<GitService>, secrets: &'a dyn SecretStore) -> Self {
        Self { services, secrets }
    }

    /// Resolve the git kind of a host URL
    ///
    /// Precedence, first success wins: the SaaS host table, credential
    /// secrets in the namespace, stored GitService records. A matched
    /// secret missing its kind label is a hard failure and does not fall
    /// through. A failed secret scan is logged and treated as a miss.
    pub async fn resolve_kind(
        &self,
        namespace: &str,
        service_url: &str,
    ) -> Result<String, GitServiceError> {
        if let Some(kind) = saas_git_kind(service_url) {
            return Ok(kind.to_string());
        }

        match self.kind_from_secrets(namespace, service_url).await {
            Ok(Some(kind)) => return Ok(kind),
            Ok(None) => {}
            Err(GitServiceError::Store(err)) => {
                warn!(
                    "failed to scan credential secrets for '{}': {}",
                    service_url, err
                );
            }
            Err(err) => return Err(err),
        }

        self.kind_from_records(namespace, service_url).await
    }

    async fn kind_from_secrets(
        &self,
        namespace: &str,
        service_url: &str,
    ) -> Result<Option<String>, GitServiceError> {
        let secrets = self.secrets.list(namespace).await?;

        for secret in secrets {
            if !secret.name.starts_with(SECRET_GIT_CREDENTIALS_PREFIX) {
                continue;
            }
            match secret.annotations.get(ANNOTATION_URL) {
                Some(url) if url == service_url => {
                    // First matching secret wins; the store does not
                    // guarantee iteration order.
                    return match secret.labels.get(LABEL_SERVICE_KIND) {
                        Some(kind) => Ok(Some(kind.clone())),
                        None => Err(GitServiceError::MissingKindLabel {
                            secret: secret.name,
                            url: service_url.to_string(),
                        }),
                    };
                }
                _ => {}
            }
        }
        Ok(None)
    }

    async fn kind_from_records(
        &self,
        namespace: &str,
        service_url: &str,
    ) -> Result<String, GitServiceError> {
        let services = self.services.list(namespace).await?;

        for service in services {
            if service.spec.url == service_url {
                return Ok(service.spec.git_kind);
            }
        }
        Err(GitServiceError::KindNotFound {
            url: service_url.to_string(),
        })
    }

    /// Ensure exactly one record maps `url` to `kind`
    ///
    /// A call with an empty kind, the default kind, or an empty URL is a
    /// deliberate no-op: the platform's default host needs no record. When
    /// no name is supplied it is derived from the URL's host. A notice is
    /// written to `out` when an existing record's kind changes.
    ///
    /// Read-modify-write without optimistic locking: two concurrent calls
    /// for the same new URL can both miss the list and race to create, and
    /// the losing create surfaces the store's duplicate error.
    pub async fn ensure_service(
        &self,
        namespace: &str,
        kind: &str,
        name: &str,
        url: &str,
        out: &mut dyn Write,
    ) -> Result<(), GitServiceError> {
        if kind.is_empty() || kind == DEFAULT_GIT_KIND || url.is_empty() {
            return Ok(());
        }

        // A URL match wins over any name match and is updated in place.
        let existing = self.services.list(namespace).await?;
        for mut service in existing {
            if service.spec.url != url {
                continue;
            }
            let old_kind = service.spec.git_kind.clone();
            if old_kind != kind {
                let _ = writeln!(
                    out,
                    "Updating git service {} as the kind has changed from {} to {}",
                    service.name_any(),
                    old_kind,
                    kind
                );
                service.spec.git_kind = kind.to_string();
                self.services
                    .update(namespace, &service)
                    .await
                    .map_err(|source| GitServiceError::UpdateFailed {
                        name: service.name_any(),
                        source,
                    })?;
            }
            return Ok(());
        }

        let display_name = if name.is_empty() {
            url_host(url)?
        } else {
            name.to_string()
        };
        let record_name = to_valid_name_with_dots(&display_name);

        match self.services.get(namespace, &record_name).await {
            Err(err) if err.is_not_found() => {
                let service = GitService::new(
                    &record_name,
                    GitServiceSpec {
                        name: display_name,
                        url: url.to_string(),
                        git_kind: kind.to_string(),
                    },
                );
                self.services
                    .create(namespace, &service)
                    .await
                    .map_err(|source| GitServiceError::CreateFailed {
                        name: record_name,
                        source,
                    })?;
            }
            Err(source) => {
                return Err(GitServiceError::GetFailed {
                    name: record_name,
                    source,
                })
            }
            Ok(mut current) => {
                if current.spec.url != url || current.spec.git_kind != kind {
                    current.spec.url = url.to_string();
                    current.spec.git_kind = kind.to_string();
                    self.services
                        .update(namespace, &current)
                        .await
                        .map_err(|source| GitServiceError::UpdateFailed {
                            name: record_name,
                            source,
                        })?;
                }
            }
        }
        Ok(())
    }
}

/// Host component of a git URL, for name defaulting
fn url_host(url: &str) -> Result<String, GitServiceError> {
    let parsed = Url::parse(url).map_err(|source| GitServiceError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    match parsed.host_str() {
        Some(host) => Ok(host.to_string()),
        None => Err(GitServiceError::MissingHost {
            url: url.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::BTreeMap;

    use crate::domain::git_service::{KIND_GITHUB, KIND_GITLAB};
    use crate::error::StoreError;
    use crate::infrastructure::{CredentialSecret, MemoryRecordStore, MemorySecretStore};

    const NS: &str = "dev";

    struct FailingSecretStore;

    #[async_trait]
    impl SecretStore for FailingSecretStore {
        async fn list(&self, _namespace: &str) -> Result<Vec<CredentialSecret>, StoreError> {
            Err(StoreError::Backend {
                operation: "list".to_string(),
                kind: "Secret".to_string(),
                name: String::new(),
                message: "store unreachable".to_string(),
            })
        }
    }

    fn credential_secret(name: &str, url: &str, kind: Option<&str>) -> CredentialSecret {
        let mut annotations = BTreeMap::new();
        annotations.insert(ANNOTATION_URL.to_string(), url.to_string());
        let mut labels = BTreeMap::new();
        if let Some(kind) = kind {
            labels.insert(LABEL_SERVICE_KIND.to_string(), kind.to_string());
        }
        CredentialSecret {
            name: format!("{}{}", SECRET_GIT_CREDENTIALS_PREFIX, name),
            annotations,
            labels,
        }
    }

    fn service(name: &str, url: &str, kind: &str) -> GitService {
        GitService::new(
            name,
            GitServiceSpec {
                name: name.to_string(),
                url: url.to_string(),
                git_kind: kind.to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_saas_host_short_circuits_both_stores() {
        // Both stores would fail the lookup if consulted: the secret store
        // errors and the record store is empty.
        let services = MemoryRecordStore::new();
        let registry = GitServiceRegistry::new(&services, &FailingSecretStore);

        let kind = registry.resolve_kind(NS, "https://github.com").await.unwrap();
        assert_eq!(kind, KIND_GITHUB);
    }

    #[tokio::test]
    async fn test_resolves_kind_from_secret_annotation() {
        let services = MemoryRecordStore::new();
        let secrets = MemorySecretStore::new();
        secrets.insert(
            NS,
            credential_secret("ent", "https://gitlab.internal", Some(KIND_GITLAB)),
        );
        let registry = GitServiceRegistry::new(&services, &secrets);

        let kind = registry
            .resolve_kind(NS, "https://gitlab.internal")
            .await
            .unwrap();
        assert_eq!(kind, KIND_GITLAB);
    }

    #[tokio::test]
    async fn test_matched_secret_without_kind_label_halts() {
        let services = MemoryRecordStore::new();
        // A stored record also matches; the missing label must win anyway.
        services
            .create(NS, &service("gitlab.internal", "https://gitlab.internal", KIND_GITLAB))
            .await
            .unwrap();

        let secrets = MemorySecretStore::new();
        secrets.insert(NS, credential_secret("ent", "https://gitlab.internal", None));
        let registry = GitServiceRegistry::new(&services, &secrets);

        let err = registry
            .resolve_kind(NS, "https://gitlab.internal")
            .await
            .unwrap_err();
        assert!(matches!(err, GitServiceError::MissingKindLabel { .. }));
    }

    #[tokio::test]
    async fn test_secret_scan_failure_falls_through_to_records() {
        let services = MemoryRecordStore::new();
        services
            .create(NS, &service("gitea.internal", "https://gitea.internal", "gitea"))
            .await
            .unwrap();
        let registry = GitServiceRegistry::new(&services, &FailingSecretStore);

        let kind = registry
            .resolve_kind(NS, "https://gitea.internal")
            .await
            .unwrap();
        assert_eq!(kind, "gitea");
    }

    #[tokio::test]
    async fn test_secrets_without_prefix_are_ignored() {
        let services = MemoryRecordStore::new();
        let secrets = MemorySecretStore::new();
        secrets.insert(
            NS,
            CredentialSecret {
                name: "unrelated-secret".to_string(),
                annotations: BTreeMap::from([(
                    ANNOTATION_URL.to_string(),
                    "https://gitlab.internal".to_string(),
                )]),
                labels: BTreeMap::from([(
                    LABEL_SERVICE_KIND.to_string(),
                    KIND_GITLAB.to_string(),
                )]),
            },
        );
        let registry = GitServiceRegistry::new(&services, &secrets);

        let err = registry
            .resolve_kind(NS, "https://gitlab.internal")
            .await
            .unwrap_err();
        assert!(matches!(err, GitServiceError::KindNotFound { .. }));
    }

    #[tokio::test]
    async fn test_no_source_yields_kind_not_found() {
        let services = MemoryRecordStore::new();
        let secrets = MemorySecretStore::new();
        let registry = GitServiceRegistry::new(&services, &secrets);

        let err = registry
            .resolve_kind(NS, "https://github.example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, GitServiceError::KindNotFound { .. }));
    }

    #[tokio::test]
    async fn test_first_matching_secret_wins() {
        // Two secrets match the URL with different kinds. The store does
        // not guarantee iteration order, so either kind is acceptable;
        // what matters is that one wins and no error is raised.
        let services = MemoryRecordStore::new();
        let secrets = MemorySecretStore::new();
        secrets.insert(
            NS,
            credential_secret("a", "https://git.internal", Some("gitea")),
        );
        secrets.insert(
            NS,
            credential_secret("b", "https://git.internal", Some(KIND_GITLAB)),
        );
        let registry = GitServiceRegistry::new(&services, &secrets);

        let kind = registry.resolve_kind(NS, "https://git.internal").await.unwrap();
        assert!(kind == "gitea" || kind == KIND_GITLAB);
    }

    #[tokio::test]
    async fn test_ensure_is_a_noop_for_default_kind_and_empty_inputs() {
        let services = MemoryRecordStore::new();
        let secrets = MemorySecretStore::new();
        let registry = GitServiceRegistry::new(&services, &secrets);
        let mut out = Vec::new();

        registry
            .ensure_service(NS, "", "name", "https://git.internal", &mut out)
            .await
            .unwrap();
        registry
            .ensure_service(NS, DEFAULT_GIT_KIND, "name", "https://github.com", &mut out)
            .await
            .unwrap();
        registry
            .ensure_service(NS, KIND_GITLAB, "name", "", &mut out)
            .await
            .unwrap();

        assert!(services.list(NS).await.unwrap().is_empty());
        assert_eq!(services.write_count(), 0);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_ensure_creates_record_named_from_host() {
        let services = MemoryRecordStore::new();
        let secrets = MemorySecretStore::new();
        let registry = GitServiceRegistry::new(&services, &secrets);
        let mut out = Vec::new();

        registry
            .ensure_service(NS, "github-ent", "", "https://github.example.com", &mut out)
            .await
            .unwrap();

        let record = services.get(NS, "github.example.com").await.unwrap();
        assert_eq!(record.spec.name, "github.example.com");
        assert_eq!(record.spec.url, "https://github.example.com");
        assert_eq!(record.spec.git_kind, "github-ent");
    }

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let services = MemoryRecordStore::new();
        let secrets = MemorySecretStore::new();
        let registry = GitServiceRegistry::new(&services, &secrets);
        let mut out = Vec::new();

        registry
            .ensure_service(NS, KIND_GITLAB, "ent", "https://gitlab.internal", &mut out)
            .await
            .unwrap();
        assert_eq!(services.write_count(), 1);

        registry
            .ensure_service(NS, KIND_GITLAB, "ent", "https://gitlab.internal", &mut out)
            .await
            .unwrap();

        assert_eq!(services.list(NS).await.unwrap().len(), 1);
        assert_eq!(services.write_count(), 1);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_ensure_updates_kind_and_emits_notice() {
        let services = MemoryRecordStore::new();
        services
            .create(NS, &service("ent", "https://git.internal", "gitea"))
            .await
            .unwrap();
        let secrets = MemorySecretStore::new();
        let registry = GitServiceRegistry::new(&services, &secrets);
        let mut out = Vec::new();

        registry
            .ensure_service(NS, KIND_GITLAB, "other-name", "https://git.internal", &mut out)
            .await
            .unwrap();

        let record = services.get(NS, "ent").await.unwrap();
        assert_eq!(record.spec.git_kind, KIND_GITLAB);
        // Name and URL are untouched by a kind update.
        assert_eq!(record.spec.url, "https://git.internal");
        assert_eq!(services.list(NS).await.unwrap().len(), 1);

        let notice = String::from_utf8(out).unwrap();
        assert!(notice.contains("gitea"));
        assert!(notice.contains(KIND_GITLAB));
    }

    #[tokio::test]
    async fn test_url_match_wins_when_two_records_share_a_url() {
        let services = MemoryRecordStore::new();
        services
            .create(NS, &service("a-svc", "https://git.internal", "gitea"))
            .await
            .unwrap();
        services
            .create(NS, &service("b-svc", "https://git.internal", "gitea"))
            .await
            .unwrap();
        let secrets = MemorySecretStore::new();
        let registry = GitServiceRegistry::new(&services, &secrets);
        let mut out = Vec::new();

        registry
            .ensure_service(NS, KIND_GITLAB, "", "https://git.internal", &mut out)
            .await
            .unwrap();

        let updated: Vec<_> = services
            .list(NS)
            .await
            .unwrap()
            .into_iter()
            .filter(|s| s.spec.git_kind == KIND_GITLAB)
            .collect();
        assert_eq!(updated.len(), 1);
    }

    #[tokio::test]
    async fn test_ensure_repoints_existing_name_to_new_url() {
        let services = MemoryRecordStore::new();
        services
            .create(NS, &service("ent", "https://old.internal", "gitea"))
            .await
            .unwrap();
        let secrets = MemorySecretStore::new();
        let registry = GitServiceRegistry::new(&services, &secrets);
        let mut out = Vec::new();

        registry
            .ensure_service(NS, KIND_GITLAB, "ent", "https://new.internal", &mut out)
            .await
            .unwrap();

        let record = services.get(NS, "ent").await.unwrap();
        assert_eq!(record.spec.url, "https://new.internal");
        assert_eq!(record.spec.git_kind, KIND_GITLAB);
        assert_eq!(services.list(NS).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ensure_rejects_unparseable_url_when_name_missing() {
        let services = MemoryRecordStore::new();
        let secrets = MemorySecretStore::new();
        let registry = GitServiceRegistry::new(&services, &secrets);
        let mut out = Vec::new();

        let err = registry
            .ensure_service(NS, KIND_GITLAB, "", "://not-a-url", &mut out)
            .await
            .unwrap_err();
        assert!(matches!(err, GitServiceError::InvalidUrl { .. }));

        let err = registry
            .ensure_service(NS, KIND_GITLAB, "", "mailto:dev@example.com", &mut out)
            .await
            .unwrap_err();
        assert!(matches!(err, GitServiceError::MissingHost { .. }));
    }
}
