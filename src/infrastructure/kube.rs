//! Kubernetes-backed record stores
//!
//! Each call builds a namespaced `Api` and performs a single round trip;
//! nothing is cached between calls. Updates rely on the resourceVersion
//! carried by records previously read from the store.

use std::fmt::Debug;
use std::marker::PhantomData;

use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::NamespaceResourceScope;
use kube::api::{Api, ListParams, PostParams};
use kube::{Client, Config, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::store::{CredentialSecret, RecordStore, SecretStore};
use crate::error::StoreError;

/// Create Kubernetes client
pub async fn create_client() -> Result<Client> {
    let config = Config::infer()
        .await
        .context("Failed to infer kubeconfig")?;

    Client::try_from(config).context("Failed to create Kubernetes client")
}

fn record_kind<R>() -> String
where
    R: Resource,
    R::DynamicType: Default,
{
    R::kind(&R::DynamicType::default()).into_owned()
}

fn map_kube_error(
    err: kube::Error,
    operation: &str,
    kind: &str,
    namespace: &str,
    name: &str,
) -> StoreError {
    match err {
        kube::Error::Api(api) if api.code == 404 => StoreError::NotFound {
            kind: kind.to_string(),
            namespace: namespace.to_string(),
            name: name.to_string(),
        },
        kube::Error::Api(api) if api.code == 409 => StoreError::AlreadyExists {
            kind: kind.to_string(),
            namespace: namespace.to_string(),
            name: name.to_string(),
        },
        other => StoreError::Backend {
            operation: operation.to_string(),
            kind: kind.to_string(),
            name: name.to_string(),
            message: other.to_string(),
        },
    }
}

/// Record store over namespaced Kubernetes resources
pub struct KubeRecordStore<R> {
    client: Client,
    _resource: PhantomData<fn() -> R>,
}

impl<R> KubeRecordStore<R> {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }
}

#[async_trait]
impl<R> RecordStore<R> for KubeRecordStore<R>
where
    R: Resource<Scope = NamespaceResourceScope>
        + Clone
        + DeserializeOwned
        + Serialize
        + Debug
        + Send
        + Sync,
    R::DynamicType: Default,
{
    async fn list(&self, namespace: &str) -> Result<Vec<R>, StoreError> {
        let api: Api<R> = Api::namespaced(self.client.clone(), namespace);
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|e| map_kube_error(e, "list", &record_kind::<R>(), namespace, ""))?;
        Ok(list.items)
    }

    async fn get(&self, namespace: &str, name: &str) -> Result<R, StoreError> {
        let api: Api<R> = Api::namespaced(self.client.clone(), namespace);
        api.get(name)
            .await
            .map_err(|e| map_kube_error(e, "get", &record_kind::<R>(), namespace, name))
    }

    async fn create(&self, namespace: &str, record: &R) -> Result<R, StoreError> {
        let api: Api<R> = Api::namespaced(self.client.clone(), namespace);
        let name = record.name_any();
        api.create(&PostParams::default(), record)
            .await
            .map_err(|e| map_kube_error(e, "create", &record_kind::<R>(), namespace, &name))
    }

    async fn update(&self, namespace: &str, record: &R) -> Result<R, StoreError> {
        let api: Api<R> = Api::namespaced(self.client.clone(), namespace);
        let name = record.name_any();
        api.replace(&name, &PostParams::default(), record)
            .await
            .map_err(|e| map_kube_error(e, "update", &record_kind::<R>(), namespace, &name))
    }
}

/// Credential secret lookup over core/v1 Secrets
pub struct KubeSecretStore {
    client: Client,
}

impl KubeSecretStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    async fn list(&self, namespace: &str) -> Result<Vec<CredentialSecret>, StoreError> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let secrets = api
            .list(&ListParams::default())
            .await
            .map_err(|e| map_kube_error(e, "list", "Secret", namespace, ""))?;

        Ok(secrets
            .items
            .into_iter()
            .map(|secret| CredentialSecret {
                name: secret.name_any(),
                annotations: secret.metadata.annotations.unwrap_or_default(),
                labels: secret.metadata.labels.unwrap_or_default(),
            })
            .collect())
    }
}
