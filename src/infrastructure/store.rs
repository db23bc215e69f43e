//! Record store abstraction
//!
//! Generic interface over namespaced, named records keyed by
//! `(namespace, kind, name)`. Absence is reported as
//! `StoreError::NotFound`, which is the conventional trigger for
//! create-path logic in callers.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::Environment;
use crate::error::StoreError;

/// Keyed-record store for one resource type
#[async_trait]
pub trait RecordStore<R: Send + Sync>: Send + Sync {
    /// List all records in the namespace
    async fn list(&self, namespace: &str) -> Result<Vec<R>, StoreError>;

    /// Fetch a record by name
    async fn get(&self, namespace: &str, name: &str) -> Result<R, StoreError>;

    /// Create a new record; duplicate names are rejected
    async fn create(&self, namespace: &str, record: &R) -> Result<R, StoreError>;

    /// Replace an existing record
    async fn update(&self, namespace: &str, record: &R) -> Result<R, StoreError>;
}

/// Metadata projection of a credential secret
///
/// Ownership of the secret stays with the external secret store; only the
/// name, annotations and labels are read here.
#[derive(Clone, Debug, Default)]
pub struct CredentialSecret {
    pub name: String,
    pub annotations: BTreeMap<String, String>,
    pub labels: BTreeMap<String, String>,
}

/// Read-only lookup over credential secrets in a namespace
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn list(&self, namespace: &str) -> Result<Vec<CredentialSecret>, StoreError>;
}

/// Supplies environments in promotion order
#[async_trait]
pub trait EnvironmentSource: Send + Sync {
    /// Return a name lookup plus the environment names in promotion order
    async fn ordered_environments(
        &self,
        namespace: &str,
    ) -> Result<(BTreeMap<String, Environment>, Vec<String>), StoreError>;
}
