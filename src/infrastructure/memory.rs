//! In-memory record stores
//!
//! Deterministic stand-ins for the Kubernetes backends, used by tests and
//! local experimentation. Duplicate creates are rejected the way the real
//! store rejects duplicate names, and write counters let tests assert that
//! idempotent calls perform no writes.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use kube::{Resource, ResourceExt};

use super::store::{CredentialSecret, RecordStore, SecretStore};
use crate::error::StoreError;

/// Record store backed by a map keyed on `(namespace, name)`
pub struct MemoryRecordStore<R> {
    records: Mutex<BTreeMap<(String, String), R>>,
    creates: AtomicUsize,
    updates: AtomicUsize,
}

impl<R> MemoryRecordStore<R> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(BTreeMap::new()),
            creates: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
        }
    }

    /// Number of create and update calls accepted so far
    pub fn write_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst) + self.updates.load(Ordering::SeqCst)
    }
}

impl<R> Default for MemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R> RecordStore<R> for MemoryRecordStore<R>
where
    R: Resource + Clone + Send + Sync,
    R::DynamicType: Default,
{
    async fn list(&self, namespace: &str) -> Result<Vec<R>, StoreError> {
        let records = self.records.lock().expect("record store mutex poisoned");
        Ok(records
            .iter()
            .filter(|((ns, _), _)| ns == namespace)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn get(&self, namespace: &str, name: &str) -> Result<R, StoreError> {
        let records = self.records.lock().expect("record store mutex poisoned");
        records
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                kind: record_kind::<R>(),
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }

    async fn create(&self, namespace: &str, record: &R) -> Result<R, StoreError> {
        let mut records = self.records.lock().expect("record store mutex poisoned");
        let key = (namespace.to_string(), record.name_any());
        if records.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                kind: record_kind::<R>(),
                namespace: key.0,
                name: key.1,
            });
        }
        records.insert(key, record.clone());
        self.creates.fetch_add(1, Ordering::SeqCst);
        Ok(record.clone())
    }

    async fn update(&self, namespace: &str, record: &R) -> Result<R, StoreError> {
        let mut records = self.records.lock().expect("record store mutex poisoned");
        let key = (namespace.to_string(), record.name_any());
        if !records.contains_key(&key) {
            return Err(StoreError::NotFound {
                kind: record_kind::<R>(),
                namespace: key.0,
                name: key.1,
            });
        }
        records.insert(key, record.clone());
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(record.clone())
    }
}

fn record_kind<R>() -> String
where
    R: Resource,
    R::DynamicType: Default,
{
    R::kind(&R::DynamicType::default()).into_owned()
}

/// Secret lookup backed by a per-namespace list
#[derive(Default)]
pub struct MemorySecretStore {
    secrets: Mutex<BTreeMap<String, Vec<CredentialSecret>>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, namespace: &str, secret: CredentialSecret) {
        let mut secrets = self.secrets.lock().expect("secret store mutex poisoned");
        secrets.entry(namespace.to_string()).or_default().push(secret);
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn list(&self, namespace: &str) -> Result<Vec<CredentialSecret>, StoreError> {
        let secrets = self.secrets.lock().expect("secret store mutex poisoned");
        Ok(secrets.get(namespace).cloned().unwrap_or_default())
    }
}
