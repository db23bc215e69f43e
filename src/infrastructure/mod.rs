//! Infrastructure layer - record store adapters
//!
//! This module contains the abstract record store the services are written
//! against, plus the concrete backends:
//! - Kubernetes custom resources (production)
//! - In-memory maps (tests, local experimentation)

pub mod kube;
pub mod memory;
pub mod store;

// Re-export commonly used types
pub use self::kube::{create_client, KubeRecordStore, KubeSecretStore};
pub use memory::{MemoryRecordStore, MemorySecretStore};
pub use store::{CredentialSecret, EnvironmentSource, RecordStore, SecretStore};
