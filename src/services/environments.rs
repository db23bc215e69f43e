//! Environment ordering
//!
//! Supplies environments in promotion order: the `order` field first, name
//! as the tie breaker.

use std::collections::BTreeMap;

use async_trait::async_trait;
use kube::ResourceExt;

use crate::domain::Environment;
use crate::error::StoreError;
use crate::infrastructure::{EnvironmentSource, RecordStore};

/// Environment source backed by stored Environment records
pub struct StoredEnvironmentSource<'a> {
    environments: &'a dyn RecordStore<Environment>,
}

impl<'a> StoredEnvironmentSource<'a> {
    pub fn new(environments: &'a dyn RecordStore<Environment>) -> Self {
        Self { environments }
    }
}

#[async_trait]
impl EnvironmentSource for StoredEnvironmentSource<'_> {
    async fn ordered_environments(
        &self,
        namespace: &str,
    ) -> Result<(BTreeMap<String, Environment>, Vec<String>), StoreError> {
        let mut environments = self.environments.list(namespace).await?;
        environments.sort_by(|a, b| {
            a.spec
                .order
                .cmp(&b.spec.order)
                .then_with(|| a.name_any().cmp(&b.name_any()))
        });

        let names = environments.iter().map(|e| e.name_any()).collect();
        let lookup = environments
            .into_iter()
            .map(|e| (e.name_any(), e))
            .collect();
        Ok((lookup, names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EnvironmentKind, EnvironmentSpec, PromotionStrategy};
    use crate::infrastructure::MemoryRecordStore;

    fn environment(name: &str, order: i32) -> Environment {
        Environment::new(
            name,
            EnvironmentSpec {
                label: name.to_string(),
                namespace: format!("app-{}", name),
                order,
                kind: EnvironmentKind::Permanent,
                promotion_strategy: PromotionStrategy::Automatic,
            },
        )
    }

    #[tokio::test]
    async fn test_orders_by_order_field_then_name() {
        let store = MemoryRecordStore::new();
        store.create("dev", &environment("production", 200)).await.unwrap();
        store.create("dev", &environment("staging", 100)).await.unwrap();
        store.create("dev", &environment("qa", 100)).await.unwrap();

        let source = StoredEnvironmentSource::new(&store);
        let (lookup, names) = source.ordered_environments("dev").await.unwrap();

        assert_eq!(names, vec!["qa", "staging", "production"]);
        assert_eq!(lookup.len(), 3);
        assert_eq!(lookup["staging"].spec.order, 100);
    }

    #[tokio::test]
    async fn test_empty_namespace_yields_nothing() {
        let store: MemoryRecordStore<Environment> = MemoryRecordStore::new();
        let source = StoredEnvironmentSource::new(&store);

        let (lookup, names) = source.ordered_environments("dev").await.unwrap();
        assert!(lookup.is_empty());
        assert!(names.is_empty());
    }
}
