//! In-process mapping store.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entities::{NewMapping, UrlMapping};
use crate::domain::repositories::{InsertOutcome, MappingRepository, StoreError};

/// Mapping store backed by a locked `HashMap`.
///
/// Every operation takes the write lock for its whole duration, which makes
/// each one linearizable. Data lives only as long as the process, so this is
/// meant for tests and local runs (`STORE_BACKEND=memory`).
#[derive(Debug, Default)]
pub struct MemoryMappingRepository {
    mappings: RwLock<HashMap<String, UrlMapping>>,
}

impl MemoryMappingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of one mapping.
    pub async fn get(&self, code: &str) -> Option<UrlMapping> {
        self.mappings.read().await.get(code).cloned()
    }

    pub async fn len(&self) -> usize {
        self.mappings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.mappings.read().await.is_empty()
    }
}

#[async_trait]
impl MappingRepository for MemoryMappingRepository {
    async fn insert_if_absent(&self, new_mapping: NewMapping) -> Result<InsertOutcome, StoreError> {
        let mut mappings = self.mappings.write().await;

        match mappings.entry(new_mapping.code.clone()) {
            Entry::Occupied(_) => Ok(InsertOutcome::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(new_mapping.into_mapping());
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    async fn increment_visit_count(&self, code: &str) -> Result<i64, StoreError> {
        let mut mappings = self.mappings.write().await;

        let mapping = mappings
            .get_mut(code)
            .ok_or_else(|| StoreError::not_found(code))?;
        mapping.visit_count += 1;

        Ok(mapping.visit_count)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
