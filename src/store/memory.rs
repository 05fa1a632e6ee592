use super::traits::{DefinitionStore, RecordStore, StoreFuture};
use crate::versioning::StoreSnapshot;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

/// Process-local graph store for embedding and tests.
///
/// Tracks how many snapshot reads were served so callers can assert that a
/// disabled check never touches the store.
#[derive(Debug, Default)]
pub struct InMemoryGraphStore {
    nodes: RwLock<HashMap<String, StoreSnapshot>>,
    definitions: RwLock<HashMap<(String, String), String>>,
    snapshot_reads: AtomicUsize,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_snapshot(&self, id: impl Into<String>, snapshot: StoreSnapshot) {
        self.nodes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.into(), snapshot);
    }

    pub fn remove_node(&self, id: &str) -> Option<StoreSnapshot> {
        self.nodes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    pub fn set_config_value(
        &self,
        object_type: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.definitions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((object_type.into(), key.into()), value.into());
    }

    pub fn snapshot_reads(&self) -> usize {
        self.snapshot_reads.load(Ordering::SeqCst)
    }
}

impl RecordStore for InMemoryGraphStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch_snapshot<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<StoreSnapshot>> {
        Box::pin(async move {
            self.snapshot_reads.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .nodes
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(id)
                .cloned())
        })
    }
}

impl DefinitionStore for InMemoryGraphStore {
    fn config_value<'a>(
        &'a self,
        object_type: &'a str,
        key: &'a str,
    ) -> StoreFuture<'a, Option<String>> {
        Box::pin(async move {
            Ok(self
                .definitions
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&(object_type.to_string(), key.to_string()))
                .cloned())
        })
    }
}
