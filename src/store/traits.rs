use crate::error::StoreError;
use crate::versioning::StoreSnapshot;
use std::future::Future;
use std::pin::Pin;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Read access to persisted graph nodes.
pub trait RecordStore: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch the current snapshot of `id` inside a short-lived read
    /// transaction. `Ok(None)` means the node does not exist.
    fn fetch_snapshot<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<StoreSnapshot>>;
}

/// Per-object-type configuration held on definition nodes.
pub trait DefinitionStore: Send + Sync {
    fn config_value<'a>(
        &'a self,
        object_type: &'a str,
        key: &'a str,
    ) -> StoreFuture<'a, Option<String>>;
}
