//! In-memory snapshot backend.
//!
//! Keeps the whole [`Snapshot`] behind an async-aware read-write lock. Loads hand
//! out a clone; saves replace the held snapshot. Nothing touches the disk, so
//! this backend suits tests and ephemeral stores.

use async_trait::async_trait;
use mea::rwlock::RwLock;
use std::sync::Arc;

use filedoc_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::Snapshot,
    error::DocumentStoreResult,
};

/// Thread-safe in-memory storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped snapshot, so clones
/// of the same instance share the same underlying data.
///
/// # Example
///
/// ```ignore
/// use filedoc_memory::InMemoryStore;
/// use filedoc::backend::StoreBackend;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = InMemoryStore::new();
///     assert!(store.get_data().await?.is_empty());
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    snapshot: Arc<RwLock<Snapshot>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::with_snapshot(Snapshot::new())
    }

    /// Creates a store that starts out holding `snapshot`.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(snapshot)),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn get_data(&self) -> DocumentStoreResult<Snapshot> {
        Ok(self.snapshot.read().await.clone())
    }

    async fn set_data(&self, snapshot: Snapshot) -> DocumentStoreResult<()> {
        log::trace!("Replacing in-memory snapshot ({} collections)", snapshot.len());

        *self.snapshot.write().await = snapshot;

        Ok(())
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// # Example
///
/// ```ignore
/// use filedoc_memory::InMemoryStore;
/// use filedoc::backend::StoreBackendBuilder;
///
/// let store = InMemoryStore::builder().snapshot(seed).build().await?;
/// ```
#[derive(Default)]
pub struct InMemoryStoreBuilder {
    snapshot: Option<Snapshot>,
}

impl InMemoryStoreBuilder {
    /// Seeds the store with an initial snapshot.
    pub fn snapshot(mut self, snapshot: Snapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::with_snapshot(self.snapshot.unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn starts_empty() {
        let store = InMemoryStore::new();

        assert!(store.get_data().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemoryStore::new();
        let clone = store.clone();

        let snapshot: Snapshot = serde_json::from_value(json!({"users": [{"k": "a"}]})).unwrap();
        store.set_data(snapshot.clone()).await.unwrap();

        assert_eq!(clone.get_data().await.unwrap(), snapshot);
    }

    #[tokio::test]
    async fn builder_seeds_snapshot() {
        let seed: Snapshot = serde_json::from_value(json!({"items": []})).unwrap();
        let store = InMemoryStore::builder()
            .snapshot(seed.clone())
            .build()
            .await
            .unwrap();

        assert_eq!(store.get_data().await.unwrap(), seed);
    }
}
