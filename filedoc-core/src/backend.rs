//! Storage backend abstraction for the document store.
//!
//! A backend owns the persisted [`Snapshot`] and exposes exactly two operations:
//! load the whole snapshot and replace the whole snapshot. Collections never
//! write partial updates; every mutation rewrites the full snapshot. Keeping
//! the contract this narrow lets a different persistence strategy slot in
//! without touching collection logic.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`DynStoreBackend`]: A trait for dynamic dispatch over backend implementations
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Examples
//!
//! ```ignore
//! use filedoc::backend::StoreBackend;
//!
//! let backend = MyBackendImpl::new();
//!
//! let mut snapshot = backend.get_data().await?;
//! snapshot.collection_mut("users").clear();
//! backend.set_data(snapshot).await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use std::{any::Any, fmt::Debug};

use crate::{document::Snapshot, error::DocumentStoreResult};

/// Abstract interface for snapshot storage backends.
///
/// # Concurrency
///
/// Backends are not required to coordinate writers. Two callers that each
/// load, modify and save a snapshot may interleave, in which case the last
/// save wins.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Loads the complete snapshot.
    ///
    /// A store that has never been written reads as an empty snapshot.
    async fn get_data(&self) -> DocumentStoreResult<Snapshot>;

    /// Replaces the complete snapshot.
    async fn set_data(&self, snapshot: Snapshot) -> DocumentStoreResult<()>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op.
    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<B> StoreBackend for &B
where
    B: StoreBackend,
{
    async fn get_data(&self) -> DocumentStoreResult<Snapshot> {
        (*self).get_data().await
    }

    async fn set_data(&self, snapshot: Snapshot) -> DocumentStoreResult<()> {
        (*self).set_data(snapshot).await
    }
}

#[async_trait]
pub trait DynStoreBackend: Send + Sync + Debug {
    async fn get_data(&self) -> DocumentStoreResult<Snapshot>;
    async fn set_data(&self, snapshot: Snapshot) -> DocumentStoreResult<()>;
    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()>;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

#[async_trait]
impl<B: StoreBackend + Send + Sync + 'static> DynStoreBackend for B {
    async fn get_data(&self) -> DocumentStoreResult<Snapshot> {
        StoreBackend::get_data(self).await
    }

    async fn set_data(&self, snapshot: Snapshot) -> DocumentStoreResult<()> {
        StoreBackend::set_data(self, snapshot).await
    }

    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()> {
        StoreBackend::shutdown(*self).await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

#[async_trait]
impl StoreBackend for Box<dyn DynStoreBackend> {
    async fn get_data(&self) -> DocumentStoreResult<Snapshot> {
        DynStoreBackend::get_data(&**self).await
    }

    async fn set_data(&self, snapshot: Snapshot) -> DocumentStoreResult<()> {
        DynStoreBackend::set_data(&**self, snapshot).await
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.shutdown_boxed().await
    }
}

#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
