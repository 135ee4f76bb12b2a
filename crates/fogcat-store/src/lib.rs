//! fogcat-store — the key/value tuple space underneath the fog catalog.
//!
//! Keys are `/`-separated absolute paths; values are UTF-8 text. Reads and
//! subscriptions take a selector in which a `*` segment matches exactly one
//! path segment.
//!
//! # Architecture
//!
//! [`KvStore`] is the seam the catalog is written against. Two backends ship
//! with the crate:
//!
//! - [`MemoryStore`]: a `BTreeMap` behind an `RwLock`, for tests and
//!   single-process deployments.
//! - [`RedbStore`]: a single [redb](https://docs.rs/redb) table, for state
//!   that must survive restarts.
//!
//! Both hand every write to a shared [`Notifier`], which delivers change
//! batches to matching subscribers on its own thread. Writers never run
//! subscriber code on their stack.

pub mod error;
pub mod memory;
pub mod notify;
pub mod redb_store;
pub mod selector;
pub mod tables;

use std::sync::Arc;

use fogcat_core::{StoreBackend, StoreConfig};

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use notify::{Change, ChangeCallback, ChangeKind, Notifier, SubscriptionId};
pub use redb_store::RedbStore;
pub use selector::{is_selector, matches, WILDCARD};

/// Operations the catalog needs from the underlying tuple space.
///
/// Writes are last-write-wins per key. Subscribers receive every change
/// whose key matches their selector, at least once, in write order.
pub trait KvStore: Send + Sync {
    /// Read every `(key, value)` pair matching `selector`, ordered by key.
    fn get(&self, selector: &str) -> StoreResult<Vec<(String, String)>>;

    /// Write `value` at `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete `key`. Deleting a missing key succeeds.
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Register a standing watch on `selector`.
    fn subscribe(&self, selector: &str, callback: ChangeCallback) -> StoreResult<SubscriptionId>;

    /// Drop a watch registered with [`KvStore::subscribe`].
    fn unsubscribe(&self, id: SubscriptionId) -> StoreResult<()>;

    /// Block until every change written so far has reached its subscribers.
    ///
    /// Backends without local delivery have nothing to wait for.
    fn flush(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Open the backend described by a `[store]` config section.
pub fn open(config: &StoreConfig) -> StoreResult<Arc<dyn KvStore>> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::open()?)),
        StoreBackend::Redb => {
            let path = config
                .path
                .as_deref()
                .ok_or_else(|| StoreError::Open("redb backend requires store.path".to_string()))?;
            Ok(Arc::new(RedbStore::open(path)?))
        }
    }
}
