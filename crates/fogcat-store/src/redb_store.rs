//! RedbStore — redb-backed persistent tuple space.
//!
//! All tuples live in a single table keyed by absolute path. Selector reads
//! scan the key range that starts with the selector's literal prefix. The
//! store supports both on-disk and in-memory backends (the latter for
//! testing).

use std::path::Path;
use std::sync::{Arc, Mutex};

use redb::{Database, ReadableDatabase};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::notify::{Change, ChangeCallback, Notifier, SubscriptionId};
use crate::selector;
use crate::tables::TUPLES;
use crate::KvStore;

/// Convert any `Display` error into a `StoreError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StoreError::$variant(e.to_string())
    };
}

/// Thread-safe persistent store backed by redb.
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
    /// Serializes commit + publish so deliveries follow commit order.
    writer: Arc<Mutex<()>>,
    notifier: Notifier,
}

impl RedbStore {
    /// Open (or create) a persistent store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self::with_database(db)?;
        info!(?path, "redb store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self::with_database(db)?;
        debug!("in-memory redb store opened");
        Ok(store)
    }

    fn with_database(db: Database) -> StoreResult<Self> {
        let store = Self {
            db: Arc::new(db),
            writer: Arc::new(Mutex::new(())),
            notifier: Notifier::start()?,
        };
        store.ensure_tables()?;
        Ok(store)
    }

    /// Create the tuple table if it doesn't exist yet.
    fn ensure_tables(&self) -> StoreResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(TUPLES).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }
}

impl KvStore for RedbStore {
    fn get(&self, sel: &str) -> StoreResult<Vec<(String, String)>> {
        selector::validate(sel)?;
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(TUPLES).map_err(map_err!(Table))?;

        if !selector::is_selector(sel) {
            return match table.get(sel).map_err(map_err!(Read))? {
                Some(guard) => Ok(vec![(sel.to_string(), guard.value().to_string())]),
                None => Ok(Vec::new()),
            };
        }

        let prefix = selector::literal_prefix(sel);
        let mut results = Vec::new();
        for entry in table.range(prefix..).map_err(map_err!(Read))? {
            let (key, value) = entry.map_err(map_err!(Read))?;
            let key = key.value();
            if !key.starts_with(prefix) {
                break;
            }
            if selector::matches(sel, key) {
                results.push((key.to_string(), value.value().to_string()));
            }
        }
        Ok(results)
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        let _writer = self.writer.lock().expect("writer lock");
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(TUPLES).map_err(map_err!(Table))?;
            table.insert(key, value).map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        self.notifier.publish(vec![Change::put(key, value)]);
        debug!(%key, "tuple stored");
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let _writer = self.writer.lock().expect("writer lock");
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(TUPLES).map_err(map_err!(Table))?;
            existed = table.remove(key).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        if existed {
            self.notifier.publish(vec![Change::remove(key)]);
        }
        debug!(%key, existed, "tuple removed");
        Ok(())
    }

    fn subscribe(&self, sel: &str, callback: ChangeCallback) -> StoreResult<SubscriptionId> {
        self.notifier.subscribe(sel, callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> StoreResult<()> {
        self.notifier.unsubscribe(id)
    }

    fn flush(&self) -> StoreResult<()> {
        self.notifier.flush()
    }
}
