//! In-memory tuple space.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::StoreResult;
use crate::notify::{Change, ChangeCallback, Notifier, SubscriptionId};
use crate::selector;
use crate::KvStore;

/// Thread-safe, process-local store. Clones share the same data.
#[derive(Clone)]
pub struct MemoryStore {
    data: Arc<RwLock<BTreeMap<String, String>>>,
    notifier: Notifier,
}

impl MemoryStore {
    /// Create an empty store with its own delivery thread.
    pub fn open() -> StoreResult<Self> {
        let store = Self {
            data: Arc::new(RwLock::new(BTreeMap::new())),
            notifier: Notifier::start()?,
        };
        debug!("in-memory store opened");
        Ok(store)
    }

    /// Number of stored tuples.
    pub fn len(&self) -> usize {
        self.data.read().expect("data lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemoryStore {
    fn get(&self, sel: &str) -> StoreResult<Vec<(String, String)>> {
        selector::validate(sel)?;
        let data = self.data.read().expect("data lock");
        if !selector::is_selector(sel) {
            return Ok(data
                .get(sel)
                .map(|value| vec![(sel.to_string(), value.clone())])
                .unwrap_or_default());
        }
        let prefix = selector::literal_prefix(sel);
        Ok(data
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .filter(|(key, _)| selector::matches(sel, key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut data = self.data.write().expect("data lock");
        data.insert(key.to_string(), value.to_string());
        // Publish under the lock so deliveries follow write order.
        self.notifier.publish(vec![Change::put(key, value)]);
        debug!(%key, "tuple stored");
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut data = self.data.write().expect("data lock");
        let existed = data.remove(key).is_some();
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
