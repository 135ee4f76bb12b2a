//! Change subscriptions with typed delivery.
//!
//! Each delivered batch is decoded element by element, in order, and every
//! successfully decoded value is passed to the listener. Values that fail to
//! decode go to an [`ErrorHandler`] instead; they never stop delivery of the
//! rest of the batch.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use fogcat_core::Catalogued;
use fogcat_store::{Change, ChangeCallback, ChangeKind, KvStore, SubscriptionId};
use tracing::{debug, info, warn};

use crate::accessor::decode;
use crate::error::{CatalogError, CatalogResult};
use crate::path::Selector;

/// Receives changes that could not be turned into a typed value.
pub type ErrorHandler = Arc<dyn Fn(CatalogError) + Send + Sync>;

/// Default handler: log and drop.
pub fn log_errors() -> ErrorHandler {
    Arc::new(|err| warn!(error = %err, "dropping undeliverable change"))
}

/// Decode `changes` in order and hand each value to `listener`.
///
/// Removals carry no value and are not forwarded.
pub fn deliver<T, F>(changes: Vec<Change>, listener: &F, on_error: &ErrorHandler)
where
    T: Catalogued,
    F: Fn(T) + ?Sized,
{
    for change in changes {
        match (change.kind, change.value) {
            (ChangeKind::Put, Some(text)) => match decode::<T>(&change.key, &text) {
                Ok(value) => listener(value),
                Err(err) => on_error(err),
            },
            (ChangeKind::Put, None) => on_error(CatalogError::NotFound(change.key)),
            (ChangeKind::Remove, _) => debug!(key = %change.key, "removal not forwarded"),
        }
    }
}

/// Owns the live subscriptions of one facade.
pub struct ChangeSubscriber {
    store: Arc<dyn KvStore>,
    /// Live handles in registration order.
    registry: Mutex<BTreeMap<SubscriptionId, Selector>>,
}

impl ChangeSubscriber {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            registry: Mutex::new(BTreeMap::new()),
        }
    }

    /// Watch `selector`, delivering every matching write as a `T`.
    pub fn observe<T, F>(
        &self,
        selector: &Selector,
        listener: F,
        on_error: ErrorHandler,
    ) -> CatalogResult<SubscriptionId>
    where
        T: Catalogued,
        F: Fn(T) + Send + Sync + 'static,
    {
        let callback: ChangeCallback =
            Arc::new(move |changes| deliver::<T, F>(changes, &listener, &on_error));

        let mut registry = self.registry.lock().expect("registry lock");
        let id = self.store.subscribe(selector.as_str(), callback)?;
        registry.insert(id, selector.clone());
        info!(%id, %selector, kind = %T::KIND, "subscribed");
        Ok(id)
    }

    /// Cancel a subscription made through this subscriber.
    ///
    /// Unknown (or already cancelled) handles fail with `NotFound`.
    pub fn unsubscribe(&self, id: SubscriptionId) -> CatalogResult<()> {
        let mut registry = self.registry.lock().expect("registry lock");
        if !registry.contains_key(&id) {
            return Err(CatalogError::NotFound(format!("subscription {id}")));
        }
        self.store.unsubscribe(id)?;
        if let Some(selector) = registry.remove(&id) {
            info!(%id, %selector, "unsubscribed");
        }
        Ok(())
    }

    /// Live handles, oldest first.
    pub fn subscriptions(&self) -> Vec<SubscriptionId> {
        let registry = self.registry.lock().expect("registry lock");
        registry.keys().copied().collect()
    }

    /// Cancel every live subscription. Returns the first store error, after
    /// attempting all of them.
    pub fn unsubscribe_all(&self) -> CatalogResult<()> {
        let drained = std::mem::take(&mut *self.registry.lock().expect("registry lock"));
        let mut first_err = None;
        for (id, selector) in drained {
            match self.store.unsubscribe(id) {
                Ok(()) => debug!(%id, %selector, "unsubscribed"),
                Err(err) => {
                    warn!(%id, %selector, error = %err, "failed to unsubscribe");
                    first_err.get_or_insert(CatalogError::from(err));
                }
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}
