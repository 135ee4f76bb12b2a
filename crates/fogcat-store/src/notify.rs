//! Change fan-out from writers to subscribers.
//!
//! Writers publish one batch per write. A dedicated delivery thread matches
//! each batch against the registered watches and invokes their callbacks,
//! so callbacks run concurrently with writers and may themselves subscribe
//! or unsubscribe without deadlocking.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

use tracing::{debug, error, trace, warn};

use crate::error::{StoreError, StoreResult};
use crate::selector;

/// Callback invoked with the changes of one write that matched a watch.
pub type ChangeCallback = Arc<dyn Fn(Vec<Change>) + Send + Sync>;

/// Opaque handle identifying one standing watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Put,
    Remove,
}

/// One key-level change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub key: String,
    pub kind: ChangeKind,
    /// The written value; `None` for removals.
    pub value: Option<String>,
}

impl Change {
    pub fn put(key: &str, value: &str) -> Self {
        Change {
            key: key.to_string(),
            kind: ChangeKind::Put,
            value: Some(value.to_string()),
        }
    }

    pub fn remove(key: &str) -> Self {
        Change {
            key: key.to_string(),
            kind: ChangeKind::Remove,
            value: None,
        }
    }
}

struct Watch {
    selector: String,
    callback: ChangeCallback,
    /// Sequence number of the last batch published before registration.
    since: u64,
}

#[derive(Default)]
struct Registry {
    watches: BTreeMap<SubscriptionId, Watch>,
    next_id: u64,
    published: u64,
}

enum Message {
    Batch { seq: u64, changes: Vec<Change> },
    Flush(SyncSender<()>),
}

/// Registry of watches plus the delivery thread that serves them.
///
/// A watch only receives batches published after it was registered.
/// Cloning shares the registry. The delivery thread exits once every clone
/// has been dropped.
#[derive(Clone)]
pub struct Notifier {
    registry: Arc<Mutex<Registry>>,
    tx: Sender<Message>,
    delivery_thread: ThreadId,
}

impl Notifier {
    /// Start a notifier with its own delivery thread.
    pub fn start() -> StoreResult<Self> {
        let registry = Arc::new(Mutex::new(Registry::default()));
        let (tx, rx) = mpsc::channel();
        let shared = registry.clone();
        let handle = thread::Builder::new()
            .name("fogcat-notify".to_string())
            .spawn(move || deliver_loop(shared, rx))
            .map_err(|e| StoreError::Open(format!("failed to start delivery thread: {e}")))?;
        Ok(Self {
            registry,
            tx,
            delivery_thread: handle.thread().id(),
        })
    }

    /// Register a watch on `selector`.
    pub fn subscribe(
        &self,
        selector: &str,
        callback: ChangeCallback,
    ) -> StoreResult<SubscriptionId> {
        selector::validate(selector)?;
        let mut registry = self.registry.lock().expect("registry lock");
        registry.next_id += 1;
        let id = SubscriptionId(registry.next_id);
        let since = registry.published;
        registry.watches.insert(
            id,
            Watch {
                selector: selector.to_string(),
                callback,
                since,
            },
        );
        debug!(%id, %selector, since, "watch registered");
        Ok(id)
    }

    /// Remove a watch. Changes published afterwards are not delivered to it.
    pub fn unsubscribe(&self, id: SubscriptionId) -> StoreResult<()> {
        let mut registry = self.registry.lock().expect("registry lock");
        match registry.watches.remove(&id) {
            Some(watch) => {
                debug!(%id, selector = %watch.selector, "watch removed");
                Ok(())
            }
            None => Err(StoreError::UnknownSubscription(id.0)),
        }
    }

    /// Number of registered watches.
    pub fn watch_count(&self) -> usize {
        self.registry.lock().expect("registry lock").watches.len()
    }

    /// Queue a batch for delivery to the watches registered so far.
    ///
    /// The write has already happened when this is called, so a stopped
    /// delivery thread is logged rather than reported.
    pub fn publish(&self, changes: Vec<Change>) {
        if changes.is_empty() {
            return;
        }
        let mut registry = self.registry.lock().expect("registry lock");
        registry.published += 1;
        let seq = registry.published;
        // Sent under the lock so channel order matches sequence order.
        if self.tx.send(Message::Batch { seq, changes }).is_err() {
            warn!(seq, "change delivery stopped; batch dropped");
        }
    }

    /// Block until every batch published so far has been delivered.
    ///
    /// Called from a subscriber callback this returns immediately: the
    /// delivery thread cannot wait for itself.
    pub fn flush(&self) -> StoreResult<()> {
        if thread::current().id() == self.delivery_thread {
            return Ok(());
        }
        let (done_tx, done_rx) = mpsc::sync_channel(1);
        self.tx
            .send(Message::Flush(done_tx))
            .map_err(|_| StoreError::Closed)?;
        done_rx.recv().map_err(|_| StoreError::Closed)
    }
}

fn deliver_loop(registry: Arc<Mutex<Registry>>, rx: Receiver<Message>) {
    while let Ok(message) = rx.recv() {
        match message {
            Message::Batch { seq, changes } => deliver(&registry, seq, &changes),
            Message::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("change delivery stopped");
}

fn deliver(registry: &Mutex<Registry>, seq: u64, batch: &[Change]) {
    // Collect targets first; callbacks must not run under the registry lock.
    let targets: Vec<(SubscriptionId, ChangeCallback, Vec<Change>)> = {
        let registry = registry.lock().expect("registry lock");
        registry
            .watches
            .iter()
            .filter(|(_, watch)| watch.since < seq)
            .filter_map(|(id, watch)| {
                let matched: Vec<Change> = batch
                    .iter()
                    .filter(|change| selector::matches(&watch.selector, &change.key))
                    .cloned()
                    .collect();
                (!matched.is_empty()).then(|| (*id, watch.callback.clone(), matched))
            })
            .collect()
    };

    for (id, callback, changes) in targets {
        trace!(%id, seq, changes = changes.len(), "delivering changes");
        if catch_unwind(AssertUnwindSafe(|| callback(changes))).is_err() {
            error!(%id, "subscriber callback panicked");
        }
    }
}
