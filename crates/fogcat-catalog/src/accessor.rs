//! Typed reads and writes against the tuple space.
//!
//! Every call is one synchronous round trip to the store. There is no cache
//! and no retry; store failures surface as [`CatalogError::Store`].

use std::sync::Arc;

use fogcat_core::{Catalogued, Descriptor, Record, RequestNewJobMessage};
use fogcat_store::KvStore;
use tracing::debug;

use crate::error::{CatalogError, CatalogResult};
use crate::path::{Namespace, Path};

/// Decode one stored value, attributing failures to its key.
pub(crate) fn decode<T: Catalogued>(key: &str, text: &str) -> CatalogResult<T> {
    T::decode(text).map_err(|source| CatalogError::Decode {
        key: key.to_string(),
        source,
    })
}

/// Descriptor and record CRUD for one tenant scope.
#[derive(Clone)]
pub struct CatalogAccessor {
    store: Arc<dyn KvStore>,
    namespace: Namespace,
}

impl CatalogAccessor {
    pub fn new(store: Arc<dyn KvStore>, namespace: Namespace) -> Self {
        Self { store, namespace }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    // ── Descriptors ────────────────────────────────────────────────

    /// Get the descriptor of kind `D` with `id`.
    pub fn get<D: Descriptor>(&self, id: &str) -> CatalogResult<D> {
        let path = self.namespace.descriptor_path(D::KIND, id)?;
        self.read_one(path.as_str())
    }

    /// Get every descriptor of kind `D`. Fails with `NotFound` if there are none.
    pub fn get_all<D: Descriptor>(&self) -> CatalogResult<Vec<D>> {
        let selector = self.namespace.descriptors_selector(D::KIND)?;
        self.read_all(selector.as_str())
    }

    /// Store `value` under its own descriptor id, replacing any previous value.
    pub fn put<D: Descriptor>(&self, value: &D) -> CatalogResult<()> {
        let path = self.namespace.descriptor_path(D::KIND, value.descriptor_id())?;
        self.write(&path, value)
    }

    /// Delete a descriptor. Deleting a missing descriptor succeeds.
    pub fn remove<D: Descriptor>(&self, id: &str) -> CatalogResult<()> {
        let path = self.namespace.descriptor_path(D::KIND, id)?;
        self.delete(&path)
    }

    // ── Records ────────────────────────────────────────────────────

    pub fn get_record<R: Record>(&self, id: &str, instance_id: &str) -> CatalogResult<R> {
        let path = self.namespace.record_path(R::KIND, id, instance_id)?;
        self.read_one(path.as_str())
    }

    /// Find a record by instance id alone, whichever descriptor owns it.
    pub fn find_record<R: Record>(&self, instance_id: &str) -> CatalogResult<R> {
        let selector = self.namespace.instance_selector(R::KIND, instance_id)?;
        self.read_one(selector.as_str())
    }

    /// Every record of descriptor `id`. Fails with `NotFound` if there are none.
    pub fn get_all_records<R: Record>(&self, id: &str) -> CatalogResult<Vec<R>> {
        let selector = self.namespace.records_selector(R::KIND, id)?;
        self.read_all(selector.as_str())
    }

    /// Every record of every descriptor of kind `R`.
    pub fn get_all_records_of_kind<R: Record>(&self) -> CatalogResult<Vec<R>> {
        let selector = self.namespace.all_records_selector(R::KIND)?;
        self.read_all(selector.as_str())
    }

    pub fn put_record<R: Record>(&self, value: &R) -> CatalogResult<()> {
        let path = self
            .namespace
            .record_path(R::KIND, value.descriptor_id(), value.instance_id())?;
        self.write(&path, value)
    }

    pub fn remove_record<R: Record>(&self, id: &str, instance_id: &str) -> CatalogResult<()> {
        let path = self.namespace.record_path(R::KIND, id, instance_id)?;
        self.delete(&path)
    }

    // ── Job requests ───────────────────────────────────────────────

    /// Write a new-job request to the scope's request key. A later request
    /// replaces an earlier one; watchers see each write.
    pub fn request_job(&self, request: &RequestNewJobMessage) -> CatalogResult<()> {
        let path = self.namespace.job_request_path()?;
        self.write(&path, request)
    }

    // ── Store round trips ──────────────────────────────────────────

    fn read_one<T: Catalogued>(&self, selector: &str) -> CatalogResult<T> {
        let (key, value) = self
            .store
            .get(selector)?
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::NotFound(selector.to_string()))?;
        decode(&key, &value)
    }

    fn read_all<T: Catalogued>(&self, selector: &str) -> CatalogResult<Vec<T>> {
        let entries = self.store.get(selector)?;
        if entries.is_empty() {
            return Err(CatalogError::NotFound(selector.to_string()));
        }
        // One bad entry fails the whole read.
        entries
            .iter()
            .map(|(key, value)| decode(key, value))
            .collect()
    }

    fn write<T: Catalogued>(&self, path: &Path, value: &T) -> CatalogResult<()> {
        let text = value.encode().map_err(|source| CatalogError::Encode {
            key: path.to_string(),
            source,
        })?;
        self.store.put(path.as_str(), &text)?;
        debug!(%path, kind = %T::KIND, "catalog entry written");
        Ok(())
    }

    fn delete(&self, path: &Path) -> CatalogResult<()> {
        self.store.remove(path.as_str())?;
        debug!(%path, "catalog entry removed");
        Ok(())
    }
}
