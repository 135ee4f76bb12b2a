//! Orchestrator facade: one object per `(system, tenant)` scope.
//!
//! Exposes a CRUD + observe method set per resource kind on top of
//! [`CatalogAccessor`] and [`ChangeSubscriber`], and owns the lifetime of the
//! subscriptions made through it: they are released by [`Orchestrator::close`]
//! or when the facade is dropped.

use std::sync::Arc;

use fogcat_core::{
    Catalogued, CloudInfo, EntityDescriptor, EntityRecord, FduDescriptor, FduRecord, FimInfo,
    FogcatConfig, Job, RequestNewJobMessage, ResourceKind, VirtualLinkDescriptor, VirtualLinkRecord,
};
use fogcat_store::{KvStore, SubscriptionId};
use tracing::{info, warn};

use crate::accessor::CatalogAccessor;
use crate::error::CatalogResult;
use crate::path::{Namespace, Selector};
use crate::subscriber::{ChangeSubscriber, ErrorHandler, log_errors};

pub struct Orchestrator {
    catalog: CatalogAccessor,
    subscriber: ChangeSubscriber,
    on_error: ErrorHandler,
}

impl Orchestrator {
    /// Create a facade for `namespace` over a shared store.
    pub fn new(store: Arc<dyn KvStore>, namespace: Namespace) -> Self {
        info!(
            system = namespace.system_id(),
            tenant = namespace.tenant_id(),
            "orchestrator catalog ready"
        );
        Self {
            catalog: CatalogAccessor::new(store.clone(), namespace),
            subscriber: ChangeSubscriber::new(store),
            on_error: log_errors(),
        }
    }

    /// Open the configured store and scope.
    pub fn from_config(config: &FogcatConfig) -> CatalogResult<Self> {
        let namespace = Namespace::from_scope(&config.scope)?;
        let store = fogcat_store::open(&config.store)?;
        Ok(Self::new(store, namespace))
    }

    /// Route undecodable changes of later subscriptions to `handler`.
    pub fn with_error_handler(mut self, handler: ErrorHandler) -> Self {
        self.on_error = handler;
        self
    }

    pub fn namespace(&self) -> &Namespace {
        self.catalog.namespace()
    }

    pub fn catalog(&self) -> &CatalogAccessor {
        &self.catalog
    }

    fn observe<T, F>(
        &self,
        selector: CatalogResult<Selector>,
        listener: F,
    ) -> CatalogResult<SubscriptionId>
    where
        T: Catalogued,
        F: Fn(T) + Send + Sync + 'static,
    {
        self.subscriber.observe(&selector?, listener, self.on_error.clone())
    }

    // ── Subscriptions ──────────────────────────────────────────────

    /// Cancel a subscription made through this facade.
    pub fn unsubscribe(&self, id: SubscriptionId) -> CatalogResult<()> {
        self.subscriber.unsubscribe(id)
    }

    /// Live subscriptions, oldest first.
    pub fn subscriptions(&self) -> Vec<SubscriptionId> {
        self.subscriber.subscriptions()
    }

    /// Cancel every live subscription.
    pub fn close(&self) -> CatalogResult<()> {
        self.subscriber.unsubscribe_all()
    }

    // ── Jobs ───────────────────────────────────────────────────────

    pub fn add_job(&self, job: &Job) -> CatalogResult<()> {
        self.catalog.put(job)
    }

    pub fn get_job(&self, job_id: &str) -> CatalogResult<Job> {
        self.catalog.get(job_id)
    }

    pub fn get_all_jobs(&self) -> CatalogResult<Vec<Job>> {
        self.catalog.get_all()
    }

    pub fn remove_job(&self, job_id: &str) -> CatalogResult<()> {
        self.catalog.remove::<Job>(job_id)
    }

    pub fn observe_jobs(
        &self,
        listener: impl Fn(Job) + Send + Sync + 'static,
    ) -> CatalogResult<SubscriptionId> {
        self.observe(self.namespace().descriptors_selector(ResourceKind::Job), listener)
    }

    /// Ask the orchestrator for a new job. The outcome shows up as a [`Job`]
    /// whose `original_sender` is the request's `sender`.
    pub fn request_job(&self, request: &RequestNewJobMessage) -> CatalogResult<()> {
        self.catalog.request_job(request)
    }

    /// Watch the scope's new-job requests.
    pub fn observe_job_requests(
        &self,
        listener: impl Fn(RequestNewJobMessage) + Send + Sync + 'static,
    ) -> CatalogResult<SubscriptionId> {
        self.observe(self.namespace().job_request_selector(), listener)
    }

    // ── FIMs ───────────────────────────────────────────────────────

    pub fn add_fim(&self, info: &FimInfo) -> CatalogResult<()> {
        self.catalog.put(info)
    }

    pub fn get_fim(&self, fim_id: &str) -> CatalogResult<FimInfo> {
        self.catalog.get(fim_id)
    }

    pub fn get_all_fims(&self) -> CatalogResult<Vec<FimInfo>> {
        self.catalog.get_all()
    }

    pub fn remove_fim(&self, fim_id: &str) -> CatalogResult<()> {
        self.catalog.remove::<FimInfo>(fim_id)
    }

    pub fn observe_fims(
        &self,
        listener: impl Fn(FimInfo) + Send + Sync + 'static,
    ) -> CatalogResult<SubscriptionId> {
        self.observe(self.namespace().descriptors_selector(ResourceKind::Fim), listener)
    }

    // ── Clouds ─────────────────────────────────────────────────────

    pub fn add_cloud(&self, info: &CloudInfo) -> CatalogResult<()> {
        self.catalog.put(info)
    }

    pub fn get_cloud(&self, cloud_id: &str) -> CatalogResult<CloudInfo> {
        self.catalog.get(cloud_id)
    }

    pub fn get_all_clouds(&self) -> CatalogResult<Vec<CloudInfo>> {
        self.catalog.get_all()
    }

    pub fn remove_cloud(&self, cloud_id: &str) -> CatalogResult<()> {
        self.catalog.remove::<CloudInfo>(cloud_id)
    }

    pub fn observe_clouds(
        &self,
        listener: impl Fn(CloudInfo) + Send + Sync + 'static,
    ) -> CatalogResult<SubscriptionId> {
        self.observe(self.namespace().descriptors_selector(ResourceKind::Cloud), listener)
    }

    // ── Entities ───────────────────────────────────────────────────

    pub fn add_entity(&self, descriptor: &EntityDescriptor) -> CatalogResult<()> {
        self.catalog.put(descriptor)
    }

    pub fn get_entity(&self, entity_id: &str) -> CatalogResult<EntityDescriptor> {
        self.catalog.get(entity_id)
    }

    pub fn get_all_entities(&self) -> CatalogResult<Vec<EntityDescriptor>> {
        self.catalog.get_all()
    }

    pub fn remove_entity(&self, entity_id: &str) -> CatalogResult<()> {
        self.catalog.remove::<EntityDescriptor>(entity_id)
    }

    pub fn observe_entities(
        &self,
        listener: impl Fn(EntityDescriptor) + Send + Sync + 'static,
    ) -> CatalogResult<SubscriptionId> {
        self.observe(self.namespace().descriptors_selector(ResourceKind::Entity), listener)
    }

    pub fn add_entity_record(&self, record: &EntityRecord) -> CatalogResult<()> {
        self.catalog.put_record(record)
    }

    pub fn get_entity_record(
        &self,
        entity_id: &str,
        instance_id: &str,
    ) -> CatalogResult<EntityRecord> {
        self.catalog.get_record(entity_id, instance_id)
    }

    /// Look up an entity instance without knowing which entity it belongs to.
    pub fn find_entity_record(&self, instance_id: &str) -> CatalogResult<EntityRecord> {
        self.catalog.find_record(instance_id)
    }

    pub fn get_all_entity_records(&self, entity_id: &str) -> CatalogResult<Vec<EntityRecord>> {
        self.catalog.get_all_records(entity_id)
    }

    pub fn remove_entity_record(&self, entity_id: &str, instance_id: &str) -> CatalogResult<()> {
        self.catalog.remove_record::<EntityRecord>(entity_id, instance_id)
    }

    pub fn observe_entity_records(
        &self,
        entity_id: &str,
        listener: impl Fn(EntityRecord) + Send + Sync + 'static,
    ) -> CatalogResult<SubscriptionId> {
        self.observe(
            self.namespace().records_selector(EntityRecord::KIND, entity_id),
            listener,
        )
    }

    // ── Virtual links ──────────────────────────────────────────────

    pub fn add_virtual_link(&self, descriptor: &VirtualLinkDescriptor) -> CatalogResult<()> {
        self.catalog.put(descriptor)
    }

    pub fn get_virtual_link(&self, vl_id: &str) -> CatalogResult<VirtualLinkDescriptor> {
        self.catalog.get(vl_id)
    }

    pub fn get_all_virtual_links(&self) -> CatalogResult<Vec<VirtualLinkDescriptor>> {
        self.catalog.get_all()
    }

    pub fn remove_virtual_link(&self, vl_id: &str) -> CatalogResult<()> {
        self.catalog.remove::<VirtualLinkDescriptor>(vl_id)
    }

    pub fn observe_virtual_links(
        &self,
        listener: impl Fn(VirtualLinkDescriptor) + Send + Sync + 'static,
    ) -> CatalogResult<SubscriptionId> {
        self.observe(
            self.namespace().descriptors_selector(ResourceKind::VirtualLink),
            listener,
        )
    }

    pub fn add_virtual_link_record(&self, record: &VirtualLinkRecord) -> CatalogResult<()> {
        self.catalog.put_record(record)
    }

    pub fn get_virtual_link_record(
        &self,
        vl_id: &str,
        instance_id: &str,
    ) -> CatalogResult<VirtualLinkRecord> {
        self.catalog.get_record(vl_id, instance_id)
    }

    pub fn get_all_virtual_link_records(
        &self,
        vl_id: &str,
    ) -> CatalogResult<Vec<VirtualLinkRecord>> {
        self.catalog.get_all_records(vl_id)
    }

    pub fn remove_virtual_link_record(&self, vl_id: &str, instance_id: &str) -> CatalogResult<()> {
        self.catalog.remove_record::<VirtualLinkRecord>(vl_id, instance_id)
    }

    pub fn observe_virtual_link_records(
        &self,
        vl_id: &str,
        listener: impl Fn(VirtualLinkRecord) + Send + Sync + 'static,
    ) -> CatalogResult<SubscriptionId> {
        self.observe(
            self.namespace().records_selector(VirtualLinkRecord::KIND, vl_id),
            listener,
        )
    }

    // ── FDUs ───────────────────────────────────────────────────────

    pub fn add_fdu(&self, descriptor: &FduDescriptor) -> CatalogResult<()> {
        self.catalog.put(descriptor)
    }

    pub fn get_fdu(&self, fdu_id: &str) -> CatalogResult<FduDescriptor> {
        self.catalog.get(fdu_id)
    }

    pub fn get_all_fdus(&self) -> CatalogResult<Vec<FduDescriptor>> {
        self.catalog.get_all()
    }

    pub fn remove_fdu(&self, fdu_id: &str) -> CatalogResult<()> {
        self.catalog.remove::<FduDescriptor>(fdu_id)
    }

    pub fn observe_fdus(
        &self,
        listener: impl Fn(FduDescriptor) + Send + Sync + 'static,
    ) -> CatalogResult<SubscriptionId> {
        self.observe(self.namespace().descriptors_selector(ResourceKind::Fdu), listener)
    }

    pub fn add_fdu_record(&self, record: &FduRecord) -> CatalogResult<()> {
        self.catalog.put_record(record)
    }

    pub fn get_fdu_record(&self, fdu_id: &str, instance_id: &str) -> CatalogResult<FduRecord> {
        self.catalog.get_record(fdu_id, instance_id)
    }

    pub fn get_all_fdu_records(&self, fdu_id: &str) -> CatalogResult<Vec<FduRecord>> {
        self.catalog.get_all_records(fdu_id)
    }

    /// Records of every FDU in the scope.
    pub fn get_all_fdu_records_any(&self) -> CatalogResult<Vec<FduRecord>> {
        self.catalog.get_all_records_of_kind()
    }

    pub fn remove_fdu_record(&self, fdu_id: &str, instance_id: &str) -> CatalogResult<()> {
        self.catalog.remove_record::<FduRecord>(fdu_id, instance_id)
    }

    pub fn observe_fdu_records(
        &self,
        fdu_id: &str,
        listener: impl Fn(FduRecord) + Send + Sync + 'static,
    ) -> CatalogResult<SubscriptionId> {
        self.observe(self.namespace().records_selector(FduRecord::KIND, fdu_id), listener)
    }

    /// Watch the records of every FDU in the scope.
    pub fn observe_all_fdu_records(
        &self,
        listener: impl Fn(FduRecord) + Send + Sync + 'static,
    ) -> CatalogResult<SubscriptionId> {
        self.observe(self.namespace().all_records_selector(FduRecord::KIND), listener)
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(error = %err, "failed to release subscriptions on drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fogcat_core::{ScopeConfig, StoreConfig};
    use fogcat_store::MemoryStore;

    #[test]
    fn from_config_builds_scoped_facade() {
        let config = FogcatConfig {
            scope: ScopeConfig {
                root: "force".to_string(),
                system_id: "sys1".to_string(),
                tenant_id: "t1".to_string(),
            },
            store: StoreConfig::default(),
        };
        let orchestrator = Orchestrator::from_config(&config).unwrap();
        assert_eq!(orchestrator.namespace().tenant_id(), "t1");

        orchestrator
            .add_fim(&FimInfo {
                uuid: "fim-a".to_string(),
                locator: "tcp/10.0.0.2:7447".to_string(),
            })
            .unwrap();
        assert_eq!(orchestrator.get_fim("fim-a").unwrap().locator, "tcp/10.0.0.2:7447");
    }

    #[test]
    fn from_config_rejects_bad_scope() {
        let config = FogcatConfig {
            scope: ScopeConfig {
                root: "force".to_string(),
                system_id: "sys/1".to_string(),
                tenant_id: "t1".to_string(),
            },
            store: StoreConfig::default(),
        };
        assert!(Orchestrator::from_config(&config).is_err());
    }

    #[test]
    fn drop_releases_store_watches() {
        let store = Arc::new(MemoryStore::open().unwrap());
        let id = {
            let orchestrator =
                Orchestrator::new(store.clone(), Namespace::new("force", "s", "t").unwrap());
            orchestrator.observe_fims(|_| {}).unwrap()
        };
        assert!(store.unsubscribe(id).is_err());
    }
}
