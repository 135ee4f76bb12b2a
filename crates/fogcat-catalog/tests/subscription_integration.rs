//! Change subscription tests: delivery order, decode errors, unsubscribe.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use fogcat_catalog::{CatalogError, Namespace, Orchestrator};
use fogcat_core::*;
use fogcat_store::{KvStore, MemoryStore};

const WAIT: Duration = Duration::from_secs(2);

fn setup() -> (Arc<MemoryStore>, Orchestrator) {
    let store = Arc::new(MemoryStore::open().unwrap());
    let orch = Orchestrator::new(
        store.clone(),
        Namespace::new(DEFAULT_ROOT, "sys1", "t1").unwrap(),
    );
    (store, orch)
}

fn fim(uuid: &str) -> FimInfo {
    FimInfo {
        uuid: uuid.to_string(),
        locator: format!("tcp/{uuid}:7447"),
    }
}

#[test]
fn every_write_reaches_the_listener_in_order() {
    let (store, orch) = setup();
    let (tx, rx) = mpsc::channel();
    orch.observe_fims(move |info| {
        let _ = tx.send(info.uuid);
    })
    .unwrap();

    for uuid in ["a", "b", "c"] {
        orch.add_fim(&fim(uuid)).unwrap();
    }
    store.flush().unwrap();

    let got: Vec<String> = rx.try_iter().collect();
    assert_eq!(got, vec!["a", "b", "c"]);
}

#[test]
fn record_watch_is_scoped_to_one_fdu() {
    let (store, orch) = setup();
    let (tx, rx) = mpsc::channel();
    orch.observe_fdu_records("f1", move |record| {
        let _ = tx.send((record.fdu_id, record.uuid, record.status));
    })
    .unwrap();

    orch.add_fdu_record(&FduRecord::new("f2", "other", InstanceStatus::Running))
        .unwrap();
    orch.add_fdu_record(&FduRecord::new("f1", "i1", InstanceStatus::Onboarded))
        .unwrap();

    let (fdu_id, uuid, status) = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(fdu_id, "f1");
    assert_eq!(uuid, "i1");
    assert_eq!(status, "ONBOARDED");

    store.flush().unwrap();
    assert!(rx.try_recv().is_err());
}

#[test]
fn all_fdu_records_watch_spans_descriptors() {
    let (store, orch) = setup();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    orch.observe_all_fdu_records(move |record| sink.lock().unwrap().push(record.uuid))
        .unwrap();

    orch.add_fdu_record(&FduRecord::new("f1", "i1", InstanceStatus::Running))
        .unwrap();
    orch.add_fdu_record(&FduRecord::new("f2", "i2", InstanceStatus::Running))
        .unwrap();
    store.flush().unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["i1", "i2"]);
}

#[test]
fn undecodable_value_goes_to_error_handler() {
    let (store, orch) = setup();
    let (err_tx, err_rx) = mpsc::channel();
    let err_tx = Mutex::new(err_tx);
    let orch = orch.with_error_handler(Arc::new(move |err: CatalogError| {
        let _ = err_tx.lock().unwrap().send(err.to_string());
    }));

    let (tx, rx) = mpsc::channel();
    orch.observe_fims(move |info| {
        let _ = tx.send(info.uuid);
    })
    .unwrap();

    store
        .put("/force/sys1/tenant/t1/fim/broken/info", "{not json")
        .unwrap();
    orch.add_fim(&fim("ok")).unwrap();
    store.flush().unwrap();

    assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec!["ok"]);
    let errors: Vec<String> = err_rx.try_iter().collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("broken"));
}

#[test]
fn writes_before_observe_are_not_delivered() {
    for _ in 0..100 {
        let (store, orch) = setup();
        orch.add_fim(&fim("old")).unwrap();

        let (tx, rx) = mpsc::channel();
        orch.observe_fims(move |info| {
            let _ = tx.send(info.uuid);
        })
        .unwrap();
        store.flush().unwrap();
        assert!(rx.try_recv().is_err());

        orch.add_fim(&fim("new")).unwrap();
        store.flush().unwrap();
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec!["new"]);
    }
}

#[test]
fn listener_calling_flush_does_not_stall_other_tenants() {
    let store = Arc::new(MemoryStore::open().unwrap());
    let t1 = Orchestrator::new(
        store.clone(),
        Namespace::new(DEFAULT_ROOT, "sys1", "t1").unwrap(),
    );
    let t2 = Orchestrator::new(
        store.clone(),
        Namespace::new(DEFAULT_ROOT, "sys1", "t2").unwrap(),
    );

    let flusher = store.clone();
    t1.observe_fims(move |_| {
        flusher.flush().unwrap();
    })
    .unwrap();
    let (tx, rx) = mpsc::channel();
    t2.observe_clouds(move |cloud| {
        let _ = tx.send(cloud.uuid);
    })
    .unwrap();

    t1.add_fim(&fim("a")).unwrap();
    t2.add_cloud(&CloudInfo {
        uuid: "k8s".to_string(),
        config: "apiVersion: v1".to_string(),
    })
    .unwrap();

    assert_eq!(rx.recv_timeout(WAIT).unwrap(), "k8s");
    store.flush().unwrap();
}

#[test]
fn removal_is_not_forwarded() {
    let (store, orch) = setup();
    orch.add_fim(&fim("a")).unwrap();

    let (tx, rx) = mpsc::channel();
    orch.observe_fims(move |info| {
        let _ = tx.send(info.uuid);
    })
    .unwrap();
    orch.remove_fim("a").unwrap();
    store.flush().unwrap();

    assert!(rx.try_recv().is_err());
}

#[test]
fn no_delivery_after_unsubscribe() {
    let (store, orch) = setup();
    let (tx, rx) = mpsc::channel();
    let id = orch
        .observe_fdus(move |fdu| {
            let _ = tx.send(fdu.id);
        })
        .unwrap();
    assert_eq!(orch.subscriptions(), vec![id]);

    orch.unsubscribe(id).unwrap();
    assert!(orch.subscriptions().is_empty());

    orch.add_job(&Job {
        job_id: "j".to_string(),
        original_sender: "s".to_string(),
        kind: "k".to_string(),
        body: String::new(),
        status: "PENDING".to_string(),
    })
    .unwrap();
    store
        .put(
            "/force/sys1/tenant/t1/fdu/f1/info",
            r#"{"id":"f1","name":"n","version":"1","fdu_version":"1","hypervisor":"KVM","computation_requirements":{"cpu_arch":"x86_64","cpu_min_freq":0,"cpu_min_count":1,"ram_size_mb":1,"storage_size_mb":1},"migration_kind":"LIVE"}"#,
        )
        .unwrap();
    store.flush().unwrap();
    assert!(rx.try_recv().is_err());
}

#[test]
fn double_unsubscribe_is_not_found() {
    let (_store, orch) = setup();
    let id = orch.observe_jobs(|_| {}).unwrap();
    orch.unsubscribe(id).unwrap();
    assert!(matches!(orch.unsubscribe(id), Err(CatalogError::NotFound(_))));
}

#[test]
fn close_releases_everything() {
    let (store, orch) = setup();
    let (tx, rx) = mpsc::channel::<String>();
    let tx2 = tx.clone();
    orch.observe_clouds(move |cloud| {
        let _ = tx.send(cloud.uuid);
    })
    .unwrap();
    orch.observe_entities(move |entity| {
        let _ = tx2.send(entity.id);
    })
    .unwrap();
    assert_eq!(orch.subscriptions().len(), 2);

    orch.close().unwrap();
    assert!(orch.subscriptions().is_empty());

    orch.add_cloud(&CloudInfo {
        uuid: "k8s".to_string(),
        config: "apiVersion: v1".to_string(),
    })
    .unwrap();
    store.flush().unwrap();
    assert!(rx.try_recv().is_err());
}

#[test]
fn listener_may_write_back_to_the_catalog() {
    let (store, orch) = setup();
    let orch = Arc::new(orch);
    let catalog = orch.catalog().clone();
    let (tx, rx) = mpsc::channel();

    orch.observe_fdu_records("f1", move |record| {
        if record.state() == Ok(InstanceStatus::Onboarding) {
            let mut next = record.clone();
            next.status = InstanceStatus::Onboarded.to_string();
            catalog.put_record(&next).unwrap();
        }
        let _ = tx.send(record.status);
    })
    .unwrap();

    orch.add_fdu_record(&FduRecord::new("f1", "i1", InstanceStatus::Onboarding))
        .unwrap();
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), "ONBOARDING");
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), "ONBOARDED");
    store.flush().unwrap();
    assert_eq!(
        orch.get_fdu_record("f1", "i1").unwrap().status,
        "ONBOARDED"
    );
}

#[test]
fn job_request_is_answered_with_a_job() {
    let (store, orch) = setup();
    let catalog = orch.catalog().clone();

    orch.observe_job_requests(move |request| {
        let job = Job {
            job_id: format!("job-{}", request.sender),
            original_sender: request.sender,
            kind: request.job_kind,
            body: request.body,
            status: "PENDING".to_string(),
        };
        catalog.put(&job).unwrap();
    })
    .unwrap();

    let (tx, rx) = mpsc::channel();
    orch.observe_jobs(move |job| {
        if job.original_sender == "fim-a" {
            let _ = tx.send(job);
        }
    })
    .unwrap();

    orch.request_job(&RequestNewJobMessage {
        sender: "fim-a".to_string(),
        job_kind: "onboard".to_string(),
        body: "{}".to_string(),
    })
    .unwrap();

    let job = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(job.job_id, "job-fim-a");
    assert_eq!(job.kind, "onboard");
    store.flush().unwrap();
    assert_eq!(orch.get_all_jobs().unwrap().len(), 1);
}
