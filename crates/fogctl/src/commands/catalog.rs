use std::path::Path;

use fogcat_catalog::{CatalogAccessor, CatalogError, CatalogResult, Orchestrator};
use fogcat_core::{
    CloudInfo, Descriptor, EntityDescriptor, EntityRecord, FduDescriptor, FduRecord, FimInfo, Job,
    Record, ResourceKind, VirtualLinkDescriptor, VirtualLinkRecord,
};
use serde::Serialize;

/// Call `$f::<T>(args)` with the descriptor type of `$kind`.
macro_rules! with_descriptor {
    ($kind:expr, $f:ident($($arg:expr),*)) => {
        match $kind {
            ResourceKind::Job => $f::<Job>($($arg),*),
            ResourceKind::Fim => $f::<FimInfo>($($arg),*),
            ResourceKind::Cloud => $f::<CloudInfo>($($arg),*),
            ResourceKind::Entity => $f::<EntityDescriptor>($($arg),*),
            ResourceKind::VirtualLink => $f::<VirtualLinkDescriptor>($($arg),*),
            ResourceKind::Fdu => $f::<FduDescriptor>($($arg),*),
        }
    };
}

/// Call `$f::<T>(args)` with the record type of `$kind`.
macro_rules! with_record {
    ($kind:expr, $f:ident($($arg:expr),*)) => {
        match $kind {
            ResourceKind::Entity => $f::<EntityRecord>($($arg),*),
            ResourceKind::VirtualLink => $f::<VirtualLinkRecord>($($arg),*),
            ResourceKind::Fdu => $f::<FduRecord>($($arg),*),
            other => anyhow::bail!("{other} has no records"),
        }
    };
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// An empty listing is not an error on the command line.
fn or_empty<T>(result: CatalogResult<Vec<T>>) -> CatalogResult<Vec<T>> {
    match result {
        Err(CatalogError::NotFound(_)) => Ok(Vec::new()),
        other => other,
    }
}

pub fn put(
    orchestrator: &Orchestrator,
    kind: ResourceKind,
    file: &Path,
    record: bool,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)?;
    let catalog = orchestrator.catalog();
    if record {
        with_record!(kind, put_record(catalog, &text))
    } else {
        with_descriptor!(kind, put_descriptor(catalog, &text))
    }
}

fn put_descriptor<D: Descriptor>(catalog: &CatalogAccessor, text: &str) -> anyhow::Result<()> {
    let value = D::decode(text)?;
    catalog.put(&value)?;
    let key = catalog.namespace().descriptor_path(D::KIND, value.descriptor_id())?;
    println!("✓ Stored {key}");
    Ok(())
}

fn put_record<R: Record>(catalog: &CatalogAccessor, text: &str) -> anyhow::Result<()> {
    let value = R::decode(text)?;
    catalog.put_record(&value)?;
    let key = catalog
        .namespace()
        .record_path(R::KIND, value.descriptor_id(), value.instance_id())?;
    println!("✓ Stored {key}");
    Ok(())
}

pub fn get(
    orchestrator: &Orchestrator,
    kind: ResourceKind,
    id: &str,
    instance: Option<&str>,
) -> anyhow::Result<()> {
    let catalog = orchestrator.catalog();
    match instance {
        Some(instance) => with_record!(kind, show_record(catalog, id, instance)),
        None => with_descriptor!(kind, show_descriptor(catalog, id)),
    }
}

fn show_descriptor<D: Descriptor>(catalog: &CatalogAccessor, id: &str) -> anyhow::Result<()> {
    print_json(&catalog.get::<D>(id)?)
}

fn show_record<R: Record>(
    catalog: &CatalogAccessor,
    id: &str,
    instance: &str,
) -> anyhow::Result<()> {
    print_json(&catalog.get_record::<R>(id, instance)?)
}

pub fn list(orchestrator: &Orchestrator, kind: ResourceKind) -> anyhow::Result<()> {
    with_descriptor!(kind, list_descriptors(orchestrator.catalog()))
}

fn list_descriptors<D: Descriptor>(catalog: &CatalogAccessor) -> anyhow::Result<()> {
    print_json(&or_empty(catalog.get_all::<D>())?)
}

pub fn records(
    orchestrator: &Orchestrator,
    kind: ResourceKind,
    id: Option<&str>,
) -> anyhow::Result<()> {
    with_record!(kind, list_records(orchestrator.catalog(), id))
}

fn list_records<R: Record>(catalog: &CatalogAccessor, id: Option<&str>) -> anyhow::Result<()> {
    let records = match id {
        Some(id) => catalog.get_all_records::<R>(id),
        None => catalog.get_all_records_of_kind::<R>(),
    };
    print_json(&or_empty(records)?)
}

pub fn remove(
    orchestrator: &Orchestrator,
    kind: ResourceKind,
    id: &str,
    instance: Option<&str>,
) -> anyhow::Result<()> {
    let catalog = orchestrator.catalog();
    match instance {
        Some(instance) => with_record!(kind, remove_record(catalog, id, instance)),
        None => with_descriptor!(kind, remove_descriptor(catalog, id)),
    }
}

fn remove_descriptor<D: Descriptor>(catalog: &CatalogAccessor, id: &str) -> anyhow::Result<()> {
    catalog.remove::<D>(id)?;
    println!("✓ Removed {} {id}", D::KIND);
    Ok(())
}

fn remove_record<R: Record>(
    catalog: &CatalogAccessor,
    id: &str,
    instance: &str,
) -> anyhow::Result<()> {
    catalog.remove_record::<R>(id, instance)?;
    println!("✓ Removed {} {id} instance {instance}", R::KIND);
    Ok(())
}

pub fn path(
    orchestrator: &Orchestrator,
    kind: ResourceKind,
    id: &str,
    instance: Option<&str>,
) -> anyhow::Result<()> {
    let namespace = orchestrator.namespace();
    let key = match instance {
        Some(instance) if kind.has_records() => namespace.record_path(kind, id, instance)?,
        Some(_) => anyhow::bail!("{kind} has no records"),
        None => namespace.descriptor_path(kind, id)?,
    };
    println!("{key}");
    Ok(())
}
