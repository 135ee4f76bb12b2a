//! Namespace construction and parsing.
//!
//! Every key the catalog touches has the shape
//!
//! ```text
//! /<root>/<system-id>/tenant/<tenant-id>/<kind>/<id>/info
//! /<root>/<system-id>/tenant/<tenant-id>/<kind>/<id>/record/<instance-id>/info
//! ```
//!
//! [`Namespace`] bakes the scope prefix into every key it builds, so a
//! handle for one tenant cannot address another tenant's resources.
//! [`Namespace::parse`] matches a key against these templates and binds the
//! id segments by name instead of by a hard-coded index.

use std::fmt;

use fogcat_core::{ResourceKind, ScopeConfig};
use fogcat_store::selector::{SEPARATOR, WILDCARD};

use crate::error::{CatalogError, CatalogResult};

/// Segment between the system id and the tenant id.
pub const TENANT: &str = "tenant";

/// Final segment of every descriptor and record key.
pub const INFO: &str = "info";

/// Segment introducing the instance id of a record.
pub const RECORD: &str = "record";

/// Segment of the key that carries new-job requests.
pub const NEW_JOB: &str = "newjob";

/// Absolute key of exactly one stored value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path(String);

impl Path {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Wildcard pattern for multi-key reads and subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector(String);

impl Selector {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this selector matches `path`.
    pub fn matches(&self, path: &Path) -> bool {
        fogcat_store::matches(&self.0, &path.0)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A concrete path is a selector that matches only itself.
impl From<Path> for Selector {
    fn from(path: Path) -> Self {
        Selector(path.0)
    }
}

fn check_segment(segment: &str, allow_wildcard: bool) -> CatalogResult<()> {
    let reason = if segment.is_empty() {
        "empty segment"
    } else if segment.contains(SEPARATOR) {
        "segment contains the path separator"
    } else if segment == WILDCARD && !allow_wildcard {
        "wildcard in a concrete path"
    } else {
        return Ok(());
    };
    Err(CatalogError::InvalidSegment {
        segment: segment.to_string(),
        reason,
    })
}

fn join<S: AsRef<str>>(segments: &[S], allow_wildcard: bool) -> CatalogResult<String> {
    if segments.is_empty() {
        return Err(CatalogError::InvalidSegment {
            segment: String::new(),
            reason: "no segments",
        });
    }
    let mut out = String::new();
    for segment in segments {
        let segment = segment.as_ref();
        check_segment(segment, allow_wildcard)?;
        out.push(SEPARATOR);
        out.push_str(segment);
    }
    Ok(out)
}

/// Join segments into an absolute path.
pub fn build_path<S: AsRef<str>>(segments: &[S]) -> CatalogResult<Path> {
    join(segments, false).map(Path)
}

/// Join segments, any of which may be `*`, into a selector.
pub fn build_selector<S: AsRef<str>>(segments: &[S]) -> CatalogResult<Selector> {
    join(segments, true).map(Selector)
}

/// The segment at `position` (0 = first segment after the leading `/`).
pub fn segment_at(path: &str, position: usize) -> CatalogResult<&str> {
    path.strip_prefix(SEPARATOR)
        .and_then(|rest| rest.split(SEPARATOR).nth(position))
        .ok_or_else(|| CatalogError::UnrecognizedPath(path.to_string()))
}

/// Identity bound out of a catalog key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    pub kind: ResourceKind,
    pub id: String,
    /// Present for record keys only.
    pub instance_id: Option<String>,
}

/// The `(system-id, tenant-id)` scope all keys are built under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    root: String,
    system_id: String,
    tenant_id: String,
}

impl Namespace {
    pub fn new(root: &str, system_id: &str, tenant_id: &str) -> CatalogResult<Self> {
        for segment in [root, system_id, tenant_id] {
            check_segment(segment, false)?;
        }
        Ok(Self {
            root: root.to_string(),
            system_id: system_id.to_string(),
            tenant_id: tenant_id.to_string(),
        })
    }

    pub fn from_scope(scope: &ScopeConfig) -> CatalogResult<Self> {
        Self::new(&scope.root, &scope.system_id, &scope.tenant_id)
    }

    pub fn system_id(&self) -> &str {
        &self.system_id
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    fn prefix(&self) -> [&str; 4] {
        [
            self.root.as_str(),
            self.system_id.as_str(),
            TENANT,
            self.tenant_id.as_str(),
        ]
    }

    fn scoped<'a>(&'a self, tail: &[&'a str]) -> Vec<&'a str> {
        let mut segments = self.prefix().to_vec();
        segments.extend_from_slice(tail);
        segments
    }

    /// The prefix every key in this scope starts with.
    pub fn scope_path(&self) -> CatalogResult<Path> {
        build_path(&self.prefix())
    }

    // ── Descriptors ────────────────────────────────────────────────

    pub fn descriptor_path(&self, kind: ResourceKind, id: &str) -> CatalogResult<Path> {
        build_path(&self.scoped(&[kind.segment(), id, INFO]))
    }

    /// Every descriptor of `kind`.
    pub fn descriptors_selector(&self, kind: ResourceKind) -> CatalogResult<Selector> {
        build_selector(&self.scoped(&[kind.segment(), WILDCARD, INFO]))
    }

    // ── Records ────────────────────────────────────────────────────

    pub fn record_path(
        &self,
        kind: ResourceKind,
        id: &str,
        instance_id: &str,
    ) -> CatalogResult<Path> {
        build_path(&self.scoped(&[kind.segment(), id, RECORD, instance_id, INFO]))
    }

    /// Every record of descriptor `id`.
    pub fn records_selector(&self, kind: ResourceKind, id: &str) -> CatalogResult<Selector> {
        check_segment(id, false)?;
        build_selector(&self.scoped(&[kind.segment(), id, RECORD, WILDCARD, INFO]))
    }

    /// Every record of every descriptor of `kind`.
    pub fn all_records_selector(&self, kind: ResourceKind) -> CatalogResult<Selector> {
        build_selector(&self.scoped(&[kind.segment(), WILDCARD, RECORD, WILDCARD, INFO]))
    }

    /// The record with `instance_id`, whichever descriptor it belongs to.
    pub fn instance_selector(
        &self,
        kind: ResourceKind,
        instance_id: &str,
    ) -> CatalogResult<Selector> {
        check_segment(instance_id, false)?;
        build_selector(&self.scoped(&[kind.segment(), WILDCARD, RECORD, instance_id, INFO]))
    }

    // ── Job requests ───────────────────────────────────────────────

    /// The single key a new-job request is written to.
    pub fn job_request_path(&self) -> CatalogResult<Path> {
        build_path(&self.scoped(&[NEW_JOB]))
    }

    pub fn job_request_selector(&self) -> CatalogResult<Selector> {
        build_selector(&self.scoped(&[NEW_JOB]))
    }

    // ── Parsing ────────────────────────────────────────────────────

    /// Match `path` against the descriptor and record templates of this scope.
    pub fn parse(&self, path: &str) -> CatalogResult<ParsedPath> {
        let unrecognized = || CatalogError::UnrecognizedPath(path.to_string());

        let segments: Vec<&str> = path
            .strip_prefix(SEPARATOR)
            .ok_or_else(unrecognized)?
            .split(SEPARATOR)
            .collect();
        let prefix = self.prefix();
        if segments.len() < prefix.len() || segments[..prefix.len()] != prefix {
            return Err(unrecognized());
        }

        let (kind, id, instance_id) = match &segments[prefix.len()..] {
            [kind, id, INFO] => (*kind, *id, None),
            [kind, id, RECORD, instance_id, INFO] => (*kind, *id, Some(*instance_id)),
            _ => return Err(unrecognized()),
        };
        let kind = ResourceKind::from_segment(kind).ok_or_else(unrecognized)?;
        for segment in std::iter::once(id).chain(instance_id) {
            if segment.is_empty() || segment == WILDCARD {
                return Err(unrecognized());
            }
        }

        Ok(ParsedPath {
            kind,
            id: id.to_string(),
            instance_id: instance_id.map(str::to_string),
        })
    }

    /// The descriptor id in a key of `kind`.
    pub fn extract_id(&self, kind: ResourceKind, path: &str) -> CatalogResult<String> {
        let parsed = self.parse(path)?;
        if parsed.kind != kind {
            return Err(CatalogError::UnrecognizedPath(path.to_string()));
        }
        Ok(parsed.id)
    }

    /// The instance id in a record key of `kind`.
    pub fn extract_instance_id(&self, kind: ResourceKind, path: &str) -> CatalogResult<String> {
        match self.parse(path)? {
            ParsedPath {
                kind: found,
                instance_id: Some(instance_id),
                ..
            } if found == kind => Ok(instance_id),
            _ => Err(CatalogError::UnrecognizedPath(path.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns() -> Namespace {
        Namespace::new("force", "sys1", "t1").unwrap()
    }

    #[test]
    fn builds_documented_layout() {
        let ns = ns();
        assert_eq!(
            ns.descriptor_path(ResourceKind::Fdu, "f1").unwrap().as_str(),
            "/force/sys1/tenant/t1/fdu/f1/info"
        );
        assert_eq!(
            ns.record_path(ResourceKind::Entity, "e1", "i1").unwrap().as_str(),
            "/force/sys1/tenant/t1/entity/e1/record/i1/info"
        );
        assert_eq!(
            ns.descriptors_selector(ResourceKind::VirtualLink).unwrap().as_str(),
            "/force/sys1/tenant/t1/vl/*/info"
        );
        assert_eq!(
            ns.all_records_selector(ResourceKind::Fdu).unwrap().as_str(),
            "/force/sys1/tenant/t1/fdu/*/record/*/info"
        );
        assert_eq!(
            ns.instance_selector(ResourceKind::Entity, "i9").unwrap().as_str(),
            "/force/sys1/tenant/t1/entity/*/record/i9/info"
        );
        assert_eq!(ns.scope_path().unwrap().as_str(), "/force/sys1/tenant/t1");
    }

    #[test]
    fn job_request_key_sits_beside_the_kinds() {
        let ns = ns();
        let path = ns.job_request_path().unwrap();
        assert_eq!(path.as_str(), "/force/sys1/tenant/t1/newjob");
        assert!(ns.job_request_selector().unwrap().matches(&path));
        assert!(!ns.descriptors_selector(ResourceKind::Job).unwrap().matches(&path));
        assert!(matches!(
            ns.parse(path.as_str()),
            Err(CatalogError::UnrecognizedPath(_))
        ));
    }

    #[test]
    fn malformed_segments_are_rejected() {
        assert!(matches!(
            build_path(&["force", ""]),
            Err(CatalogError::InvalidSegment { .. })
        ));
        assert!(matches!(
            build_path(&["force", "a/b"]),
            Err(CatalogError::InvalidSegment { .. })
        ));
        assert!(matches!(
            build_path(&["force", "*"]),
            Err(CatalogError::InvalidSegment { .. })
        ));
        assert!(build_path::<&str>(&[]).is_err());
        assert!(build_selector(&["force", "*"]).is_ok());

        let ns = ns();
        assert!(ns.descriptor_path(ResourceKind::Fim, "a/b").is_err());
        assert!(ns.records_selector(ResourceKind::Fdu, "*").is_err());
        assert!(Namespace::new("force", "", "t1").is_err());
    }

    #[test]
    fn segment_at_inverts_build() {
        let segments = ["force", "sys1", "tenant", "t1", "fdu", "f1", "record", "i1", "info"];
        let path = build_path(&segments).unwrap();
        for (position, segment) in segments.iter().enumerate() {
            assert_eq!(segment_at(path.as_str(), position).unwrap(), *segment);
        }
        assert!(segment_at(path.as_str(), segments.len()).is_err());
        assert!(segment_at("relative/path", 0).is_err());
    }

    #[test]
    fn selector_matches_any_value_in_wildcard_position() {
        let ns = ns();
        let selector = ns.records_selector(ResourceKind::Fdu, "f1").unwrap();
        for instance in ["i1", "i2", "0d6f-4c1a"] {
            let path = ns.record_path(ResourceKind::Fdu, "f1", instance).unwrap();
            assert!(selector.matches(&path));
        }
        let other = ns.record_path(ResourceKind::Fdu, "f2", "i1").unwrap();
        assert!(!selector.matches(&other));
        let descriptor = ns.descriptor_path(ResourceKind::Fdu, "f1").unwrap();
        assert!(Selector::from(descriptor.clone()).matches(&descriptor));
    }

    #[test]
    fn parse_binds_named_segments_for_every_kind() {
        let ns = ns();
        for kind in ResourceKind::ALL {
            let path = ns.descriptor_path(kind, "d-1").unwrap();
            assert_eq!(
                ns.parse(path.as_str()).unwrap(),
                ParsedPath {
                    kind,
                    id: "d-1".to_string(),
                    instance_id: None,
                }
            );
            assert_eq!(ns.extract_id(kind, path.as_str()).unwrap(), "d-1");
            assert!(ns.extract_instance_id(kind, path.as_str()).is_err());

            let record = ns.record_path(kind, "d-1", "i-7").unwrap();
            assert_eq!(ns.extract_id(kind, record.as_str()).unwrap(), "d-1");
            assert_eq!(ns.extract_instance_id(kind, record.as_str()).unwrap(), "i-7");
        }
    }

    #[test]
    fn parse_is_independent_of_prefix_depth() {
        // Same template, different root: ids are still bound correctly.
        let ns = Namespace::new("fog05-orchestrator", "sys1", "t1").unwrap();
        let path = ns.record_path(ResourceKind::Fdu, "f1", "i1").unwrap();
        assert_eq!(ns.extract_id(ResourceKind::Fdu, path.as_str()).unwrap(), "f1");
    }

    #[test]
    fn parse_rejects_foreign_or_malformed_keys() {
        let ns = ns();
        let other_tenant = Namespace::new("force", "sys1", "t2").unwrap();
        let path = other_tenant.descriptor_path(ResourceKind::Fim, "a").unwrap();
        assert!(ns.parse(path.as_str()).is_err());

        for bad in [
            "/force/sys1/tenant/t1/fim/a",
            "/force/sys1/tenant/t1/disk/a/info",
            "/force/sys1/tenant/t1/fdu/f1/records/i1/info",
            "/force/sys1/tenant/t1/fdu/*/info",
            "/force/sys1/tenant/t1/fdu//info",
            "force/sys1/tenant/t1/fdu/f1/info",
        ] {
            assert!(ns.parse(bad).is_err(), "{bad} should not parse");
        }

        let fdu = ns.descriptor_path(ResourceKind::Fdu, "f1").unwrap();
        assert!(ns.extract_id(ResourceKind::Fim, fdu.as_str()).is_err());
    }
}
