//! fogcat-catalog — the catalog synchronization layer of the fog orchestrator.
//!
//! The orchestrator, every infrastructure manager (FIM) and every cloud
//! back-end share one key/value tuple space. This crate decides where things
//! live in it and how they are read, written and watched:
//!
//! - [`path`]: builds tenant-scoped keys and wildcard selectors, and parses
//!   keys back into `(kind, id, instance)` triples.
//! - [`accessor`]: typed get / get-all / put / remove for descriptors and
//!   records.
//! - [`subscriber`]: standing watches that decode every delivered change and
//!   hand it to a listener, with decode failures routed to an error handler.
//! - [`orchestrator`]: one facade per `(system, tenant)` scope with a
//!   CRUD + observe method set per resource kind.
//!
//! Descriptors live at `/<root>/<system>/tenant/<tenant>/<kind>/<id>/info`;
//! records at `.../<kind>/<id>/record/<instance>/info`.

pub mod accessor;
pub mod error;
pub mod orchestrator;
pub mod path;
pub mod subscriber;

pub use accessor::CatalogAccessor;
pub use error::{CatalogError, CatalogResult};
pub use orchestrator::Orchestrator;
pub use path::{Namespace, ParsedPath, Path, Selector, build_path, build_selector, segment_at};
pub use subscriber::{ChangeSubscriber, ErrorHandler, log_errors};
