//! Descriptor/record pairs for every managed resource kind.
//!
//! Optional fields are `Option`s that are omitted from the encoded document
//! when absent, so "absent" and "explicitly empty" survive a round trip.

pub mod entity;
pub mod fdu;
pub mod infra;
pub mod job;
pub mod vl;

pub use entity::*;
pub use fdu::*;
pub use infra::*;
pub use job::*;
pub use vl::*;
