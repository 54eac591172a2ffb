//! Canonical type resolution. [`UnifiedTypeService`] is the only code that
//! maps IR schemas and operations to [`TypeDescriptor`]s.

pub mod descriptor;
pub mod envelope;
pub mod service;

pub use descriptor::{Primitive, TypeDescriptor};
pub use envelope::EnvelopeRule;
pub use service::UnifiedTypeService;
