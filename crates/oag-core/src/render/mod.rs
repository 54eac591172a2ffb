//! Import planning for the generated tree. Rendering of file bodies is the
//! job of a [`crate::CodeGenerator`].

pub mod imports;
pub mod module_path;

pub use imports::{ImportPlanner, ImportRequirement, OutputTree};
