pub mod name_normalizer;
pub mod promote_inline;
pub mod schema_parser;
pub mod spec_to_ir;

pub use spec_to_ir::{TransformOptions, transform, transform_with_options};
