pub mod config;
pub mod error;
pub mod ir;
pub mod parse;
pub mod plan;
pub mod render;
pub mod resolve;
pub mod transform;

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Trait for emitters that turn a generation plan into files.
pub trait CodeGenerator {
    type Config;
    type Error: std::error::Error;
    fn generate(
        &self,
        plan: &plan::GenerationPlan,
        config: &Self::Config,
    ) -> Result<Vec<GeneratedFile>, Self::Error>;
}
