//! Upstream text generation contract and model selection

mod generator;
mod model;

pub use generator::TextGenerator;
pub use model::{ModelCatalog, DEFAULT_MODEL};

#[cfg(test)]
pub use generator::MockTextGenerator;
