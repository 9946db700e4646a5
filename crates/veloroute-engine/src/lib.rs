pub mod assemble;
pub mod error;
pub mod generate;
pub mod search;
pub mod variants;

#[cfg(test)]
mod test_support;

pub use assemble::assemble_result;
pub use error::EngineError;
pub use generate::RouteEngine;
pub use search::{ParameterSearch, SearchResult, SearchTarget};
pub use variants::{VariantOrchestrator, VariantRoute};
