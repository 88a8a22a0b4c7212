pub mod builtin;
pub mod factory;
pub mod repository;

pub use factory::{BuiltinSource, ReferenceSource, SourceConfig, SourceRegistry};
pub use repository::{InMemoryRepository, ReferenceRepository, RepositoryError};
