use std::path::Path;

use loan_core::reference::{
    InMemoryRepository, ReferenceRepository, ReferenceSource, RepositoryError, SourceConfig,
    SourceRegistry,
};

use crate::loader::ReferenceLoader;

/// Reference source backed by a directory of CSV files.
///
/// `location` in the [`SourceConfig`] is the directory path.
pub struct CsvSource;

impl CsvSource {
    pub const NAME: &'static str = "csv";
}

impl ReferenceSource for CsvSource {
    fn source_name(&self) -> &'static str {
        Self::NAME
    }

    fn open(
        &self,
        config: &SourceConfig,
    ) -> Result<Box<dyn ReferenceRepository>, RepositoryError> {
        if config.location.trim().is_empty() {
            return Err(RepositoryError::Configuration(
                "the csv source needs a data directory".to_string(),
            ));
        }
        let configs = ReferenceLoader::load_dir(Path::new(&config.location))
            .map_err(|e| RepositoryError::Source(e.to_string()))?;
        Ok(Box::new(InMemoryRepository::new(configs)?))
    }
}

/// A registry with the built-in tables and the CSV source.
pub fn registry() -> SourceRegistry {
    let mut registry = SourceRegistry::new();
    registry.register(Box::new(CsvSource));
    registry
}
