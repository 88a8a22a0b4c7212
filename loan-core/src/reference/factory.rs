use std::collections::HashMap;

use super::repository::{InMemoryRepository, ReferenceRepository, RepositoryError};

/// Where reference tables come from.
///
/// `source` must match the [`ReferenceSource::source_name`] of a registered
/// source. `location` is passed through unchanged and its meaning is up to
/// the source.
///
/// | source    | location examples            |
/// |-----------|------------------------------|
/// | `builtin` | ignored                      |
/// | `csv`     | `./reference`, `/etc/loans`  |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Lowercase identifier matching a registered source (e.g. `"csv"`).
    pub source: String,
    /// Opaque value forwarded to the source's `open` method.
    pub location: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            source: BuiltinSource::NAME.to_string(),
            location: String::new(),
        }
    }
}

/// One implementation per kind of reference-table storage, registered with a
/// [`SourceRegistry`] at startup.
pub trait ReferenceSource: Send + Sync {
    /// Unique, lowercase identifier for this source.
    fn source_name(&self) -> &'static str;

    /// Load the tables and return a ready-to-use repository.
    fn open(
        &self,
        config: &SourceConfig,
    ) -> Result<Box<dyn ReferenceRepository>, RepositoryError>;
}

/// The tables compiled into the crate.
pub struct BuiltinSource;

impl BuiltinSource {
    pub const NAME: &'static str = "builtin";
}

impl ReferenceSource for BuiltinSource {
    fn source_name(&self) -> &'static str {
        Self::NAME
    }

    fn open(
        &self,
        _config: &SourceConfig,
    ) -> Result<Box<dyn ReferenceRepository>, RepositoryError> {
        Ok(Box::new(InMemoryRepository::builtin()?))
    }
}

/// Registry of [`ReferenceSource`] instances, keyed by source name.
///
/// Typical lifetime:
/// 1. Create with `SourceRegistry::new()` (which registers `builtin`).
/// 2. Call `register` once per additional source.
/// 3. Call `open` with the configured [`SourceConfig`].
pub struct SourceRegistry {
    sources: HashMap<&'static str, Box<dyn ReferenceSource>>,
}

impl SourceRegistry {
    /// Create a registry holding only the built-in source.
    pub fn new() -> Self {
        let mut registry = Self {
            sources: HashMap::new(),
        };
        registry.register(Box::new(BuiltinSource));
        registry
    }

    /// Register a source.
    ///
    /// If a source with the same [`ReferenceSource::source_name`] is already
    /// present it is silently replaced.
    pub fn register(
        &mut self,
        source: Box<dyn ReferenceSource>,
    ) {
        self.sources.insert(source.source_name(), source);
    }

    /// Names of every registered source, sorted alphabetically.
    pub fn available_sources(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.sources.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the source that matches `config.source`.
    ///
    /// # Errors
    /// * [`RepositoryError::Configuration`] when no source is registered
    ///   under the requested name.
    /// * Any error the chosen source itself returns.
    pub fn open(
        &self,
        config: &SourceConfig,
    ) -> Result<Box<dyn ReferenceRepository>, RepositoryError> {
        let source = self.sources.get(config.source.as_str()).ok_or_else(|| {
            RepositoryError::Configuration(format!(
                "unknown reference source '{}'; available: {:?}",
                config.source,
                self.available_sources()
            ))
        })?;

        source.open(config)
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// tests
// ─────────────────────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::models::TaxYear;

    // ── stub source ──────────────────────────────────────────────────────
    /// A source whose `open` flips an `AtomicBool` and returns an empty
    /// repository, so tests can prove dispatch reached it.
    struct StubSource {
        name: &'static str,
        called: Arc<AtomicBool>,
    }

    impl ReferenceSource for StubSource {
        fn source_name(&self) -> &'static str {
            self.name
        }
        fn open(
            &self,
            _config: &SourceConfig,
        ) -> Result<Box<dyn ReferenceRepository>, RepositoryError> {
            self.called.store(true, Ordering::SeqCst);
            Ok(Box::new(InMemoryRepository::default()))
        }
    }

    /// A source that always fails, to check errors surface unchanged.
    struct FailingSource;

    impl ReferenceSource for FailingSource {
        fn source_name(&self) -> &'static str {
            "failing"
        }
        fn open(
            &self,
            _config: &SourceConfig,
        ) -> Result<Box<dyn ReferenceRepository>, RepositoryError> {
            Err(RepositoryError::Source("intentional failure".to_string()))
        }
    }

    fn stub_source(name: &'static str) -> (Box<dyn ReferenceSource>, Arc<AtomicBool>) {
        let flag = Arc::new(AtomicBool::new(false));
        (
            Box::new(StubSource {
                name,
                called: flag.clone(),
            }),
            flag,
        )
    }

    fn config(source: &str) -> SourceConfig {
        SourceConfig {
            source: source.to_string(),
            location: "x".to_string(),
        }
    }

    // ── SourceConfig ─────────────────────────────────────────────────────
    #[test]
    fn source_config_default_is_builtin() {
        let cfg = SourceConfig::default();
        assert_eq!(cfg.source, "builtin");
        assert!(cfg.location.is_empty());
    }

    // ── registration ─────────────────────────────────────────────────────
    #[test]
    fn new_registry_has_builtin_source() {
        assert_eq!(SourceRegistry::new().available_sources(), vec!["builtin"]);
    }

    #[test]
    fn available_sources_is_sorted() {
        let mut reg = SourceRegistry::new();
        let (f1, _) = stub_source("csv");
        let (f2, _) = stub_source("archive");
        reg.register(f1);
        reg.register(f2);
        assert_eq!(reg.available_sources(), vec!["archive", "builtin", "csv"]);
    }

    #[test]
    fn duplicate_registration_replaces_previous() {
        let mut reg = SourceRegistry::new();
        let (old, old_called) = stub_source("csv");
        let (new, new_called) = stub_source("csv");
        reg.register(old);
        reg.register(new);

        reg.open(&config("csv")).unwrap();

        assert!(!old_called.load(Ordering::SeqCst));
        assert!(new_called.load(Ordering::SeqCst));
    }

    // ── dispatch ─────────────────────────────────────────────────────────
    #[test]
    fn open_builtin_serves_shipped_years() {
        let repo = SourceRegistry::new()
            .open(&SourceConfig::default())
            .unwrap();

        assert!(repo.list_tax_years().unwrap().contains(&TaxYear(2025)));
    }

    #[test]
    fn open_calls_matching_source_only() {
        let mut reg = SourceRegistry::new();
        let (csv, csv_called) = stub_source("csv");
        let (archive, archive_called) = stub_source("archive");
        reg.register(csv);
        reg.register(archive);

        let result = reg.open(&config("csv"));

        assert!(result.is_ok());
        assert!(csv_called.load(Ordering::SeqCst));
        assert!(!archive_called.load(Ordering::SeqCst));
    }

    // ── unknown source ───────────────────────────────────────────────────
    #[test]
    fn configuration_error_names_requested_and_available_sources() {
        let reg = SourceRegistry::new();

        match reg.open(&config("postgres")) {
            Err(RepositoryError::Configuration(msg)) => {
                assert!(msg.contains("postgres"), "error should name the requested source");
                assert!(msg.contains("builtin"), "error should list available sources");
            }
            Err(other) => panic!("expected Configuration error, got {other:#?}"),
            Ok(_) => panic!("expected Configuration error, got a repository"),
        }
    }

    // ── source errors propagate ──────────────────────────────────────────
    #[test]
    fn open_propagates_source_error() {
        let mut reg = SourceRegistry::new();
        reg.register(Box::new(FailingSource));

        assert!(matches!(
            reg.open(&config("failing")),
            Err(RepositoryError::Source(msg)) if msg == "intentional failure"
        ));
    }
}
