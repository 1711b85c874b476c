//! Lookup of accessor implementations by source id.

use std::sync::Arc;

use crate::errors::MarketDataError;

/// Maps a `source` query-parameter value to an accessor implementation.
///
/// Lookup is case-insensitive. An unknown id is a client error, not a
/// server fault: callers get [`MarketDataError::InvalidInput`] naming the
/// ids that are available.
pub struct SourceRegistry<T: ?Sized> {
    sources: Vec<(&'static str, Arc<T>)>,
}

impl<T: ?Sized> SourceRegistry<T> {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn register(mut self, id: &'static str, accessor: Arc<T>) -> Self {
        self.sources.push((id, accessor));
        self
    }

    pub fn get(&self, id: &str) -> Result<Arc<T>, MarketDataError> {
        let wanted = id.to_ascii_lowercase();
        self.sources
            .iter()
            .find(|(key, _)| *key == wanted)
            .map(|(_, accessor)| accessor.clone())
            .ok_or_else(|| {
                MarketDataError::invalid(format!(
                    "unknown source '{}' (available: {})",
                    id,
                    self.ids().join(", ")
                ))
            })
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.sources.iter().map(|(key, _)| *key).collect()
    }
}

impl<T: ?Sized> Default for SourceRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Named: Send + Sync + std::fmt::Debug {
        fn name(&self) -> &'static str;
    }

    #[derive(Debug)]
    struct A;
    impl Named for A {
        fn name(&self) -> &'static str {
            "a"
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry: SourceRegistry<dyn Named> = SourceRegistry::new().register("vci", Arc::new(A));
        assert_eq!(registry.get("VCI").unwrap().name(), "a");
    }

    #[test]
    fn test_unknown_source_is_invalid_input() {
        let registry: SourceRegistry<dyn Named> = SourceRegistry::new().register("vci", Arc::new(A));
        let err = registry.get("ssi").unwrap_err();
        assert_eq!(
            format!("{}", err),
            "unknown source 'ssi' (available: vci)"
        );
    }
}
