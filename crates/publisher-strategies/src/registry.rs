//! Strategy registry

use std::sync::Arc;

use publisher_core::types::VersionSystem;
use tracing::debug;

use crate::dotnet::DotNetStrategy;
use crate::incremental::IncrementalStrategy;
use crate::semver::SemVerStrategy;
use crate::traits::VersionStrategy;

/// Registry of available version strategies
pub struct StrategyRegistry {
    strategies: Vec<Arc<dyn VersionStrategy>>,
}

impl StrategyRegistry {
    /// Create a new registry with all built-in strategies
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Arc::new(SemVerStrategy::new()),
                Arc::new(IncrementalStrategy::new()),
                Arc::new(DotNetStrategy::new()),
            ],
        }
    }

    /// Get the strategy numbering a version system.
    ///
    /// `manual` has no strategy: its versions are supplied by hand.
    pub fn get(&self, system: VersionSystem) -> Option<Arc<dyn VersionStrategy>> {
        let result = self.strategies.iter().find(|s| s.system() == system).cloned();
        debug!(
            system = %system,
            found = result.is_some(),
            "strategy registry lookup"
        );
        result
    }

    /// Get strategy names
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        let registry = StrategyRegistry::new();
        assert_eq!(registry.names(), vec!["semver", "incremental", ".net"]);
        assert_eq!(
            registry.get(VersionSystem::Incremental).unwrap().name(),
            "incremental"
        );
        assert!(registry.get(VersionSystem::Manual).is_none());
    }
}
