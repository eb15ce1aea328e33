//! Name → strategy lookup with aliases.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{ProfileError, ProfileResult};
use crate::strategy::{
    AllToAll, BalancedMultibody, Hierarchical, ProfileStrategy, Stabilizer, TransverseField,
};

/// Registered strategies, in registration order. Lookups are
/// case-insensitive and accept aliases.
#[derive(Clone, Default)]
pub struct ProfileRegistry {
    strategies: Vec<Arc<dyn ProfileStrategy>>,
    aliases: BTreeMap<String, String>,
}

impl ProfileRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The five built-in strategies with their legacy names as aliases.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(TransverseField), &["alternative"]);
        registry.register(Arc::new(Stabilizer), &["castle"]);
        registry.register(Arc::new(AllToAll), &["hive"]);
        registry.register(Arc::new(Hierarchical), &["empire"]);
        registry.register(Arc::new(BalancedMultibody), &["omega"]);
        registry
    }

    /// Add a strategy. A strategy with the same canonical name is replaced
    /// in place.
    pub fn register(&mut self, strategy: Arc<dyn ProfileStrategy>, aliases: &[&str]) {
        let name = strategy.name().to_string();
        for alias in aliases {
            self.aliases.insert(alias.to_lowercase(), name.clone());
        }
        match self.strategies.iter().position(|s| s.name() == name) {
            Some(index) => self.strategies[index] = strategy,
            None => self.strategies.push(strategy),
        }
    }

    /// Canonical name for a name or alias.
    pub fn resolve(&self, name: &str) -> ProfileResult<&'static str> {
        self.get(name).map(|s| s.name())
    }

    /// Strategy registered under a name or alias.
    pub fn get(&self, name: &str) -> ProfileResult<Arc<dyn ProfileStrategy>> {
        let key = name.to_lowercase();
        let canonical = self.aliases.get(&key).map_or(key.as_str(), String::as_str);
        self.strategies
            .iter()
            .find(|s| s.name() == canonical)
            .cloned()
            .ok_or_else(|| ProfileError::ProfileNotFound {
                name: name.to_string(),
                available: self.names(),
            })
    }

    /// Canonical names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.strategies.iter().map(|s| s.name().to_string()).collect()
    }

    /// Aliases that resolve to `name`.
    pub fn aliases_of(&self, name: &str) -> Vec<String> {
        self.aliases
            .iter()
            .filter(|(_, target)| target.as_str() == name)
            .map(|(alias, _)| alias.clone())
            .collect()
    }

    /// Iterate over the registered strategies.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ProfileStrategy>> {
        self.strategies.iter()
    }

    /// Number of registered strategies.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl fmt::Debug for ProfileRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileRegistry")
            .field("strategies", &self.names())
            .field("aliases", &self.aliases)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_registered_in_order() {
        let registry = ProfileRegistry::with_defaults();
        assert_eq!(
            registry.names(),
            vec![
                "transverse-field",
                "stabilizer",
                "all-to-all",
                "hierarchical",
                "balanced-multibody"
            ]
        );
    }

    #[test]
    fn test_alias_and_case_insensitive_lookup() {
        let registry = ProfileRegistry::with_defaults();
        assert_eq!(registry.resolve("Castle").unwrap(), "stabilizer");
        assert_eq!(registry.resolve("OMEGA").unwrap(), "balanced-multibody");
        assert_eq!(registry.resolve("Hierarchical").unwrap(), "hierarchical");
        assert_eq!(registry.aliases_of("all-to-all"), vec!["hive"]);
    }

    #[test]
    fn test_unknown_profile_lists_available() {
        let registry = ProfileRegistry::with_defaults();
        match registry.resolve("fortress") {
            Err(ProfileError::ProfileNotFound { name, available }) => {
                assert_eq!(name, "fortress");
                assert_eq!(available.len(), 5);
            }
            other => panic!("expected ProfileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_reregister_replaces() {
        let mut registry = ProfileRegistry::with_defaults();
        registry.register(Arc::new(Stabilizer), &["fort"]);
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.resolve("fort").unwrap(), "stabilizer");
    }
}
