//! The registry definition shipped with the engine

use crate::{Registry, RegistryError};

/// Definition of the built-in registry
pub const BUILTIN_REGISTRY: &str = include_str!("../data/registry.toml");

/// Load the built-in registry
pub fn builtin_registry() -> Result<Registry, RegistryError> {
    Registry::from_toml_str(BUILTIN_REGISTRY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_loads() {
        let registry = builtin_registry().unwrap();
        assert_eq!(registry.axioms().len(), 5);
        assert_eq!(registry.claims().len(), 38);
        assert!(registry.claim("T24").is_some());
    }

    #[test]
    fn test_builtin_dependencies_resolve() {
        let registry = builtin_registry().unwrap();
        for claim in registry.claims() {
            for dep in &claim.dependencies {
                assert!(registry.resolves(dep), "{} depends on unknown {}", claim.id, dep);
            }
        }
    }
}
