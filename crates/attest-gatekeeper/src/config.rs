//! Gatekeeper configuration

use serde::Deserialize;

/// Configuration for schema validation rules
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Largest tier number a claim may declare
    pub max_tier: u32,

    /// Require a non-empty display name on claims and axioms
    pub require_display_name: bool,

    /// Require `source` on import-gated claims and `reason` on convention claims
    pub require_provenance_detail: bool,

    /// Require a key result statement on every claim
    pub require_key_result: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_tier: 16,
            require_display_name: true,
            require_provenance_detail: true,
            require_key_result: false,
        }
    }
}

impl ValidationConfig {
    /// Create a permissive configuration (enumerations and references only)
    pub fn permissive() -> Self {
        Self {
            max_tier: u32::MAX,
            require_display_name: false,
            require_provenance_detail: false,
            require_key_result: false,
        }
    }

    /// Create a strict configuration (all requirements enabled)
    pub fn strict() -> Self {
        Self {
            max_tier: 8,
            require_display_name: true,
            require_provenance_detail: true,
            require_key_result: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ValidationConfig::default();
        assert_eq!(config.max_tier, 16);
        assert!(config.require_display_name);
        assert!(!config.require_key_result);
    }

    #[test]
    fn test_permissive_config() {
        let config = ValidationConfig::permissive();
        assert!(!config.require_provenance_detail);
        assert_eq!(config.max_tier, u32::MAX);
    }

    #[test]
    fn test_strict_config() {
        let config = ValidationConfig::strict();
        assert!(config.require_key_result);
        assert_eq!(config.max_tier, 8);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ValidationConfig = toml::from_str("max_tier = 5").unwrap();
        assert_eq!(config.max_tier, 5);
        assert!(config.require_display_name);
    }
}
