//! Dependency graph validation

use std::collections::HashSet;

use attest_domain::{ClaimId, Registry};

use crate::{Cycle, DependencyGraph, GraphConfig};

/// Kind of soft graph finding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphWarningKind {
    /// Cycle covered by the exception list
    AllowedCycle,

    /// Claim depends on a claim of a later declared tier
    TierOrder,

    /// Axiom no claim references
    UnusedAxiom,
}

impl GraphWarningKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphWarningKind::AllowedCycle => "allowed-cycle",
            GraphWarningKind::TierOrder => "tier-order",
            GraphWarningKind::UnusedAxiom => "unused-axiom",
        }
    }
}

/// A soft finding that does not fail the run
#[derive(Debug, Clone, PartialEq)]
pub struct GraphWarning {
    /// Kind of finding
    pub kind: GraphWarningKind,

    /// Claim or axiom the finding is about
    pub subject: String,

    /// Human-readable description
    pub detail: String,
}

/// Outcome of graph validation
#[derive(Debug, Clone, Default)]
pub struct GraphReport {
    /// Cycles that are hard violations
    pub cycles: Vec<Cycle>,

    /// Cycles covered by the exception list
    pub allowed_cycles: Vec<Cycle>,

    /// Implied tier per claim, in registry order
    pub implied_tiers: Vec<(ClaimId, Option<u32>)>,

    /// Soft findings in emission order
    pub warnings: Vec<GraphWarning>,
}

impl GraphReport {
    /// Whether no hard cycle was found
    pub fn is_acyclic(&self) -> bool {
        self.cycles.is_empty()
    }

    /// Implied tier of a claim
    pub fn implied_tier(&self, id: &str) -> Option<u32> {
        self.implied_tiers
            .iter()
            .find(|(claim, _)| claim.as_str() == id)
            .and_then(|(_, tier)| *tier)
    }

    /// Whether the claim lies on a cycle that is a hard violation
    pub fn on_hard_cycle(&self, id: &str) -> bool {
        self.cycles.iter().any(|cycle| cycle.contains(id))
    }
}

/// Validates the claim dependency graph
pub struct GraphValidator {
    config: GraphConfig,
}

impl GraphValidator {
    /// Create a validator with the given configuration
    pub fn new(config: GraphConfig) -> Self {
        Self { config }
    }

    /// Validate the graph built from `registry`
    pub fn validate(&self, graph: &DependencyGraph, registry: &Registry) -> GraphReport {
        let mut report = GraphReport::default();

        for cycle in graph.find_cycles() {
            if self.config.allows(cycle.members().iter().map(ClaimId::as_str)) {
                report.warnings.push(GraphWarning {
                    kind: GraphWarningKind::AllowedCycle,
                    subject: cycle.revisited().to_string(),
                    detail: format!("designed mutual constraint {}", cycle),
                });
                report.allowed_cycles.push(cycle);
            } else {
                report.cycles.push(cycle);
            }
        }

        report.implied_tiers = graph
            .nodes()
            .iter()
            .cloned()
            .zip(graph.implied_tiers())
            .collect();

        for id in graph.nodes() {
            let Some(tier) = registry.claim(id.as_str()).and_then(|c| c.tier) else {
                continue;
            };
            for dependency in graph.dependencies(id.as_str()) {
                let Some(dep_tier) = registry.claim(dependency.as_str()).and_then(|c| c.tier) else {
                    continue;
                };
                if dep_tier > tier {
                    report.warnings.push(GraphWarning {
                        kind: GraphWarningKind::TierOrder,
                        subject: id.to_string(),
                        detail: format!(
                            "tier {} claim depends on {} declared at tier {}",
                            tier, dependency, dep_tier
                        ),
                    });
                }
            }
        }

        let referenced: HashSet<&str> = registry
            .claims()
            .iter()
            .flat_map(|claim| claim.dependencies.iter().map(String::as_str))
            .collect();
        let mut reported = HashSet::new();
        for axiom in registry.axioms() {
            if !referenced.contains(axiom.id.as_str()) && reported.insert(axiom.id.as_str()) {
                report.warnings.push(GraphWarning {
                    kind: GraphWarningKind::UnusedAxiom,
                    subject: axiom.id.clone(),
                    detail: format!("axiom '{}' is not referenced by any claim", axiom.name),
                });
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_domain::{builtin_registry, Axiom, ClaimRecord};

    fn claim(id: &str, tier: i64, deps: &[&str]) -> ClaimRecord {
        ClaimRecord::new(id, id)
            .with_tier(tier)
            .with_dependencies(deps.iter().copied())
    }

    fn validate(registry: &Registry, config: GraphConfig) -> GraphReport {
        let graph = DependencyGraph::from_registry(registry);
        GraphValidator::new(config).validate(&graph, registry)
    }

    #[test]
    fn test_cycle_is_violation_by_default() {
        let registry = Registry::builder()
            .axiom(Axiom::new("A1", "Axiom", ""))
            .claim(claim("T1", 0, &["A1", "T2"]))
            .claim(claim("T2", 0, &["T1"]))
            .build();
        let report = validate(&registry, GraphConfig::default());

        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.cycles[0].to_string(), "T1 -> T2 -> T1");
        assert!(report.on_hard_cycle("T2"));
        assert_eq!(report.implied_tier("T1"), None);
    }

    #[test]
    fn test_allowed_cycle_is_warning() {
        let registry = Registry::builder()
            .axiom(Axiom::new("A1", "Axiom", ""))
            .claim(claim("T1", 0, &["A1", "T2"]))
            .claim(claim("T2", 0, &["T1"]))
            .build();
        let config = GraphConfig {
            allowed_cycles: vec![vec!["T1".to_string(), "T2".to_string()]],
        };
        let report = validate(&registry, config);

        assert!(report.is_acyclic());
        assert_eq!(report.allowed_cycles.len(), 1);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, GraphWarningKind::AllowedCycle);
        assert!(!report.on_hard_cycle("T1"));
    }

    #[test]
    fn test_tier_order_warning() {
        let registry = Registry::builder()
            .axiom(Axiom::new("A1", "Axiom", ""))
            .claim(claim("T1", 2, &["A1"]))
            .claim(claim("T2", 1, &["T1"]))
            .claim(claim("T3", 3, &["T2"]))
            .build();
        let report = validate(&registry, GraphConfig::default());

        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, GraphWarningKind::TierOrder);
        assert_eq!(report.warnings[0].subject, "T2");
        assert_eq!(report.implied_tier("T3"), Some(2));
    }

    #[test]
    fn test_unused_axiom_warning() {
        let registry = Registry::builder()
            .axiom(Axiom::new("A1", "Used", ""))
            .axiom(Axiom::new("A2", "Unused", ""))
            .claim(claim("T1", 0, &["A1"]))
            .build();
        let report = validate(&registry, GraphConfig::default());

        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind.as_str(), "unused-axiom");
        assert_eq!(report.warnings[0].subject, "A2");
    }

    #[test]
    fn test_builtin_registry() {
        let registry = builtin_registry().unwrap();
        let report = validate(&registry, GraphConfig::default());

        assert!(report.is_acyclic());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].subject, "T9_grav");
        assert!(report.warnings[0].detail.contains("Gamma_closure"));
        assert!(report.implied_tiers.iter().all(|(_, tier)| tier.is_some()));
    }
}
