//! Verification pipeline

use attest_classifier::ProvenanceClassifier;
use attest_domain::Registry;
use attest_gatekeeper::{Gatekeeper, ValidationConfig};
use attest_graph::{DependencyGraph, GraphConfig, GraphValidator};
use attest_witness::WitnessEvaluator;
use serde::Deserialize;
use tracing::{debug, info, info_span, warn};

use crate::report::RunReport;

/// Engine configuration
///
/// Loaded from the `[engine]` section of the CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Groups of claims whose mutual dependencies are intentional
    pub allowed_cycles: Vec<Vec<String>>,

    /// Schema validation rules
    pub validation: ValidationConfig,
}

/// Runs the verification pipeline over a registry
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create an engine with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The engine's configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run every check over `registry` and assemble the report
    ///
    /// A run never aborts part-way: violations and failed witnesses are
    /// recorded in the report rather than returned as errors.
    pub fn run(&self, registry: &Registry) -> RunReport {
        let span = info_span!("run", claims = registry.claims().len());
        let _enter = span.enter();
        info!(
            axioms = registry.axioms().len(),
            constants = registry.constants().len(),
            claims = registry.claims().len(),
            "Starting verification run"
        );

        let schema = Gatekeeper::new(self.config.validation.clone()).validate(registry);
        debug!(
            accepted = schema.accepted.len(),
            violations = schema.violations.len(),
            "Schema validation complete"
        );
        for violation in &schema.violations {
            warn!(kind = violation.kind().as_str(), "{}", violation);
        }

        let graph = DependencyGraph::from_registry(registry);
        let graph_report = GraphValidator::new(GraphConfig {
            allowed_cycles: self.config.allowed_cycles.clone(),
        })
        .validate(&graph, registry);
        debug!(
            nodes = graph.len(),
            cycles = graph_report.cycles.len(),
            allowed = graph_report.allowed_cycles.len(),
            warnings = graph_report.warnings.len(),
            "Graph validation complete"
        );
        for cycle in &graph_report.cycles {
            warn!(kind = "cycle", "Dependency cycle: {}", cycle);
        }

        let witnesses = WitnessEvaluator::from_constants(&schema.constants).evaluate_all(&schema.accepted);
        debug!(
            evaluated = witnesses.len(),
            failed = witnesses.iter().filter(|w| !w.success).count(),
            "Witness evaluation complete"
        );
        for failure in witnesses.iter().filter(|w| !w.success) {
            warn!(
                claim = %failure.claim_id,
                check = %failure.check,
                "Witness failed: {}",
                failure.diagnostic.as_deref().unwrap_or("no diagnostic")
            );
        }

        let classification = ProvenanceClassifier::new().classify(
            &schema.accepted,
            &graph,
            &graph_report.cycles,
            &witnesses,
        );
        debug!(
            warnings = classification.warnings.len(),
            "Provenance classification complete"
        );

        let report = RunReport::assemble(registry, &schema, &graph_report, &witnesses, &classification);
        info!(
            passed = report.passed_claims,
            total = report.total_claims,
            violations = report.violations.len(),
            warnings = report.warnings.len(),
            overall_pass = report.overall_pass,
            "Verification run complete"
        );
        report
    }
}
