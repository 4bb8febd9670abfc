//! Provenance classification

use std::collections::HashMap;

use attest_domain::{Claim, ClaimId, Strength};
use attest_graph::{Cycle, DependencyGraph};
use attest_witness::WitnessResult;

use crate::Histogram;

/// Whether a claim's declared tag is justified by its closure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvenanceStatus {
    /// Declared tag is no stronger than the implied tag
    Consistent,

    /// Declared tag is stronger than the implied tag
    Overclaimed,

    /// The implied tag cannot be computed
    Indeterminate,
}

impl ProvenanceStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ProvenanceStatus::Consistent => "consistent",
            ProvenanceStatus::Overclaimed => "overclaimed",
            ProvenanceStatus::Indeterminate => "indeterminate",
        }
    }
}

/// Classification of one accepted claim
#[derive(Debug, Clone, PartialEq)]
pub struct ProvenanceFinding {
    /// Claim classified
    pub claim_id: ClaimId,

    /// Strength of the declared tag
    pub declared: Strength,

    /// Weakest strength the closure permits; `None` when indeterminate
    pub implied: Option<Strength>,

    /// Outcome of the comparison
    pub status: ProvenanceStatus,

    /// Claim or cause that fixed the implied tag
    pub limited_by: Option<String>,

    /// Import sources inherited from the dependency closure
    pub import_sources: Vec<String>,
}

/// Kind of provenance warning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelWarningKind {
    /// Declared tag stronger than the closure justifies
    Label,

    /// Monotonicity could not be checked
    Indeterminate,
}

impl LabelWarningKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelWarningKind::Label => "label",
            LabelWarningKind::Indeterminate => "indeterminate",
        }
    }
}

/// A label-consistency finding; never fails the run
#[derive(Debug, Clone, PartialEq)]
pub struct LabelWarning {
    /// Kind of finding
    pub kind: LabelWarningKind,

    /// Claim the finding is about
    pub claim_id: ClaimId,

    /// Human-readable description
    pub detail: String,
}

/// Output of the provenance classifier
#[derive(Debug, Clone, Default)]
pub struct ClassifierReport {
    /// One finding per accepted claim, in claim order
    pub findings: Vec<ProvenanceFinding>,

    /// Label and indeterminate warnings, in claim order
    pub warnings: Vec<LabelWarning>,

    /// Accepted claims per provenance tag
    pub by_provenance_tag: Histogram,

    /// Accepted claims per gap classification
    pub by_gap_classification: Histogram,
}

impl ClassifierReport {
    /// Finding for a claim
    pub fn finding(&self, id: &str) -> Option<&ProvenanceFinding> {
        self.findings.iter().find(|f| f.claim_id.as_str() == id)
    }
}

/// Checks provenance monotonicity over the dependency graph
#[derive(Debug, Default)]
pub struct ProvenanceClassifier;

impl ProvenanceClassifier {
    /// Create a classifier
    pub fn new() -> Self {
        Self
    }

    /// Classify every accepted claim
    ///
    /// `claims` are the claims that passed schema validation, `cycles` the
    /// hard dependency cycles, and `witnesses` the evaluated witness results.
    pub fn classify(
        &self,
        claims: &[Claim],
        graph: &DependencyGraph,
        cycles: &[Cycle],
        witnesses: &[WitnessResult],
    ) -> ClassifierReport {
        let accepted: HashMap<&str, &Claim> =
            claims.iter().map(|c| (c.id.as_str(), c)).collect();
        let mut report = ClassifierReport::default();

        for claim in claims {
            report.by_provenance_tag.increment(claim.provenance.as_str());
            report.by_gap_classification.increment(claim.gap.as_str());

            let witness = witnesses.iter().find(|w| w.claim_id == claim.id);
            let finding = self.classify_claim(claim, graph, cycles, witness, &accepted);

            match finding.status {
                ProvenanceStatus::Overclaimed => {
                    let implied = finding.implied.map_or("unknown", |s| s.as_str());
                    let limit = finding
                        .limited_by
                        .as_deref()
                        .map(|l| format!(" (limited by {})", l))
                        .unwrap_or_default();
                    report.warnings.push(LabelWarning {
                        kind: LabelWarningKind::Label,
                        claim_id: claim.id.clone(),
                        detail: format!(
                            "declared {} but dependency closure supports at most {}{}",
                            finding.declared, implied, limit
                        ),
                    });
                }
                ProvenanceStatus::Indeterminate => {
                    report.warnings.push(LabelWarning {
                        kind: LabelWarningKind::Indeterminate,
                        claim_id: claim.id.clone(),
                        detail: finding.limited_by.clone().unwrap_or_default(),
                    });
                }
                ProvenanceStatus::Consistent => {}
            }

            report.findings.push(finding);
        }

        report
    }

    fn classify_claim(
        &self,
        claim: &Claim,
        graph: &DependencyGraph,
        cycles: &[Cycle],
        witness: Option<&WitnessResult>,
        accepted: &HashMap<&str, &Claim>,
    ) -> ProvenanceFinding {
        let mut finding = ProvenanceFinding {
            claim_id: claim.id.clone(),
            declared: claim.provenance.strength(),
            implied: None,
            status: ProvenanceStatus::Indeterminate,
            limited_by: None,
            import_sources: Vec::new(),
        };

        if let Some(cycle) = cycles.iter().find(|c| c.contains(claim.id.as_str())) {
            finding.limited_by = Some(format!("lies on dependency cycle {}", cycle));
            return finding;
        }

        let mut implied = Strength::Proved;
        for dependency in graph.closure(claim.id.as_str()) {
            if dependency == &claim.id {
                continue;
            }
            let Some(dep) = accepted.get(dependency.as_str()) else {
                finding.limited_by = Some(format!(
                    "depends on {} which failed schema validation",
                    dependency
                ));
                return finding;
            };

            let strength = dep.provenance.strength();
            if strength < implied {
                implied = strength;
                finding.limited_by = Some(dependency.to_string());
            }
            if let Some(source) = dep.provenance.source() {
                if !finding.import_sources.iter().any(|s| s == source) {
                    finding.import_sources.push(source.to_string());
                }
            }
        }

        if let Some(external) = witness.and_then(|w| w.external_inputs.first()) {
            if Strength::ImportGated < implied {
                implied = Strength::ImportGated;
                finding.limited_by = Some(format!("external constant {}", external));
            }
        }

        if witness.is_none() && claim.dependencies.is_empty() && Strength::Structural < implied {
            implied = Strength::Structural;
            finding.limited_by = Some("no witness and no dependencies".to_string());
        }

        finding.implied = Some(implied);
        finding.status = if finding.declared > implied {
            ProvenanceStatus::Overclaimed
        } else {
            ProvenanceStatus::Consistent
        };
        finding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_domain::{
        Axiom, ClaimRecord, ComparisonMode, GapClass, ProvenanceTag, Registry, Tier, WitnessSpec,
    };
    use proptest::prelude::*;

    fn tag(name: &str) -> ProvenanceTag {
        ProvenanceTag::from_parts(name, Some("source"), Some("reason")).unwrap()
    }

    fn claim(id: &str, provenance: &str, deps: &[&str]) -> Claim {
        Claim::new(id, id, Tier::new(0), tag(provenance), GapClass::Closed)
            .with_dependencies(deps.iter().copied())
    }

    fn graph_of(claims: &[Claim]) -> DependencyGraph {
        let registry = claims
            .iter()
            .fold(
                Registry::builder().axiom(Axiom::new("A1", "Axiom", "")),
                |builder, c| {
                    builder.claim(
                        ClaimRecord::new(c.id.as_str(), c.name.as_str())
                            .with_dependencies(c.dependencies.iter().map(ClaimId::as_str)),
                    )
                },
            )
            .build();
        DependencyGraph::from_registry(&registry)
    }

    fn classify(claims: &[Claim]) -> ClassifierReport {
        let graph = graph_of(claims);
        let cycles = graph.find_cycles();
        ProvenanceClassifier::new().classify(claims, &graph, &cycles, &[])
    }

    #[test]
    fn test_consistent_chain() {
        let claims = vec![
            claim("T1", "proved", &["A1"]),
            claim("T2", "proved", &["T1"]),
        ];
        let report = classify(&claims);

        assert!(report.warnings.is_empty());
        let finding = report.finding("T2").unwrap();
        assert_eq!(finding.implied, Some(Strength::Proved));
        assert_eq!(finding.status, ProvenanceStatus::Consistent);
        assert_eq!(report.by_provenance_tag.get("proved"), 2);
    }

    #[test]
    fn test_convention_dependency_is_overclaimed() {
        let claims = vec![
            claim("R1", "convention", &["A1"]),
            claim("T1", "structural", &["R1"]),
            claim("T2", "proved", &["T1"]),
        ];
        let report = classify(&claims);

        assert_eq!(report.warnings.len(), 2);
        assert!(report
            .warnings
            .iter()
            .all(|w| w.kind == LabelWarningKind::Label));

        let finding = report.finding("T2").unwrap();
        assert_eq!(finding.implied, Some(Strength::Convention));
        assert_eq!(finding.limited_by.as_deref(), Some("R1"));
        assert_eq!(finding.status, ProvenanceStatus::Overclaimed);
        assert!(report.warnings[1].detail.contains("limited by R1"));
    }

    #[test]
    fn test_import_sources_inherited() {
        let claims = vec![
            claim("T1", "import-gated", &["A1"]),
            claim("T2", "import-gated", &["T1"]),
        ];
        let report = classify(&claims);

        assert!(report.warnings.is_empty());
        assert_eq!(report.finding("T2").unwrap().import_sources, vec!["source"]);
        assert!(report.finding("T1").unwrap().import_sources.is_empty());
    }

    #[test]
    fn test_cycle_is_indeterminate() {
        let claims = vec![
            claim("T1", "proved", &["A1"]),
            claim("T2", "proved", &["T1", "T2"]),
        ];
        let report = classify(&claims);

        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, LabelWarningKind::Indeterminate);
        assert!(report.warnings[0].detail.contains("T2 -> T2"));
        assert_eq!(report.finding("T2").unwrap().implied, None);
    }

    #[test]
    fn test_rejected_dependency_is_indeterminate() {
        let claims = vec![claim("T1", "proved", &["A1"]), claim("T2", "proved", &["T1"])];
        let graph = graph_of(&claims);
        let report = ProvenanceClassifier::new().classify(&claims[1..], &graph, &[], &[]);

        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].status, ProvenanceStatus::Indeterminate);
        assert!(report.warnings[0].detail.contains("failed schema validation"));
    }

    #[test]
    fn test_ungrounded_claim_is_capped() {
        let claims = vec![claim("T1", "proved", &[])];
        let report = classify(&claims);

        let finding = report.finding("T1").unwrap();
        assert_eq!(finding.implied, Some(Strength::Structural));
        assert_eq!(finding.status, ProvenanceStatus::Overclaimed);
    }

    #[test]
    fn test_external_witness_input_caps_at_import_gated() {
        let claims = vec![claim("T1", "proved", &["A1"]).with_witness(WitnessSpec::new(
            "ratio",
            "obs",
            ComparisonMode::BooleanPredicate,
            None,
        ))];
        let graph = graph_of(&claims);
        let witness = WitnessResult {
            claim_id: ClaimId::new("T1"),
            check: "ratio".to_string(),
            mode: "interval",
            success: true,
            value: Some(5.33),
            value_text: Some("533/100".to_string()),
            expected: None,
            diagnostic: None,
            external_inputs: vec!["obs".to_string()],
            nondeterministic: false,
        };
        let report = ProvenanceClassifier::new().classify(&claims, &graph, &[], &[witness]);

        let finding = report.finding("T1").unwrap();
        assert_eq!(finding.implied, Some(Strength::ImportGated));
        assert_eq!(finding.limited_by.as_deref(), Some("external constant obs"));
    }

    #[test]
    fn test_histograms_follow_claim_order() {
        let claims = vec![
            claim("T1", "structural", &["A1"]),
            claim("T2", "proved", &["A1"]),
            claim("T3", "structural", &["A1"]),
        ];
        let report = classify(&claims);
        let tags: Vec<_> = report.by_provenance_tag.iter().collect();
        assert_eq!(tags, vec![("structural", 2), ("proved", 1)]);
        assert_eq!(report.by_gap_classification.get("closed"), 3);
    }

    fn strength_tag(index: usize) -> &'static str {
        ["convention", "import-gated", "structural", "proved"][index % 4]
    }

    proptest! {
        #[test]
        fn prop_implied_tag_never_exceeds_any_dependency(
            layout in proptest::collection::vec((0usize..4, proptest::collection::vec(0usize..64, 0..4)), 1..24)
        ) {
            let claims: Vec<Claim> = layout
                .iter()
                .enumerate()
                .map(|(i, (strength, targets))| {
                    let deps: Vec<String> = if i == 0 {
                        vec!["A1".to_string()]
                    } else {
                        targets.iter().map(|t| format!("T{}", t % i)).collect()
                    };
                    Claim::new(format!("T{}", i), "claim", Tier::new(0), tag(strength_tag(*strength)), GapClass::Closed)
                        .with_dependencies(deps)
                })
                .collect();
            let report = classify(&claims);
            let graph = graph_of(&claims);

            for claim in &claims {
                let finding = report.finding(claim.id.as_str()).unwrap();
                let implied = finding.implied.unwrap();
                for dep in graph.closure(claim.id.as_str()) {
                    let dep_claim = claims.iter().find(|c| &c.id == dep).unwrap();
                    prop_assert!(implied <= dep_claim.provenance.strength());
                }
                if finding.declared > implied {
                    prop_assert!(report
                        .warnings
                        .iter()
                        .any(|w| w.claim_id == claim.id && w.kind == LabelWarningKind::Label));
                }
            }
        }
    }
}
