//! The run report and its assembly

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use attest_classifier::{ClassifierReport, Histogram, ProvenanceStatus};
use attest_domain::{Claim, ClaimRecord, Registry};
use attest_gatekeeper::SchemaReport;
use attest_graph::GraphReport;
use attest_witness::WitnessResult;
use serde::Serialize;

use crate::audit::{self, AuditCheck};
use crate::Result;

/// A hard structural violation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationEntry {
    /// `schema`, `duplicate-id`, `dangling-reference` or `cycle`
    pub kind: String,

    /// Offending claim, axiom or constant
    pub claim_id: String,

    /// Offending field, for schema violations
    pub field: Option<String>,

    /// Human-readable description
    pub detail: String,
}

/// A soft finding
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningEntry {
    /// `allowed-cycle`, `tier-order`, `unused-axiom`, `label` or `indeterminate`
    pub kind: String,

    /// Claim or axiom the finding is about
    pub claim_id: String,

    /// Human-readable description
    pub detail: String,
}

/// One evaluated witness
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WitnessEntry {
    /// Claim the witness belongs to
    pub claim_id: String,

    /// Name of the check
    pub check: String,

    /// Comparison mode
    pub mode: String,

    /// Whether the check held
    pub success: bool,

    /// Numeric value produced
    pub value: Option<f64>,

    /// Exact rendering of the value produced
    pub value_text: Option<String>,

    /// Numeric expected value
    pub expected: Option<f64>,

    /// Why the check failed
    pub diagnostic: Option<String>,

    /// External constants consumed
    pub external_inputs: Vec<String>,

    /// Whether the two evaluation passes disagreed
    pub nondeterministic: bool,
}

impl From<&WitnessResult> for WitnessEntry {
    fn from(result: &WitnessResult) -> Self {
        Self {
            claim_id: result.claim_id.to_string(),
            check: result.check.clone(),
            mode: result.mode.to_string(),
            success: result.success,
            value: result.value,
            value_text: result.value_text.clone(),
            expected: result.expected,
            diagnostic: result.diagnostic.clone(),
            external_inputs: result.external_inputs.clone(),
            nondeterministic: result.nondeterministic,
        }
    }
}

/// What happened to a claim's witness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WitnessState {
    /// The claim declares no witness
    None,

    /// The witness held
    Passed,

    /// The witness failed or could not be computed
    Failed,

    /// The claim was rejected before its witness could run
    Skipped,
}

impl WitnessState {
    /// Get the state name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            WitnessState::None => "none",
            WitnessState::Passed => "passed",
            WitnessState::Failed => "failed",
            WitnessState::Skipped => "skipped",
        }
    }
}

/// Per-claim status row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimStatus {
    /// Identifier as defined
    pub id: String,

    /// Display name
    pub name: String,

    /// Declared tier, if valid
    pub tier: Option<u32>,

    /// Declared provenance tag, as defined
    pub provenance: Option<String>,

    /// Import source or convention reason
    pub provenance_detail: Option<String>,

    /// Declared gap classification, as defined
    pub gap: Option<String>,

    /// Whether the claim passed every hard check
    pub passed: bool,

    /// Witness outcome
    pub witness: WitnessState,

    /// Weakest tag the dependency closure permits
    pub implied_tag: Option<String>,

    /// Tier implied by the longest dependency path
    pub implied_tier: Option<u32>,

    /// `consistent`, `overclaimed`, `indeterminate`, or `unchecked` for
    /// claims rejected by schema validation
    pub provenance_status: String,

    /// One-line statement of the result
    pub key_result: Option<String>,

    /// Declared dependencies
    pub dependencies: Vec<String>,
}

/// Claims grouped by declared tier
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierSummary {
    /// Tier number
    pub tier: u32,

    /// Claims in the tier
    pub claims: usize,

    /// Claims in the tier that passed
    pub passed: usize,

    /// Claims in the tier carrying a witness
    pub witnessed: usize,
}

/// A cited external result and the claims citing it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportEntry {
    /// Reference as written
    pub source: String,

    /// `provenance` for import-gated sources, `citation` for cited theorems
    pub kind: String,

    /// Citing claims, in registry order
    pub used_by: Vec<String>,
}

/// The single artifact of a verification run
///
/// Immutable once assembled; every rendering derives from it without
/// recomputation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Version of the engine that produced the report
    pub engine_version: String,

    /// Claim records in the registry
    pub total_claims: usize,

    /// Claims that passed every hard check
    pub passed_claims: usize,

    /// True iff there are no violations and no witness failures
    pub overall_pass: bool,

    /// Process exit status derived from `overall_pass`
    pub exit_status: i32,

    /// Accepted claims per provenance tag, in first-appearance order
    pub by_provenance_tag: Histogram,

    /// Accepted claims per gap classification, in first-appearance order
    pub by_gap_classification: Histogram,

    /// Hard structural violations
    pub violations: Vec<ViolationEntry>,

    /// Every evaluated witness
    pub witness_results: Vec<WitnessEntry>,

    /// Soft findings
    pub warnings: Vec<WarningEntry>,

    /// Per-claim status, in registry order
    pub claims: Vec<ClaimStatus>,

    /// Per-tier summary, ascending
    pub tiers: Vec<TierSummary>,

    /// Cited external results, in first-appearance order
    pub imports: Vec<ImportEntry>,

    /// Audit catalogue
    pub audit: Vec<AuditCheck>,
}

impl RunReport {
    pub(crate) fn assemble(
        registry: &Registry,
        schema: &SchemaReport,
        graph: &GraphReport,
        witnesses: &[WitnessResult],
        classification: &ClassifierReport,
    ) -> Self {
        let mut violations: Vec<ViolationEntry> = schema
            .violations
            .iter()
            .map(|v| ViolationEntry {
                kind: v.kind().as_str().to_string(),
                claim_id: v.subject.clone(),
                field: Some(v.field.clone()),
                detail: v.detail(),
            })
            .collect();
        violations.extend(graph.cycles.iter().map(|cycle| ViolationEntry {
            kind: "cycle".to_string(),
            claim_id: cycle.revisited().to_string(),
            field: None,
            detail: cycle.to_string(),
        }));

        let mut warnings: Vec<WarningEntry> = graph
            .warnings
            .iter()
            .map(|w| WarningEntry {
                kind: w.kind.as_str().to_string(),
                claim_id: w.subject.clone(),
                detail: w.detail.clone(),
            })
            .collect();
        warnings.extend(classification.warnings.iter().map(|w| WarningEntry {
            kind: w.kind.as_str().to_string(),
            claim_id: w.claim_id.to_string(),
            detail: w.detail.clone(),
        }));

        let witness_results: Vec<WitnessEntry> = witnesses.iter().map(WitnessEntry::from).collect();

        let mut seen = HashSet::new();
        let claims: Vec<ClaimStatus> = registry
            .claims()
            .iter()
            .map(|record| {
                let first = seen.insert(record.id.as_str());
                let accepted = schema
                    .accepted
                    .iter()
                    .find(|c| first && c.id.as_str() == record.id);
                claim_status(record, accepted, graph, witnesses, classification)
            })
            .collect();

        let passed_claims = claims.iter().filter(|c| c.passed).count();
        let overall_pass = violations.is_empty() && witness_results.iter().all(|w| w.success);

        let mut report = Self {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            total_claims: registry.claims().len(),
            passed_claims,
            overall_pass,
            exit_status: if overall_pass { 0 } else { 1 },
            by_provenance_tag: classification.by_provenance_tag.clone(),
            by_gap_classification: classification.by_gap_classification.clone(),
            violations,
            witness_results,
            warnings,
            tiers: tier_summaries(&claims),
            imports: import_catalogue(&schema.accepted),
            claims,
            audit: Vec::new(),
        };
        report.audit = audit::catalogue(&report);
        report
    }

    /// Witness results that did not hold
    pub fn witness_failures(&self) -> impl Iterator<Item = &WitnessEntry> {
        self.witness_results.iter().filter(|w| !w.success)
    }

    /// Status row of a claim
    pub fn claim(&self, id: &str) -> Option<&ClaimStatus> {
        self.claims.iter().find(|c| c.id == id)
    }

    /// Warnings of the given kind
    pub fn warnings_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a WarningEntry> {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }

    /// Violations of the given kind
    pub fn violations_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a ViolationEntry> {
        self.violations.iter().filter(move |v| v.kind == kind)
    }

    /// Render the structured document as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the structured document to `path`, replacing any previous file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let mut json = self.to_json()?;
        json.push('\n');
        std::fs::write(path, json)?;
        Ok(())
    }
}

fn claim_status(
    record: &ClaimRecord,
    accepted: Option<&Claim>,
    graph: &GraphReport,
    witnesses: &[WitnessResult],
    classification: &ClassifierReport,
) -> ClaimStatus {
    let Some(claim) = accepted else {
        return ClaimStatus {
            id: record.id.clone(),
            name: record.name.clone().unwrap_or_default(),
            tier: record.tier.and_then(|t| u32::try_from(t).ok()),
            provenance: record.provenance.clone(),
            provenance_detail: record.source.clone().or_else(|| record.reason.clone()),
            gap: record.gap.clone(),
            passed: false,
            witness: if record.witness.is_some() {
                WitnessState::Skipped
            } else {
                WitnessState::None
            },
            implied_tag: None,
            implied_tier: graph.implied_tier(&record.id),
            provenance_status: "unchecked".to_string(),
            key_result: record.key_result.clone(),
            dependencies: record.dependencies.clone(),
        };
    };

    let id = claim.id.as_str();
    let witness = match witnesses.iter().find(|w| w.claim_id == claim.id) {
        Some(result) if result.success => WitnessState::Passed,
        Some(_) => WitnessState::Failed,
        None => WitnessState::None,
    };
    let finding = classification.finding(id);

    ClaimStatus {
        id: id.to_string(),
        name: claim.name.clone(),
        tier: Some(claim.tier.value()),
        provenance: Some(claim.provenance.as_str().to_string()),
        provenance_detail: claim.provenance.detail().map(str::to_string),
        gap: Some(claim.gap.as_str().to_string()),
        passed: !graph.on_hard_cycle(id) && witness != WitnessState::Failed,
        witness,
        implied_tag: finding
            .and_then(|f| f.implied)
            .map(|s| s.as_str().to_string()),
        implied_tier: graph.implied_tier(id),
        provenance_status: finding
            .map_or(ProvenanceStatus::Indeterminate, |f| f.status)
            .as_str()
            .to_string(),
        key_result: claim.key_result.clone(),
        dependencies: claim.dependencies.iter().map(|d| d.to_string()).collect(),
    }
}

fn tier_summaries(claims: &[ClaimStatus]) -> Vec<TierSummary> {
    let mut tiers: BTreeMap<u32, TierSummary> = BTreeMap::new();
    for claim in claims {
        let Some(tier) = claim.tier else {
            continue;
        };
        let summary = tiers.entry(tier).or_insert(TierSummary {
            tier,
            claims: 0,
            passed: 0,
            witnessed: 0,
        });
        summary.claims += 1;
        if claim.passed {
            summary.passed += 1;
        }
        if claim.witness != WitnessState::None {
            summary.witnessed += 1;
        }
    }
    tiers.into_values().collect()
}

fn import_catalogue(claims: &[Claim]) -> Vec<ImportEntry> {
    let mut entries: Vec<ImportEntry> = Vec::new();
    let mut cite = |source: &str, kind: &str, claim: &Claim| {
        match entries.iter_mut().find(|e| e.source == source) {
            Some(entry) => entry.used_by.push(claim.id.to_string()),
            None => entries.push(ImportEntry {
                source: source.to_string(),
                kind: kind.to_string(),
                used_by: vec![claim.id.to_string()],
            }),
        }
    };

    for claim in claims {
        if let Some(source) = claim.provenance.source().filter(|s| !s.is_empty()) {
            cite(source, "provenance", claim);
        }
        for citation in &claim.imports {
            cite(citation, "citation", claim);
        }
    }
    entries
}
