//! Registry schema validation logic

use std::collections::HashSet;
use std::fmt;

use attest_domain::{
    Claim, ClaimRecord, ComparisonMode, Constant, GapClass, ProvenanceTag, Registry, Strength,
    Tier, WitnessRecord, WitnessSpec, DEFAULT_RELATIVE_TOLERANCE,
};

use crate::ValidationConfig;

/// Category of a schema violation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Missing or invalid field value
    Schema,

    /// Identifier defined more than once
    DuplicateId,

    /// Reference to an identifier that does not exist
    DanglingReference,
}

impl ViolationKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::Schema => "schema",
            ViolationKind::DuplicateId => "duplicate-id",
            ViolationKind::DanglingReference => "dangling-reference",
        }
    }
}

/// Reasons for rejection
#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    /// Required field is absent or blank
    Missing,

    /// Value outside the allowed set or shape
    InvalidValue {
        /// Offending value
        value: String,
        /// What the value should have been
        expected: String,
    },

    /// Tier is negative or too large
    InvalidTier(String),

    /// Identifier already used by an earlier record
    DuplicateId {
        /// The record that defined the identifier first
        first: String,
    },

    /// Identifier that resolves to nothing
    DanglingReference {
        /// Unresolved identifier
        target: String,
        /// What the identifier should have resolved to
        expected: &'static str,
    },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::Missing => f.write_str("missing or empty"),
            RejectionReason::InvalidValue { value, expected } => {
                write!(f, "'{}' is not {}", value, expected)
            }
            RejectionReason::InvalidTier(issue) => f.write_str(issue),
            RejectionReason::DuplicateId { first } => {
                write!(f, "identifier already defined by {}", first)
            }
            RejectionReason::DanglingReference { target, expected } => {
                write!(f, "'{}' does not resolve to a known {}", target, expected)
            }
        }
    }
}

/// A single schema defect
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Identifier of the offending record, or its position when the
    /// identifier itself is missing
    pub subject: String,

    /// Offending field
    pub field: String,

    /// What is wrong with the field
    pub reason: RejectionReason,
}

impl Violation {
    fn new(subject: &str, field: &str, reason: RejectionReason) -> Self {
        Self {
            subject: subject.to_string(),
            field: field.to_string(),
            reason,
        }
    }

    /// Category of the violation
    pub fn kind(&self) -> ViolationKind {
        match self.reason {
            RejectionReason::DuplicateId { .. } => ViolationKind::DuplicateId,
            RejectionReason::DanglingReference { .. } => ViolationKind::DanglingReference,
            _ => ViolationKind::Schema,
        }
    }

    /// Human-readable description naming the field
    pub fn detail(&self) -> String {
        format!("{}: {}", self.field, self.reason)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.subject, self.detail())
    }
}

/// Result of validating a whole registry
#[derive(Debug, Clone, Default)]
pub struct SchemaReport {
    /// Every violation found, in registry order (axioms, constants, claims)
    pub violations: Vec<Violation>,

    /// Claims without violations, in registry order
    pub accepted: Vec<Claim>,

    /// Constants without violations, in registry order
    pub constants: Vec<Constant>,
}

impl SchemaReport {
    /// Whether no violation was found
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Whether a claim with the given identifier was accepted
    pub fn is_accepted(&self, id: &str) -> bool {
        self.accepted.iter().any(|claim| claim.id.as_str() == id)
    }

    /// Violations recorded against the given subject
    pub fn violations_for<'a>(&'a self, subject: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.violations.iter().filter(move |v| v.subject == subject)
    }
}

/// The Gatekeeper validates registry records before evaluation
pub struct Gatekeeper {
    config: ValidationConfig,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self::new(ValidationConfig::default())
    }

    /// Validate every record of the registry
    ///
    /// Pure function of the registry: all violations are collected, and
    /// claims that have none are returned as typed claims.
    pub fn validate(&self, registry: &Registry) -> SchemaReport {
        let mut violations = Vec::new();

        self.validate_axioms(registry, &mut violations);
        let constants = self.validate_constants(registry, &mut violations);
        let accepted = self.validate_claims(registry, &mut violations);

        SchemaReport {
            violations,
            accepted,
            constants,
        }
    }

    fn validate_axioms(&self, registry: &Registry, violations: &mut Vec<Violation>) {
        let mut seen = HashSet::new();

        for (index, axiom) in registry.axioms().iter().enumerate() {
            let subject = subject_of(&axiom.id, "axioms", index);

            if is_blank(&axiom.id) {
                violations.push(Violation::new(&subject, "id", RejectionReason::Missing));
            } else if !seen.insert(axiom.id.as_str()) {
                violations.push(Violation::new(
                    &subject,
                    "id",
                    RejectionReason::DuplicateId {
                        first: "an earlier axiom".to_string(),
                    },
                ));
            }

            if self.config.require_display_name && is_blank(&axiom.name) {
                violations.push(Violation::new(&subject, "name", RejectionReason::Missing));
            }
        }
    }

    fn validate_constants(
        &self,
        registry: &Registry,
        violations: &mut Vec<Violation>,
    ) -> Vec<Constant> {
        let mut seen = HashSet::new();
        let mut valid = Vec::new();

        for (index, constant) in registry.constants().iter().enumerate() {
            let subject = subject_of(&constant.name, "constants", index);
            let before = violations.len();

            if is_blank(&constant.name) {
                violations.push(Violation::new(&subject, "name", RejectionReason::Missing));
            } else if !is_identifier(&constant.name) {
                violations.push(Violation::new(
                    &subject,
                    "name",
                    RejectionReason::InvalidValue {
                        value: constant.name.clone(),
                        expected: "an identifier".to_string(),
                    },
                ));
            } else if !seen.insert(constant.name.as_str()) {
                violations.push(Violation::new(
                    &subject,
                    "name",
                    RejectionReason::DuplicateId {
                        first: "an earlier constant".to_string(),
                    },
                ));
            }

            if is_blank(&constant.value) {
                violations.push(Violation::new(&subject, "value", RejectionReason::Missing));
            }

            if let Some(origin) = &constant.origin {
                if !registry.is_axiom(origin) {
                    violations.push(Violation::new(
                        &subject,
                        "origin",
                        RejectionReason::DanglingReference {
                            target: origin.clone(),
                            expected: "axiom",
                        },
                    ));
                }
            }

            if constant.external.as_deref().is_some_and(is_blank) {
                violations.push(Violation::new(&subject, "external", RejectionReason::Missing));
            }

            if violations.len() == before {
                valid.push(constant.clone());
            }
        }

        valid
    }

    fn validate_claims(&self, registry: &Registry, violations: &mut Vec<Violation>) -> Vec<Claim> {
        let mut seen: HashSet<&str> = registry.axioms().iter().map(|a| a.id.as_str()).collect();
        let mut accepted = Vec::new();

        for (index, record) in registry.claims().iter().enumerate() {
            let subject = subject_of(&record.id, "claims", index);
            let before = violations.len();

            if is_blank(&record.id) {
                violations.push(Violation::new(&subject, "id", RejectionReason::Missing));
            } else if !seen.insert(record.id.as_str()) {
                let first = if registry.is_axiom(&record.id) {
                    format!("axiom {}", record.id)
                } else {
                    format!("an earlier claim {}", record.id)
                };
                violations.push(Violation::new(
                    &subject,
                    "id",
                    RejectionReason::DuplicateId { first },
                ));
            }

            let name = record.name.as_deref().map(str::trim).unwrap_or_default();
            if self.config.require_display_name && name.is_empty() {
                violations.push(Violation::new(&subject, "name", RejectionReason::Missing));
            }

            let tier = self.validate_tier(record, &subject, violations);
            let provenance = self.validate_provenance(record, &subject, violations);

            let gap = match record.gap.as_deref() {
                None => {
                    violations.push(Violation::new(&subject, "gap", RejectionReason::Missing));
                    None
                }
                Some(value) => {
                    let gap = GapClass::parse(value);
                    if gap.is_none() {
                        violations.push(Violation::new(
                            &subject,
                            "gap",
                            RejectionReason::InvalidValue {
                                value: value.to_string(),
                                expected: one_of(GapClass::ALL.iter().map(|g| g.as_str())),
                            },
                        ));
                    }
                    gap
                }
            };

            for dependency in &record.dependencies {
                if is_blank(dependency) {
                    violations.push(Violation::new(
                        &subject,
                        "dependencies",
                        RejectionReason::Missing,
                    ));
                } else if !registry.resolves(dependency) {
                    violations.push(Violation::new(
                        &subject,
                        "dependencies",
                        RejectionReason::DanglingReference {
                            target: dependency.clone(),
                            expected: "axiom or claim",
                        },
                    ));
                }
            }

            let witness = match &record.witness {
                Some(witness) => self.validate_witness(witness, &subject, violations),
                None => None,
            };

            let key_result = record
                .key_result
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty());
            if self.config.require_key_result && key_result.is_none() {
                violations.push(Violation::new(&subject, "key_result", RejectionReason::Missing));
            }

            if violations.len() != before {
                continue;
            }

            if let (Some(tier), Some(provenance), Some(gap)) = (tier, provenance, gap) {
                let mut claim = Claim::new(record.id.as_str(), name, tier, provenance, gap)
                    .with_dependencies(record.dependencies.iter().map(String::as_str));
                claim.witness = witness;
                claim.key_result = key_result.map(str::to_string);
                claim.imports = record.imports.clone();
                accepted.push(claim);
            }
        }

        accepted
    }

    fn validate_tier(
        &self,
        record: &ClaimRecord,
        subject: &str,
        violations: &mut Vec<Violation>,
    ) -> Option<Tier> {
        let Some(value) = record.tier else {
            violations.push(Violation::new(subject, "tier", RejectionReason::Missing));
            return None;
        };

        match Tier::try_from(value) {
            Ok(tier) if tier.value() > self.config.max_tier => {
                violations.push(Violation::new(
                    subject,
                    "tier",
                    RejectionReason::InvalidTier(format!(
                        "tier {} exceeds the maximum tier {}",
                        value, self.config.max_tier
                    )),
                ));
                None
            }
            Ok(tier) => Some(tier),
            Err(issue) => {
                violations.push(Violation::new(subject, "tier", RejectionReason::InvalidTier(issue)));
                None
            }
        }
    }

    fn validate_provenance(
        &self,
        record: &ClaimRecord,
        subject: &str,
        violations: &mut Vec<Violation>,
    ) -> Option<ProvenanceTag> {
        let Some(value) = record.provenance.as_deref() else {
            violations.push(Violation::new(subject, "provenance", RejectionReason::Missing));
            return None;
        };

        let Some(tag) =
            ProvenanceTag::from_parts(value, record.source.as_deref(), record.reason.as_deref())
        else {
            violations.push(Violation::new(
                subject,
                "provenance",
                RejectionReason::InvalidValue {
                    value: value.to_string(),
                    expected: one_of(Strength::ALL.iter().map(|s| s.as_str())),
                },
            ));
            return None;
        };

        if self.config.require_provenance_detail {
            let field = match tag {
                ProvenanceTag::ImportGated { .. } => Some("source"),
                ProvenanceTag::Convention { .. } => Some("reason"),
                _ => None,
            };
            if let Some(field) = field {
                if tag.detail().is_some_and(str::is_empty) {
                    violations.push(Violation::new(subject, field, RejectionReason::Missing));
                }
            }
        }

        Some(tag)
    }

    fn validate_witness(
        &self,
        witness: &WitnessRecord,
        subject: &str,
        violations: &mut Vec<Violation>,
    ) -> Option<WitnessSpec> {
        let before = violations.len();

        let check = required(witness.check.as_deref(), subject, "witness.check", violations);
        let expression = required(
            witness.expression.as_deref(),
            subject,
            "witness.expression",
            violations,
        );

        let tolerance = match witness.tolerance {
            Some(t) if !t.is_finite() || t < 0.0 => {
                violations.push(Violation::new(
                    subject,
                    "witness.tolerance",
                    RejectionReason::InvalidValue {
                        value: t.to_string(),
                        expected: "a finite non-negative number".to_string(),
                    },
                ));
                None
            }
            other => other,
        };

        let mode = match witness.mode.as_deref() {
            None => {
                violations.push(Violation::new(subject, "witness.mode", RejectionReason::Missing));
                None
            }
            Some("exact-equality") => {
                required(witness.expected.as_deref(), subject, "witness.expected", violations);
                Some(ComparisonMode::ExactEquality {
                    tolerance: tolerance.unwrap_or(DEFAULT_RELATIVE_TOLERANCE),
                })
            }
            Some("absolute-tolerance") => {
                required(witness.expected.as_deref(), subject, "witness.expected", violations);
                if witness.tolerance.is_none() {
                    violations.push(Violation::new(
                        subject,
                        "witness.tolerance",
                        RejectionReason::Missing,
                    ));
                }
                Some(ComparisonMode::AbsoluteTolerance {
                    tolerance: tolerance.unwrap_or_default(),
                })
            }
            Some("boolean-predicate") => {
                if let Some(expected) = witness.expected.as_deref() {
                    let expected = expected.trim();
                    if expected != "true" && expected != "false" {
                        violations.push(Violation::new(
                            subject,
                            "witness.expected",
                            RejectionReason::InvalidValue {
                                value: expected.to_string(),
                                expected: "true or false".to_string(),
                            },
                        ));
                    }
                }
                Some(ComparisonMode::BooleanPredicate)
            }
            Some("interval") => {
                let min = required(witness.min.as_deref(), subject, "witness.min", violations);
                let max = required(witness.max.as_deref(), subject, "witness.max", violations);
                Some(ComparisonMode::Interval {
                    min: min.unwrap_or_default().to_string(),
                    max: max.unwrap_or_default().to_string(),
                })
            }
            Some(other) => {
                violations.push(Violation::new(
                    subject,
                    "witness.mode",
                    RejectionReason::InvalidValue {
                        value: other.to_string(),
                        expected: one_of(ComparisonMode::NAMES.iter().copied()),
                    },
                ));
                None
            }
        };

        if violations.len() != before {
            return None;
        }

        let expected = witness
            .expected
            .as_deref()
            .map(str::trim)
            .map(str::to_string);
        Some(WitnessSpec::new(
            check.unwrap_or_default(),
            expression.unwrap_or_default(),
            mode?,
            expected,
        ))
    }
}

fn required<'a>(
    value: Option<&'a str>,
    subject: &str,
    field: &str,
    violations: &mut Vec<Violation>,
) -> Option<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            violations.push(Violation::new(subject, field, RejectionReason::Missing));
            None
        }
    }
}

fn subject_of(id: &str, section: &str, index: usize) -> String {
    if is_blank(id) {
        format!("{}[{}]", section, index)
    } else {
        id.to_string()
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let head = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    head && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && name != "true" && name != "false"
}

fn one_of<'a>(names: impl Iterator<Item = &'a str>) -> String {
    format!("one of {}", names.collect::<Vec<_>>().join(", "))
}
