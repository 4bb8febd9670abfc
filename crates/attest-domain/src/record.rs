//! Claim records as defined, before schema validation

use serde::Deserialize;

/// A claim exactly as it appears in the registry definition
///
/// Every field except the identifier and dependency list is optional so that
/// a missing value surfaces as a schema violation instead of a load failure.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClaimRecord {
    /// Identifier
    #[serde(default)]
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: Option<String>,

    /// Phase grouping
    #[serde(default)]
    pub tier: Option<i64>,

    /// Provenance tag name
    #[serde(default)]
    pub provenance: Option<String>,

    /// Source reference for `import-gated` claims
    #[serde(default)]
    pub source: Option<String>,

    /// Reason for `convention` claims
    #[serde(default)]
    pub reason: Option<String>,

    /// Gap classification name
    #[serde(default)]
    pub gap: Option<String>,

    /// Dependency identifiers in declared order
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// One-line statement of the result
    #[serde(default)]
    pub key_result: Option<String>,

    /// Pure-mathematics results the claim cites
    #[serde(default)]
    pub imports: Vec<String>,

    /// Witness definition
    #[serde(default)]
    pub witness: Option<WitnessRecord>,
}

impl ClaimRecord {
    /// Create a record with an identifier and display name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set the tier
    pub fn with_tier(mut self, tier: i64) -> Self {
        self.tier = Some(tier);
        self
    }

    /// Set the provenance tag name
    pub fn with_provenance(mut self, tag: impl Into<String>) -> Self {
        self.provenance = Some(tag.into());
        self
    }

    /// Set the import source reference
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the convention reason
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Set the gap classification name
    pub fn with_gap(mut self, gap: impl Into<String>) -> Self {
        self.gap = Some(gap.into());
        self
    }

    /// Set the dependencies
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Set the key result
    pub fn with_key_result(mut self, key_result: impl Into<String>) -> Self {
        self.key_result = Some(key_result.into());
        self
    }

    /// Attach a witness definition
    pub fn with_witness(mut self, witness: WitnessRecord) -> Self {
        self.witness = Some(witness);
        self
    }
}

/// A witness exactly as it appears in the registry definition
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WitnessRecord {
    /// Name of the check
    #[serde(default)]
    pub check: Option<String>,

    /// Expression producing the witnessed value
    #[serde(default)]
    pub expression: Option<String>,

    /// Comparison mode name
    #[serde(default)]
    pub mode: Option<String>,

    /// Expected value expression
    #[serde(default)]
    pub expected: Option<String>,

    /// Tolerance for numeric comparisons
    #[serde(default)]
    pub tolerance: Option<f64>,

    /// Interval lower bound expression
    #[serde(default)]
    pub min: Option<String>,

    /// Interval upper bound expression
    #[serde(default)]
    pub max: Option<String>,
}

impl WitnessRecord {
    fn named(check: &str, expression: &str, mode: &str) -> Self {
        Self {
            check: Some(check.to_string()),
            expression: Some(expression.to_string()),
            mode: Some(mode.to_string()),
            ..Self::default()
        }
    }

    /// An `exact-equality` witness
    pub fn exact(check: &str, expression: &str, expected: &str) -> Self {
        Self {
            expected: Some(expected.to_string()),
            ..Self::named(check, expression, "exact-equality")
        }
    }

    /// An `absolute-tolerance` witness
    pub fn absolute(check: &str, expression: &str, expected: &str, tolerance: f64) -> Self {
        Self {
            expected: Some(expected.to_string()),
            tolerance: Some(tolerance),
            ..Self::named(check, expression, "absolute-tolerance")
        }
    }

    /// A `boolean-predicate` witness
    pub fn predicate(check: &str, expression: &str) -> Self {
        Self::named(check, expression, "boolean-predicate")
    }

    /// An `interval` witness
    pub fn interval(check: &str, expression: &str, min: &str, max: &str) -> Self {
        Self {
            min: Some(min.to_string()),
            max: Some(max.to_string()),
            ..Self::named(check, expression, "interval")
        }
    }
}
