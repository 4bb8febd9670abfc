//! Claim module - a labeled assertion in the registry

use std::borrow::Borrow;
use std::fmt;

use crate::{GapClass, ProvenanceTag, Tier, WitnessSpec};

/// Identifier of a claim or axiom
///
/// Identifiers are opaque strings to the engine; they are unique across claims
/// and axioms combined.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClaimId(String);

impl ClaimId {
    /// Create an identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use attest_domain::ClaimId;
    ///
    /// let id = ClaimId::new("T24");
    /// assert_eq!(id.as_str(), "T24");
    /// ```
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClaimId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ClaimId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ClaimId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A claim that passed schema validation
///
/// Claims are immutable once built; every field holds a value drawn from its
/// closed enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,

    /// Display name
    pub name: String,

    /// Phase grouping
    pub tier: Tier,

    /// How strongly the claim is justified
    pub provenance: ProvenanceTag,

    /// Remaining justification gap
    pub gap: GapClass,

    /// Claims and axioms this claim depends on, in declared order
    pub dependencies: Vec<ClaimId>,

    /// Computable check, if the claim asserts a computed property
    pub witness: Option<WitnessSpec>,

    /// One-line statement of the result
    pub key_result: Option<String>,

    /// Pure-mathematics results the claim cites
    pub imports: Vec<String>,
}

impl Claim {
    /// Create a claim with no dependencies and no witness
    pub fn new(
        id: impl Into<ClaimId>,
        name: impl Into<String>,
        tier: Tier,
        provenance: ProvenanceTag,
        gap: GapClass,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tier,
            provenance,
            gap,
            dependencies: Vec::new(),
            witness: None,
            key_result: None,
            imports: Vec::new(),
        }
    }

    /// Set the dependencies
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ClaimId>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a witness
    pub fn with_witness(mut self, witness: WitnessSpec) -> Self {
        self.witness = Some(witness);
        self
    }

    /// Whether the claim declares a witness
    pub fn has_witness(&self) -> bool {
        self.witness.is_some()
    }
}
