//! Axiom module - root assumptions of the registry

use serde::Deserialize;

/// A root assumption referenced by claims
///
/// Axioms have no dependencies of their own and act as roots of the
/// dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Axiom {
    /// Identifier, unique across axioms and claims
    #[serde(default)]
    pub id: String,

    /// Human-readable name
    #[serde(default)]
    pub name: String,

    /// Free-text statement
    #[serde(default)]
    pub statement: String,
}

impl Axiom {
    /// Create a new axiom
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        statement: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            statement: statement.into(),
        }
    }
}
