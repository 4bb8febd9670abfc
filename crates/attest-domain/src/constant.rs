//! Parameter table entries

use serde::Deserialize;

/// A named constant available to witness expressions
///
/// The value is itself an expression and may reference other constants.
/// A constant marked `external` carries an imported or observed value; any
/// witness consuming it is not derivable from the axioms alone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Constant {
    /// Identifier used in expressions
    #[serde(default)]
    pub name: String,

    /// Defining expression
    #[serde(default)]
    pub value: String,

    /// Axiom this constant is derived from, if any
    #[serde(default)]
    pub origin: Option<String>,

    /// Reference for an externally imported value
    #[serde(default)]
    pub external: Option<String>,
}

impl Constant {
    /// Create a constant with no origin annotation
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            origin: None,
            external: None,
        }
    }

    /// Mark the constant as derived from an axiom
    pub fn with_origin(mut self, axiom: impl Into<String>) -> Self {
        self.origin = Some(axiom.into());
        self
    }

    /// Mark the constant as an external import
    pub fn with_external(mut self, reference: impl Into<String>) -> Self {
        self.external = Some(reference.into());
        self
    }

    /// Whether the constant is an external import
    pub fn is_external(&self) -> bool {
        self.external.is_some()
    }
}
