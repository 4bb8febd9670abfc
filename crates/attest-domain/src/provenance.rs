//! Provenance tags - how strongly a claim is justified

use std::fmt;

/// Strength of a provenance tag, weakest first
///
/// The derived ordering is the ordering the provenance classifier relies on:
/// `Convention < ImportGated < Structural < Proved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strength {
    /// Input or convention the engine cannot verify
    Convention,

    /// Gated on an externally imported result
    ImportGated,

    /// Structurally derived
    Structural,

    /// Strictly proved
    Proved,
}

impl Strength {
    /// All strengths, strongest first
    pub const ALL: [Strength; 4] = [
        Strength::Proved,
        Strength::Structural,
        Strength::ImportGated,
        Strength::Convention,
    ];

    /// Get the tag name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Strength::Convention => "convention",
            Strength::ImportGated => "import-gated",
            Strength::Structural => "structural",
            Strength::Proved => "proved",
        }
    }

    /// Parse a strength from its tag name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "convention" => Some(Strength::Convention),
            "import-gated" => Some(Strength::ImportGated),
            "structural" => Some(Strength::Structural),
            "proved" => Some(Strength::Proved),
            _ => None,
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance tag of a claim
///
/// The two weak tags carry the reference the engine cannot verify itself, so
/// the classifier and the report can surface where a claim's justification
/// leaves the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProvenanceTag {
    /// Strictly proved from the claim's dependencies
    Proved,

    /// Structurally derived
    Structural,

    /// Gated on an external result
    ImportGated {
        /// Reference to the imported result
        source: String,
    },

    /// Rests on an input or convention
    Convention {
        /// Why the convention is adopted
        reason: String,
    },
}

impl ProvenanceTag {
    /// Build a tag from its name and optional detail fields
    ///
    /// Returns `None` for names outside the closed enumeration. Missing detail
    /// becomes an empty string; whether that is acceptable is a schema
    /// decision.
    pub fn from_parts(tag: &str, source: Option<&str>, reason: Option<&str>) -> Option<Self> {
        let tag = match Strength::parse(tag)? {
            Strength::Proved => ProvenanceTag::Proved,
            Strength::Structural => ProvenanceTag::Structural,
            Strength::ImportGated => ProvenanceTag::ImportGated {
                source: source.unwrap_or_default().trim().to_string(),
            },
            Strength::Convention => ProvenanceTag::Convention {
                reason: reason.unwrap_or_default().trim().to_string(),
            },
        };
        Some(tag)
    }

    /// Strength of the tag
    pub fn strength(&self) -> Strength {
        match self {
            ProvenanceTag::Proved => Strength::Proved,
            ProvenanceTag::Structural => Strength::Structural,
            ProvenanceTag::ImportGated { .. } => Strength::ImportGated,
            ProvenanceTag::Convention { .. } => Strength::Convention,
        }
    }

    /// Get the tag name as a string
    pub fn as_str(&self) -> &'static str {
        self.strength().as_str()
    }

    /// Source reference or convention reason, if the tag carries one
    pub fn detail(&self) -> Option<&str> {
        match self {
            ProvenanceTag::ImportGated { source } => Some(source),
            ProvenanceTag::Convention { reason } => Some(reason),
            _ => None,
        }
    }

    /// Source reference of an import-gated tag
    pub fn source(&self) -> Option<&str> {
        match self {
            ProvenanceTag::ImportGated { source } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for ProvenanceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.detail() {
            Some(detail) if !detail.is_empty() => write!(f, "{} ({})", self.as_str(), detail),
            _ => f.write_str(self.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strength_ordering() {
        assert!(Strength::Convention < Strength::ImportGated);
        assert!(Strength::ImportGated < Strength::Structural);
        assert!(Strength::Structural < Strength::Proved);
        assert_eq!(Strength::Proved.min(Strength::Convention), Strength::Convention);
    }

    #[test]
    fn test_tag_from_parts() {
        let tag = ProvenanceTag::from_parts("import-gated", Some(" Lovelock (1971) "), None).unwrap();
        assert_eq!(
            tag,
            ProvenanceTag::ImportGated {
                source: "Lovelock (1971)".to_string()
            }
        );
        assert_eq!(tag.strength(), Strength::ImportGated);
        assert_eq!(tag.source(), Some("Lovelock (1971)"));

        let tag = ProvenanceTag::from_parts("convention", None, None).unwrap();
        assert_eq!(tag.detail(), Some(""));
    }

    #[test]
    fn test_unknown_tag() {
        assert!(ProvenanceTag::from_parts("P_structural", None, None).is_none());
        assert!(ProvenanceTag::from_parts("Proved", None, None).is_none());
    }

    #[test]
    fn test_display_includes_detail() {
        let tag = ProvenanceTag::Convention {
            reason: "regime gate".to_string(),
        };
        assert_eq!(tag.to_string(), "convention (regime gate)");
        assert_eq!(ProvenanceTag::Proved.to_string(), "proved");
    }
}
