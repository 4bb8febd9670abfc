//! Gap classification - the nature of a claim's remaining justification gap

use std::fmt;

/// Gap classification of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GapClass {
    /// Gap eliminated by derivation, formalization or definition
    Closed,

    /// Rests on an external mathematical result (correct, not a gap)
    Import,

    /// Genuine open problem
    Open,

    /// Mechanism complete; remaining details are regime parameters
    Reduced,
}

impl GapClass {
    /// All classifications in declaration order
    pub const ALL: [GapClass; 4] = [
        GapClass::Closed,
        GapClass::Import,
        GapClass::Open,
        GapClass::Reduced,
    ];

    /// Get the classification name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            GapClass::Closed => "closed",
            GapClass::Import => "import",
            GapClass::Open => "open",
            GapClass::Reduced => "reduced",
        }
    }

    /// Parse a classification from its name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "closed" => Some(GapClass::Closed),
            "import" => Some(GapClass::Import),
            "open" => Some(GapClass::Open),
            "reduced" => Some(GapClass::Reduced),
            _ => None,
        }
    }

    /// One-line description used by the audit rendering
    pub fn description(&self) -> &'static str {
        match self {
            GapClass::Closed => "gap eliminated by derivation or definition",
            GapClass::Import => "uses an external mathematical result",
            GapClass::Open => "genuine open problem",
            GapClass::Reduced => "mechanism complete, regime details remain",
        }
    }
}

impl std::str::FromStr for GapClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid gap classification: {}", s))
    }
}

impl fmt::Display for GapClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
