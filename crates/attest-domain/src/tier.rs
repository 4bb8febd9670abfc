//! Tier module - informational grouping of claims into phases

use std::fmt;

/// Tier of a claim
///
/// Tiers group claims into logical phases (foundations, gauge sector, ...).
/// The grouping is informational: the engine never orders evaluation by tier,
/// it only compares declared tiers against the dependency structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tier(u32);

impl Tier {
    /// Create a tier from its number
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the tier number
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for Tier {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < 0 {
            return Err(format!("tier must be non-negative, got {}", value));
        }
        u32::try_from(value)
            .map(Tier)
            .map_err(|_| format!("tier {} is out of range", value))
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
