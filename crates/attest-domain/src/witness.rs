//! Witness specifications attached to claims

/// Relative tolerance used by `exact-equality` checks that declare none
pub const DEFAULT_RELATIVE_TOLERANCE: f64 = 1e-9;

/// How a witness value is compared against its expectation
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonMode {
    /// Exactly equal rationals, otherwise relative error within `tolerance`
    ExactEquality {
        /// Maximum relative error
        tolerance: f64,
    },

    /// Absolute difference within `tolerance`
    AbsoluteTolerance {
        /// Maximum absolute error
        tolerance: f64,
    },

    /// Expression evaluates to a boolean that must hold
    BooleanPredicate,

    /// Value lies in the inclusive interval `[min, max]`
    Interval {
        /// Lower bound expression
        min: String,
        /// Upper bound expression
        max: String,
    },
}

impl ComparisonMode {
    /// Mode names accepted in registry definitions
    pub const NAMES: [&'static str; 4] = [
        "exact-equality",
        "absolute-tolerance",
        "boolean-predicate",
        "interval",
    ];

    /// Get the mode name as a string
    pub fn name(&self) -> &'static str {
        match self {
            ComparisonMode::ExactEquality { .. } => "exact-equality",
            ComparisonMode::AbsoluteTolerance { .. } => "absolute-tolerance",
            ComparisonMode::BooleanPredicate => "boolean-predicate",
            ComparisonMode::Interval { .. } => "interval",
        }
    }
}

/// A named computable check substantiating a claim
#[derive(Debug, Clone, PartialEq)]
pub struct WitnessSpec {
    /// Name of the check
    pub check: String,

    /// Expression producing the witnessed value
    pub expression: String,

    /// Comparison applied to the value
    pub mode: ComparisonMode,

    /// Expression for the expected value
    pub expected: Option<String>,
}

impl WitnessSpec {
    /// Create a witness specification
    pub fn new(
        check: impl Into<String>,
        expression: impl Into<String>,
        mode: ComparisonMode,
        expected: Option<String>,
    ) -> Self {
        Self {
            check: check.into(),
            expression: expression.into(),
            mode,
            expected,
        }
    }
}
