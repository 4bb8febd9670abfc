//! Witness evaluation against the parameter table

use attest_domain::{Claim, ClaimId, ComparisonMode, Constant, WitnessSpec};
use tracing::{debug, warn};

use crate::{EvalError, Evaluation, ParameterTable, Value};

/// Outcome of running one claim's witness
#[derive(Debug, Clone, PartialEq)]
pub struct WitnessResult {
    /// Claim the witness belongs to
    pub claim_id: ClaimId,

    /// Name of the check
    pub check: String,

    /// Comparison mode name
    pub mode: &'static str,

    /// Whether the check held
    pub success: bool,

    /// Numeric value produced, if any
    pub value: Option<f64>,

    /// Produced value in its exact rendering (`3/13`, `true`, ...)
    pub value_text: Option<String>,

    /// Numeric expected value, if the mode has one
    pub expected: Option<f64>,

    /// Why the check failed
    pub diagnostic: Option<String>,

    /// External constants the evaluation consumed
    pub external_inputs: Vec<String>,

    /// Whether the two evaluation passes disagreed
    pub nondeterministic: bool,
}

impl WitnessResult {
    fn same_outcome(&self, other: &WitnessResult) -> bool {
        self.success == other.success
            && self.value.map(f64::to_bits) == other.value.map(f64::to_bits)
            && self.value_text == other.value_text
            && self.diagnostic == other.diagnostic
    }
}

struct Outcome {
    success: bool,
    value: Value,
    expected: Option<Value>,
    diagnostic: Option<String>,
}

/// Runs witness checks
///
/// Every witness is evaluated twice in independent passes; a witness whose
/// two outcomes differ is reported as failed.
pub struct WitnessEvaluator {
    table: ParameterTable,
}

impl WitnessEvaluator {
    /// Create an evaluator over a parameter table
    pub fn new(table: ParameterTable) -> Self {
        Self { table }
    }

    /// Create an evaluator over constant definitions
    pub fn from_constants(constants: &[Constant]) -> Self {
        Self::new(ParameterTable::from_constants(constants))
    }

    /// The parameter table witnesses are evaluated against
    pub fn table(&self) -> &ParameterTable {
        &self.table
    }

    /// Evaluate every witness, in claim order
    pub fn evaluate_all(&self, claims: &[Claim]) -> Vec<WitnessResult> {
        claims.iter().filter_map(|claim| self.evaluate(claim)).collect()
    }

    /// Evaluate a claim's witness; `None` when the claim declares none
    pub fn evaluate(&self, claim: &Claim) -> Option<WitnessResult> {
        let spec = claim.witness.as_ref()?;

        let first = self.run(&claim.id, spec);
        let second = self.run(&claim.id, spec);
        let result = reconcile(first, second);
        if result.nondeterministic {
            warn!(claim = %claim.id, check = %spec.check, "witness is nondeterministic");
        } else {
            debug!(
                claim = %claim.id,
                check = %spec.check,
                success = result.success,
                "evaluated witness"
            );
        }
        Some(result)
    }

    fn run(&self, claim_id: &ClaimId, spec: &WitnessSpec) -> WitnessResult {
        let mut evaluation = self.table.evaluation();
        let outcome = compare(&mut evaluation, spec);

        let mut result = WitnessResult {
            claim_id: claim_id.clone(),
            check: spec.check.clone(),
            mode: spec.mode.name(),
            success: false,
            value: None,
            value_text: None,
            expected: None,
            diagnostic: None,
            external_inputs: evaluation.external_inputs().to_vec(),
            nondeterministic: false,
        };

        match outcome {
            Ok(outcome) => {
                result.success = outcome.success;
                result.value = outcome.value.to_f64();
                result.value_text = Some(outcome.value.to_string());
                result.expected = outcome.expected.and_then(|e| e.to_f64());
                result.diagnostic = outcome.diagnostic;
            }
            Err(e) => {
                result.diagnostic = Some(format!("evaluation failed: {}", e));
            }
        }
        result
    }
}

/// Keep the first pass unless the second disagrees with it
fn reconcile(first: WitnessResult, second: WitnessResult) -> WitnessResult {
    if first.same_outcome(&second) {
        return first;
    }
    let diagnostic = format!(
        "nondeterministic: first pass gave {}, second pass gave {}",
        first.value_text.as_deref().unwrap_or("an error"),
        second.value_text.as_deref().unwrap_or("an error"),
    );
    WitnessResult {
        success: false,
        diagnostic: Some(diagnostic),
        nondeterministic: true,
        ..first
    }
}

fn compare(evaluation: &mut Evaluation<'_>, spec: &WitnessSpec) -> Result<Outcome, EvalError> {
    let actual = evaluation.evaluate_str(&spec.expression)?;
    let expected_source = spec.expected.as_deref().unwrap_or_default();

    match &spec.mode {
        ComparisonMode::ExactEquality { tolerance } => {
            let expected = evaluation.evaluate_str(expected_source)?;
            actual.number("exact-equality")?;
            expected.number("exact-equality")?;

            if let (Some(a), Some(e)) = (actual.as_exact(), expected.as_exact()) {
                if a == e {
                    return Ok(Outcome::pass(actual, Some(expected)));
                }
            }
            let error = relative_error(actual, expected)?;
            if error <= *tolerance {
                Ok(Outcome::pass(actual, Some(expected)))
            } else {
                Ok(Outcome::fail(
                    actual,
                    Some(expected),
                    format!(
                        "expected {}, got {} (relative error {:.3e} exceeds {:.0e})",
                        expected, actual, error, tolerance
                    ),
                ))
            }
        }
        ComparisonMode::AbsoluteTolerance { tolerance } => {
            let expected = evaluation.evaluate_str(expected_source)?;
            let difference = absolute_difference(actual, expected)?;
            if difference <= *tolerance {
                Ok(Outcome::pass(actual, Some(expected)))
            } else {
                Ok(Outcome::fail(
                    actual,
                    Some(expected),
                    format!(
                        "expected {}, got {} (difference {:.3e} exceeds {:.0e})",
                        expected, actual, difference, tolerance
                    ),
                ))
            }
        }
        ComparisonMode::BooleanPredicate => {
            let holds = actual.boolean("boolean-predicate")?;
            let wanted = match spec.expected.as_deref() {
                Some(source) => evaluation.evaluate_str(source)?.boolean("boolean-predicate")?,
                None => true,
            };
            if holds == wanted {
                Ok(Outcome::pass(actual, None))
            } else {
                Ok(Outcome::fail(
                    actual,
                    None,
                    format!("predicate evaluated to {}, expected {}", holds, wanted),
                ))
            }
        }
        ComparisonMode::Interval { min, max } => {
            let low = evaluation.evaluate_str(min)?;
            let high = evaluation.evaluate_str(max)?;
            let inside = actual.compare(&low, "interval")?.is_ge()
                && actual.compare(&high, "interval")?.is_le();
            if inside {
                Ok(Outcome::pass(actual, None))
            } else {
                Ok(Outcome::fail(
                    actual,
                    None,
                    format!("{} lies outside [{}, {}]", actual, low, high),
                ))
            }
        }
    }
}

impl Outcome {
    fn pass(value: Value, expected: Option<Value>) -> Self {
        Self {
            success: true,
            value,
            expected,
            diagnostic: None,
        }
    }

    fn fail(value: Value, expected: Option<Value>, diagnostic: String) -> Self {
        Self {
            success: false,
            value,
            expected,
            diagnostic: Some(diagnostic),
        }
    }
}

fn relative_error(actual: Value, expected: Value) -> Result<f64, EvalError> {
    if let (Some(a), Some(e)) = (actual.as_exact(), expected.as_exact()) {
        let error = a.checked_sub(&e).and_then(|difference| {
            if e.is_zero() {
                Some(difference)
            } else {
                difference.checked_div(&e)
            }
        });
        if let Some(error) = error {
            return Ok(error.to_f64().abs());
        }
    }

    let (a, e) = (
        actual.number("exact-equality")?,
        expected.number("exact-equality")?,
    );
    Ok(if e == 0.0 { a.abs() } else { ((a - e) / e).abs() })
}

fn absolute_difference(actual: Value, expected: Value) -> Result<f64, EvalError> {
    if let (Some(a), Some(e)) = (actual.as_exact(), expected.as_exact()) {
        if let Some(difference) = a.checked_sub(&e) {
            return Ok(difference.to_f64().abs());
        }
    }
    let (a, e) = (
        actual.number("absolute-tolerance")?,
        expected.number("absolute-tolerance")?,
    );
    Ok((a - e).abs())
}
