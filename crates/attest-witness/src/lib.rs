//! Attest Witness
//!
//! Evaluates the computable checks attached to claims.
//!
//! Witness expressions are written in a small arithmetic language over the
//! registry's constant table. Decimal literals and arithmetic on them are
//! exact rationals, so `3/13` and `6/26` compare equal without any rounding;
//! values only degrade to floating point on overflow or irrational
//! operations.
//!
//! # Examples
//!
//! ```
//! use attest_domain::Constant;
//! use attest_witness::ParameterTable;
//!
//! let table = ParameterTable::from_constants(&[
//!     Constant::new("gamma_1", "3"),
//!     Constant::new("gamma_2", "10"),
//! ]);
//! let value = table.evaluate_str("gamma_1 / (gamma_1 + gamma_2)").unwrap();
//! assert_eq!(value.to_string(), "3/13");
//! ```

#![warn(missing_docs)]

mod error;
mod evaluator;
mod parser;
mod params;
mod rational;
mod value;

pub use error::{EvalError, ParseError};
pub use evaluator::{WitnessEvaluator, WitnessResult};
pub use parser::{parse, BinaryOp, Expr, UnaryOp};
pub use params::{Evaluation, ParameterTable};
pub use rational::Rational;
pub use value::Value;
