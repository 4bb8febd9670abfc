//! Runtime values of the expression language

use std::cmp::Ordering;
use std::fmt;

use crate::{EvalError, Rational};

/// Result of evaluating an expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// Exact rational number
    Exact(Rational),

    /// Floating-point approximation
    Approx(f64),

    /// Truth value
    Bool(bool),
}

impl Value {
    /// Name of the value's type, for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Exact(_) | Value::Approx(_) => "number",
            Value::Bool(_) => "boolean",
        }
    }

    /// Numeric value as a float; `None` for booleans
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Exact(q) => Some(q.to_f64()),
            Value::Approx(x) => Some(*x),
            Value::Bool(_) => None,
        }
    }

    /// Exact rational value, if the value is one
    pub fn as_exact(&self) -> Option<Rational> {
        match self {
            Value::Exact(q) => Some(*q),
            _ => None,
        }
    }

    /// Truth value, if the value is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric value, or a type mismatch naming the operation
    pub fn number(&self, operation: &str) -> Result<f64, EvalError> {
        self.to_f64().ok_or_else(|| {
            EvalError::TypeMismatch(format!("{} expects a number, got a boolean", operation))
        })
    }

    /// Truth value, or a type mismatch naming the operation
    pub fn boolean(&self, operation: &str) -> Result<bool, EvalError> {
        self.as_bool().ok_or_else(|| {
            EvalError::TypeMismatch(format!("{} expects a boolean, got a number", operation))
        })
    }

    /// Wrap a float, rejecting infinities and NaN
    pub fn finite(value: f64, operation: &str) -> Result<Value, EvalError> {
        if value.is_finite() {
            Ok(Value::Approx(value))
        } else {
            Err(EvalError::NonFinite(operation.to_string()))
        }
    }

    /// Compare two numbers, exactly when both are exact
    pub fn compare(&self, other: &Value, operation: &str) -> Result<Ordering, EvalError> {
        if let (Value::Exact(a), Value::Exact(b)) = (self, other) {
            return Ok(a.cmp(b));
        }
        let (a, b) = (self.number(operation)?, other.number(operation)?);
        a.partial_cmp(&b)
            .ok_or_else(|| EvalError::NonFinite(operation.to_string()))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Exact(q) => write!(f, "{}", q),
            Value::Approx(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}
