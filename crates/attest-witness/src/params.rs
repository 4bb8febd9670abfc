//! Parameter table and expression evaluation

use std::collections::HashMap;

use attest_domain::Constant;

use crate::parser::{parse, BinaryOp, Expr, UnaryOp};
use crate::{EvalError, ParseError, Rational, Value};

/// Largest argument `fact` accepts before the result overflows `f64`
const MAX_FACTORIAL: i128 = 170;

/// Longest chain of constants defined in terms of other constants
pub const MAX_CONSTANT_CHAIN: usize = 64;

/// Deepest expression recursion a single evaluation allows
pub const MAX_EVAL_DEPTH: usize = 512;

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    definition: Result<Expr, ParseError>,
    external: Option<String>,
}

/// Named constants available to witness expressions
///
/// Definitions are parsed once when the table is built and evaluated lazily,
/// so constants may reference each other in any order. Evaluation state lives
/// in an [`Evaluation`], never in the table itself.
#[derive(Debug, Clone, Default)]
pub struct ParameterTable {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl ParameterTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from constant definitions; the first definition of a
    /// name wins
    pub fn from_constants(constants: &[Constant]) -> Self {
        let mut table = Self::new();
        for constant in constants {
            if table.index.contains_key(&constant.name) {
                continue;
            }
            table.index.insert(constant.name.clone(), table.entries.len());
            table.entries.push(Entry {
                name: constant.name.clone(),
                definition: parse(&constant.value),
                external: constant.external.clone(),
            });
        }
        table
    }

    /// Number of constants
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no constants
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a constant with the given name exists
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Reference of an externally imported constant
    pub fn external_reference(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .and_then(|&i| self.entries[i].external.as_deref())
    }

    /// Start a fresh evaluation against this table
    pub fn evaluation(&self) -> Evaluation<'_> {
        Evaluation {
            table: self,
            memo: HashMap::new(),
            active: Vec::new(),
            externals: Vec::new(),
            depth: 0,
        }
    }

    /// Parse and evaluate an expression in a fresh evaluation
    pub fn evaluate_str(&self, source: &str) -> Result<Value, EvalError> {
        self.evaluation().evaluate_str(source)
    }
}

/// One evaluation pass over a parameter table
///
/// Constant values are memoised for the lifetime of the pass, and every
/// external constant consumed along the way is recorded.
pub struct Evaluation<'t> {
    table: &'t ParameterTable,
    memo: HashMap<usize, Value>,
    active: Vec<usize>,
    externals: Vec<String>,
    depth: usize,
}

impl Evaluation<'_> {
    /// Parse and evaluate an expression
    pub fn evaluate_str(&mut self, source: &str) -> Result<Value, EvalError> {
        let expr = parse(source)?;
        self.evaluate(&expr)
    }

    /// External constants consumed so far, in first-use order
    pub fn external_inputs(&self) -> &[String] {
        &self.externals
    }

    /// Evaluate a parsed expression
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        if self.depth >= MAX_EVAL_DEPTH {
            return Err(EvalError::TooDeep(MAX_EVAL_DEPTH));
        }
        self.depth += 1;
        let result = self.evaluate_node(expr);
        self.depth -= 1;
        result
    }

    fn evaluate_node(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Literal(value) => Ok(*value),
            Expr::Ident(name) => self.lookup(name),
            Expr::Unary(op, operand) => {
                let value = self.evaluate(operand)?;
                unary(*op, value)
            }
            Expr::Binary(BinaryOp::And, left, right) => {
                if !self.evaluate(left)?.boolean("&&")? {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(self.evaluate(right)?.boolean("&&")?))
            }
            Expr::Binary(BinaryOp::Or, left, right) => {
                if self.evaluate(left)?.boolean("||")? {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(self.evaluate(right)?.boolean("||")?))
            }
            Expr::Binary(op, left, right) => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                binary(*op, left, right)
            }
            Expr::Call(name, args) => self.call(name, args),
        }
    }

    fn lookup(&mut self, name: &str) -> Result<Value, EvalError> {
        let table = self.table;
        let Some(&slot) = table.index.get(name) else {
            return match name {
                "pi" => Ok(Value::Approx(std::f64::consts::PI)),
                _ => Err(EvalError::UnknownIdentifier(name.to_string())),
            };
        };

        if let Some(value) = self.memo.get(&slot) {
            return Ok(*value);
        }
        if let Some(start) = self.active.iter().position(|&s| s == slot) {
            let mut path: Vec<&str> = self.active[start..]
                .iter()
                .map(|&s| table.entries[s].name.as_str())
                .collect();
            path.push(name);
            return Err(EvalError::CyclicConstant(path.join(" -> ")));
        }
        if self.active.len() >= MAX_CONSTANT_CHAIN {
            return Err(EvalError::ChainTooLong {
                name: name.to_string(),
                limit: MAX_CONSTANT_CHAIN,
            });
        }

        let entry = &table.entries[slot];
        if entry.external.is_some() && !self.externals.iter().any(|e| e == name) {
            self.externals.push(name.to_string());
        }

        self.active.push(slot);
        let result = match &entry.definition {
            Ok(expr) => self.evaluate(expr),
            Err(e) => Err(EvalError::Parse(e.clone())),
        };
        self.active.pop();

        let value = result.map_err(|e| match e {
            EvalError::Constant { .. }
            | EvalError::CyclicConstant(_)
            | EvalError::ChainTooLong { .. }
            | EvalError::TooDeep(_) => e,
            other => EvalError::Constant {
                name: name.to_string(),
                source: Box::new(other),
            },
        })?;
        self.memo.insert(slot, value);
        Ok(value)
    }

    fn call(&mut self, name: &str, args: &[Expr]) -> Result<Value, EvalError> {
        let arity = match name {
            "abs" | "sqrt" | "fact" => Some(1),
            "min" | "max" => None,
            _ => return Err(EvalError::UnknownFunction(name.to_string())),
        };
        match arity {
            Some(n) if args.len() != n => {
                return Err(EvalError::Arity {
                    function: name.to_string(),
                    expected: n.to_string(),
                    actual: args.len(),
                })
            }
            None if args.is_empty() => {
                return Err(EvalError::Arity {
                    function: name.to_string(),
                    expected: "at least 1".to_string(),
                    actual: 0,
                })
            }
            _ => {}
        }

        let values = args
            .iter()
            .map(|arg| self.evaluate(arg))
            .collect::<Result<Vec<_>, _>>()?;

        match name {
            "abs" => match values[0] {
                Value::Exact(q) => match q.checked_abs() {
                    Some(abs) => Ok(Value::Exact(abs)),
                    None => Value::finite(q.to_f64().abs(), "abs"),
                },
                other => Ok(Value::Approx(other.number("abs")?.abs())),
            },
            "sqrt" => sqrt(values[0]),
            "fact" => factorial(values[0]),
            _ => {
                let mut best = values[0];
                for candidate in &values[1..] {
                    let ordering = candidate.compare(&best, name)?;
                    let better = if name == "min" {
                        ordering.is_lt()
                    } else {
                        ordering.is_gt()
                    };
                    if better {
                        best = *candidate;
                    }
                }
                best.number(name)?;
                Ok(best)
            }
        }
    }
}

fn unary(op: UnaryOp, value: Value) -> Result<Value, EvalError> {
    match op {
        UnaryOp::Neg => match value {
            Value::Exact(q) => match q.checked_neg() {
                Some(neg) => Ok(Value::Exact(neg)),
                None => Value::finite(-q.to_f64(), "-"),
            },
            other => Ok(Value::Approx(-other.number("-")?)),
        },
        UnaryOp::Not => Ok(Value::Bool(!value.boolean("!")?)),
    }
}

fn binary(op: BinaryOp, left: Value, right: Value) -> Result<Value, EvalError> {
    let symbol = op.symbol();
    match op {
        BinaryOp::Lt => Ok(Value::Bool(left.compare(&right, symbol)?.is_lt())),
        BinaryOp::Le => Ok(Value::Bool(left.compare(&right, symbol)?.is_le())),
        BinaryOp::Gt => Ok(Value::Bool(left.compare(&right, symbol)?.is_gt())),
        BinaryOp::Ge => Ok(Value::Bool(left.compare(&right, symbol)?.is_ge())),
        BinaryOp::Eq | BinaryOp::Ne => {
            let equal = match (left, right) {
                (Value::Bool(a), Value::Bool(b)) => a == b,
                _ => left.compare(&right, symbol)?.is_eq(),
            };
            Ok(Value::Bool(equal == (op == BinaryOp::Eq)))
        }
        _ => arithmetic(op, left, right),
    }
}

fn arithmetic(op: BinaryOp, left: Value, right: Value) -> Result<Value, EvalError> {
    let symbol = op.symbol();

    if let (Value::Exact(a), Value::Exact(b)) = (left, right) {
        let exact = match op {
            BinaryOp::Add => a.checked_add(&b),
            BinaryOp::Sub => a.checked_sub(&b),
            BinaryOp::Mul => a.checked_mul(&b),
            BinaryOp::Div if b.is_zero() => return Err(EvalError::DivisionByZero),
            BinaryOp::Div => a.checked_div(&b),
            BinaryOp::Pow if b.is_integer() => {
                if a.is_zero() && b.numer() < 0 {
                    return Err(EvalError::DivisionByZero);
                }
                a.checked_pow(b.numer())
            }
            _ => None,
        };
        if let Some(q) = exact {
            return Ok(Value::Exact(q));
        }
    }

    let (a, b) = (left.number(symbol)?, right.number(symbol)?);
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            a / b
        }
        BinaryOp::Pow => {
            if a < 0.0 && b.fract() != 0.0 {
                return Err(EvalError::Domain(format!(
                    "negative base {} with fractional exponent {}",
                    a, b
                )));
            }
            if a == 0.0 && b < 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            a.powf(b)
        }
        _ => {
            return Err(EvalError::TypeMismatch(format!(
                "'{}' is not an arithmetic operator",
                symbol
            )))
        }
    };
    Value::finite(result, symbol)
}

fn sqrt(value: Value) -> Result<Value, EvalError> {
    let x = value.number("sqrt")?;
    if x < 0.0 {
        return Err(EvalError::Domain(format!("sqrt of negative number {}", value)));
    }
    if let Some(root) = value.as_exact().and_then(|q| q.checked_sqrt()) {
        return Ok(Value::Exact(root));
    }
    Value::finite(x.sqrt(), "sqrt")
}

fn factorial(value: Value) -> Result<Value, EvalError> {
    let n = match value.as_exact() {
        Some(q) if q.is_integer() && q.numer() >= 0 => q.numer(),
        _ => {
            return Err(EvalError::Domain(format!(
                "fact expects a non-negative integer, got {}",
                value
            )))
        }
    };
    if n > MAX_FACTORIAL {
        return Err(EvalError::NonFinite(format!("fact({})", n)));
    }

    let mut exact = Some(Rational::ONE);
    let mut approx = 1.0f64;
    for k in 2..=n {
        exact = exact.and_then(|acc| acc.checked_mul(&Rational::integer(k)));
        approx *= k as f64;
    }
    match exact {
        Some(q) => Ok(Value::Exact(q)),
        None => Value::finite(approx, "fact"),
    }
}
