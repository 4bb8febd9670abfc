//! Witness evaluation errors

use thiserror::Error;

/// Errors raised while parsing an expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Character outside the expression language
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar {
        /// Offending character
        ch: char,
        /// Byte offset
        pos: usize,
    },

    /// Token that does not fit the grammar
    #[error("unexpected '{found}' at position {pos}")]
    UnexpectedToken {
        /// Offending token
        found: String,
        /// Byte offset
        pos: usize,
    },

    /// Input ended in the middle of an expression
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// Malformed numeric literal
    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    /// Comparisons do not chain
    #[error("chained comparison at position {0}")]
    ChainedComparison(usize),

    /// Nothing to evaluate
    #[error("empty expression")]
    Empty,

    /// Expression has more tokens than the parser accepts
    #[error("expression longer than {0} tokens")]
    TooLong(usize),

    /// Nesting exceeds the parser's depth limit
    #[error("expression nested too deeply (limit {0})")]
    TooDeep(usize),
}

/// Errors raised while evaluating an expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Division by exactly zero
    #[error("division by zero")]
    DivisionByZero,

    /// Identifier is neither a constant nor a built-in
    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),

    /// Function name is not a built-in
    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    /// Wrong number of arguments
    #[error("{function} expects {expected} argument(s), got {actual}")]
    Arity {
        /// Function name
        function: String,
        /// Accepted argument count
        expected: String,
        /// Supplied argument count
        actual: usize,
    },

    /// Operand of the wrong type
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// Result is infinite or not a number
    #[error("non-finite result in {0}")]
    NonFinite(String),

    /// Constant defined in terms of itself
    #[error("cyclic constant definition: {0}")]
    CyclicConstant(String),

    /// Evaluation exceeded its recursion limit
    #[error("evaluation nested too deeply (limit {0})")]
    TooDeep(usize),

    /// Constants reference each other through too long a chain
    #[error("constant '{name}' is reached through more than {limit} nested constants")]
    ChainTooLong {
        /// Constant at which the limit was hit
        name: String,
        /// Longest chain accepted
        limit: usize,
    },

    /// Argument outside the operation's domain
    #[error("domain error: {0}")]
    Domain(String),

    /// Expression could not be parsed
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A constant's definition failed to evaluate
    #[error("in constant '{name}': {source}")]
    Constant {
        /// Constant name
        name: String,
        /// Underlying failure
        source: Box<EvalError>,
    },
}
