//! Expression lexer and recursive-descent parser
//!
//! Precedence, loosest first: `||`, `&&`, comparisons (non-associative),
//! `+ -`, `* /`, unary `- !`, `^` (right-associative), primaries.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::{ParseError, Rational, Value};

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation
    Neg,
    /// Logical not
    Not,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `^`
    Pow,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `&&`
    And,
    /// `||`
    Or,
}

impl BinaryOp {
    /// Operator symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    fn comparison(symbol: &str) -> Option<Self> {
        match symbol {
            "<" => Some(BinaryOp::Lt),
            "<=" => Some(BinaryOp::Le),
            ">" => Some(BinaryOp::Gt),
            ">=" => Some(BinaryOp::Ge),
            "==" => Some(BinaryOp::Eq),
            "!=" => Some(BinaryOp::Ne),
            _ => None,
        }
    }
}

/// Parsed expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Number or boolean literal
    Literal(Value),
    /// Constant or built-in name
    Ident(String),
    /// Unary operation
    Unary(UnaryOp, Box<Expr>),
    /// Binary operation
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    /// Built-in function call
    Call(String, Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Literal(Value),
    Ident(String),
    Op(&'static str),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Literal(value) => value.to_string(),
            Token::Ident(name) => name.clone(),
            Token::Op(op) => op.to_string(),
        }
    }
}

/// Longest expression accepted, in tokens
pub const MAX_TOKENS: usize = 1024;

/// Deepest nesting of parentheses, unary operators and exponents accepted
pub const MAX_DEPTH: usize = 64;

const OPERATORS: [&str; 17] = [
    "&&", "||", "<=", ">=", "==", "!=", "+", "-", "*", "/", "^", "!", "<", ">", "(", ")", ",",
];

fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
        } else if ch.is_ascii_digit() || ch == '.' {
            tokens.push((Token::Literal(number(source, &mut chars)?), pos));
        } else if ch.is_ascii_alphabetic() || ch == '_' {
            let end = take_while(&mut chars, |c| c.is_ascii_alphanumeric() || c == '_');
            let token = match &source[pos..end] {
                "true" => Token::Literal(Value::Bool(true)),
                "false" => Token::Literal(Value::Bool(false)),
                name => Token::Ident(name.to_string()),
            };
            tokens.push((token, pos));
        } else {
            let op = *OPERATORS
                .iter()
                .find(|op| source[pos..].starts_with(**op))
                .ok_or(ParseError::UnexpectedChar { ch, pos })?;
            for _ in 0..op.len() {
                chars.next();
            }
            tokens.push((Token::Op(op), pos));
        }
        if tokens.len() > MAX_TOKENS {
            return Err(ParseError::TooLong(MAX_TOKENS));
        }
    }

    Ok(tokens)
}

fn take_while(chars: &mut Peekable<CharIndices<'_>>, keep: impl Fn(char) -> bool) -> usize {
    let mut end = 0;
    while let Some(&(pos, ch)) = chars.peek() {
        if !keep(ch) {
            return pos;
        }
        end = pos + ch.len_utf8();
        chars.next();
    }
    end
}

fn number(source: &str, chars: &mut Peekable<CharIndices<'_>>) -> Result<Value, ParseError> {
    let start = chars.peek().map_or(source.len(), |&(pos, _)| pos);
    let mut end = take_while(chars, |c| c.is_ascii_digit() || c == '.');
    let mut has_exponent = false;

    if let Some(&(pos, 'e' | 'E')) = chars.peek() {
        let rest = &source[pos + 1..];
        let digits_at = usize::from(rest.starts_with(['+', '-']));
        if rest[digits_at..].starts_with(|c: char| c.is_ascii_digit()) {
            has_exponent = true;
            chars.next();
            if digits_at == 1 {
                chars.next();
            }
            end = take_while(chars, |c| c.is_ascii_digit());
        }
    }

    let text = &source[start..end];
    if !has_exponent {
        if let Some(exact) = Rational::from_decimal(text) {
            return Ok(Value::Exact(exact));
        }
    }
    match text.parse::<f64>() {
        Ok(x) if x.is_finite() => Ok(Value::Approx(x)),
        _ => Err(ParseError::InvalidNumber(text.to_string())),
    }
}

/// Parse an expression
///
/// # Examples
///
/// ```
/// use attest_witness::{parse, BinaryOp, Expr};
///
/// let expr = parse("1 + 2 * 3").unwrap();
/// assert!(matches!(expr, Expr::Binary(BinaryOp::Add, _, _)));
/// ```
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.or()?;
    match parser.tokens.get(parser.pos) {
        Some((token, pos)) => Err(ParseError::UnexpectedToken {
            found: token.describe(),
            pos: *pos,
        }),
        None => Ok(expr),
    }
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek_op(&self) -> Option<&'static str> {
        match self.tokens.get(self.pos) {
            Some((Token::Op(op), _)) => Some(*op),
            _ => None,
        }
    }

    fn eat(&mut self, op: &str) -> bool {
        if self.peek_op() == Some(op) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn unexpected(&self) -> ParseError {
        match self.tokens.get(self.pos) {
            Some((token, pos)) => ParseError::UnexpectedToken {
                found: token.describe(),
                pos: *pos,
            },
            None => ParseError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, op: &str) -> Result<(), ParseError> {
        if self.eat(op) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.and()?;
        while self.eat("||") {
            let right = self.and()?;
            left = Expr::Binary(BinaryOp::Or, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.comparison()?;
        while self.eat("&&") {
            let right = self.comparison()?;
            left = Expr::Binary(BinaryOp::And, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.additive()?;
        let Some(op) = self.peek_op().and_then(BinaryOp::comparison) else {
            return Ok(left);
        };
        self.pos += 1;
        let right = self.additive()?;

        if self.peek_op().and_then(BinaryOp::comparison).is_some() {
            let pos = self.tokens[self.pos].1;
            return Err(ParseError::ChainedComparison(pos));
        }
        Ok(Expr::Binary(op, Box::new(left), Box::new(right)))
    }

    fn additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.multiplicative()?;
        loop {
            let op = match self.peek_op() {
                Some("+") => BinaryOp::Add,
                Some("-") => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.multiplicative()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    fn multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek_op() {
                Some("*") => BinaryOp::Mul,
                Some("/") => BinaryOp::Div,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.unary()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    // Every nesting path (parentheses, call arguments, prefix operators and
    // exponents) passes through here, so this is where depth is bounded.
    fn unary(&mut self) -> Result<Expr, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let expr = self.prefixed();
        self.depth -= 1;
        expr
    }

    fn prefixed(&mut self) -> Result<Expr, ParseError> {
        if self.eat("-") {
            return Ok(Expr::Unary(UnaryOp::Neg, Box::new(self.unary()?)));
        }
        if self.eat("!") {
            return Ok(Expr::Unary(UnaryOp::Not, Box::new(self.unary()?)));
        }
        self.power()
    }

    fn power(&mut self) -> Result<Expr, ParseError> {
        let base = self.primary()?;
        if self.eat("^") {
            let exponent = self.unary()?;
            return Ok(Expr::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let Some((token, _)) = self.tokens.get(self.pos).cloned() else {
            return Err(ParseError::UnexpectedEnd);
        };

        match token {
            Token::Literal(value) => {
                self.pos += 1;
                Ok(Expr::Literal(value))
            }
            Token::Ident(name) => {
                self.pos += 1;
                if !self.eat("(") {
                    return Ok(Expr::Ident(name));
                }
                let mut args = Vec::new();
                if !self.eat(")") {
                    loop {
                        args.push(self.or()?);
                        if self.eat(")") {
                            break;
                        }
                        self.expect(",")?;
                    }
                }
                Ok(Expr::Call(name, args))
            }
            Token::Op("(") => {
                self.pos += 1;
                let inner = self.or()?;
                self.expect(")")?;
                Ok(inner)
            }
            Token::Op(_) => Err(self.unexpected()),
        }
    }
}
