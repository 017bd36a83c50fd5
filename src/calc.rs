//! Calculator: a small arithmetic evaluator and the key-driven display state.
//!
//! The evaluator understands `+ - * / **`, parentheses, unary signs and
//! decimal literals. `**` is right-associative and binds tighter than a unary
//! sign on its left (`-2**2` is `-4`).

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// Text shown in place of a result when evaluation fails.
pub const ERROR_TEXT: &str = "Error";

/// Nesting limit for parentheses, unary signs and exponents.
const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    UnexpectedEnd,
    UnexpectedChar(char, usize),
    InvalidNumber(String),
    TrailingInput(usize),
    DivisionByZero,
    NotANumber,
    TooDeep,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UnexpectedEnd => write!(f, "unexpected end of expression"),
            EvalError::UnexpectedChar(ch, pos) => write!(f, "unexpected '{ch}' at {pos}"),
            EvalError::InvalidNumber(raw) => write!(f, "invalid number '{raw}'"),
            EvalError::TrailingInput(pos) => write!(f, "unexpected input at {pos}"),
            EvalError::DivisionByZero => write!(f, "division by zero"),
            EvalError::NotANumber => write!(f, "result is not a real number"),
            EvalError::TooDeep => write!(f, "expression nested deeper than {MAX_DEPTH} levels"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Pow,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> std::result::Result<Vec<(Token, usize)>, EvalError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let ch = chars[pos];
        match ch {
            ' ' | '\t' => {
                pos += 1;
            }
            '0'..='9' | '.' => {
                let start = pos;
                while pos < chars.len() && (chars[pos].is_ascii_digit() || chars[pos] == '.') {
                    pos += 1;
                }
                let raw: String = chars[start..pos].iter().collect();
                let value = raw
                    .parse::<f64>()
                    .map_err(|_| EvalError::InvalidNumber(raw.clone()))?;
                tokens.push((Token::Number(value), start));
            }
            '+' => {
                tokens.push((Token::Plus, pos));
                pos += 1;
            }
            '-' => {
                tokens.push((Token::Minus, pos));
                pos += 1;
            }
            '*' => {
                if chars.get(pos + 1) == Some(&'*') {
                    tokens.push((Token::Pow, pos));
                    pos += 2;
                } else {
                    tokens.push((Token::Star, pos));
                    pos += 1;
                }
            }
            '/' => {
                tokens.push((Token::Slash, pos));
                pos += 1;
            }
            '(' => {
                tokens.push((Token::LParen, pos));
                pos += 1;
            }
            ')' => {
                tokens.push((Token::RParen, pos));
                pos += 1;
            }
            other => return Err(EvalError::UnexpectedChar(other, pos)),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|(token, _)| *token)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expr(&mut self) -> std::result::Result<f64, EvalError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> std::result::Result<f64, EvalError> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    // Every recursive path (parens, signs, exponents) passes through here.
    fn unary(&mut self) -> std::result::Result<f64, EvalError> {
        if self.depth >= MAX_DEPTH {
            return Err(EvalError::TooDeep);
        }
        self.depth += 1;
        let value = self.signed();
        self.depth -= 1;
        value
    }

    fn signed(&mut self) -> std::result::Result<f64, EvalError> {
        match self.peek() {
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> std::result::Result<f64, EvalError> {
        let base = self.primary()?;
        if self.peek() == Some(Token::Pow) {
            self.pos += 1;
            let exponent = self.unary()?;
            if base == 0.0 && exponent < 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> std::result::Result<f64, EvalError> {
        let at = self.tokens.get(self.pos).map(|(_, pos)| *pos);
        match self.next() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::LParen) => {
                let value = self.expr()?;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    Some(_) => Err(EvalError::TrailingInput(self.offset_of(self.pos - 1))),
                    None => Err(EvalError::UnexpectedEnd),
                }
            }
            Some(_) => Err(EvalError::TrailingInput(at.unwrap_or_default())),
            None => Err(EvalError::UnexpectedEnd),
        }
    }

    fn offset_of(&self, idx: usize) -> usize {
        self.tokens.get(idx).map(|(_, pos)| *pos).unwrap_or_default()
    }
}

/// Evaluate an arithmetic expression.
pub fn evaluate(input: &str) -> std::result::Result<f64, EvalError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if parser.pos < parser.tokens.len() {
        return Err(EvalError::TrailingInput(parser.offset_of(parser.pos)));
    }
    if !value.is_finite() {
        return Err(EvalError::NotANumber);
    }
    Ok(value)
}

/// Render a result: integral values without a fractional part.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        // Avoid "-0".
        format!("{:.0}", value + 0.0)
    } else {
        value.to_string()
    }
}

/// Evaluate and render, or `Error`.
pub fn evaluate_display(input: &str) -> String {
    match evaluate(input) {
        Ok(value) => format_number(value),
        Err(err) => {
            tracing::debug!(expression = input, error = %err, "evaluation failed");
            ERROR_TEXT.to_string()
        }
    }
}

// =============================================================================
// Key-driven state
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A digit or the decimal point
    Digit(char),
    Operator(char),
    Clear,
    Square,
    Sqrt,
    Equals,
}

impl Key {
    pub fn from_char(ch: char) -> Result<Key> {
        match ch {
            '0'..='9' | '.' => Ok(Key::Digit(ch)),
            '+' | '-' | '*' | '/' => Ok(Key::Operator(ch)),
            'c' | 'C' => Ok(Key::Clear),
            's' | 'S' => Ok(Key::Square),
            'r' | 'R' => Ok(Key::Sqrt),
            '=' => Ok(Key::Equals),
            other => Err(Error::InvalidArgument(format!(
                "unknown key '{other}': use digits, '.', + - * /, =, c (clear), s (square), r (sqrt)"
            ))),
        }
    }

    /// Parse a key sequence, ignoring whitespace.
    pub fn parse_sequence(raw: &str) -> Result<Vec<Key>> {
        raw.chars()
            .filter(|ch| !ch.is_whitespace())
            .map(Key::from_char)
            .collect()
    }
}

/// Operator symbol shown on the running-total line.
fn operator_symbol(op: char) -> Option<&'static str> {
    match op {
        '/' => Some(" ÷ "),
        '*' => Some(" × "),
        '-' => Some(" - "),
        '+' => Some(" + "),
        _ => None,
    }
}

/// Immutable view of the calculator, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Screen {
    /// Running expression with operator symbols
    pub total: String,
    /// Current entry, truncated to the display width
    pub current: String,
    pub error: bool,
}

/// Two-line calculator state: the accumulated expression and the entry
/// being typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculator {
    total: String,
    current: String,
    display_width: usize,
}

impl Calculator {
    pub fn new(display_width: usize) -> Self {
        Self {
            total: String::new(),
            current: String::new(),
            display_width,
        }
    }

    pub fn total(&self) -> &str {
        &self.total
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn press(&mut self, key: Key) {
        match key {
            Key::Digit(ch) => self.current.push(ch),
            Key::Operator(op) => {
                self.current.push(op);
                self.total.push_str(&self.current);
                self.current.clear();
            }
            Key::Clear => {
                self.total.clear();
                self.current.clear();
            }
            Key::Square => {
                self.current = evaluate_display(&format!("{}**2", self.current));
            }
            Key::Sqrt => {
                self.current = evaluate_display(&format!("{}**0.5", self.current));
            }
            Key::Equals => {
                self.total.push_str(&self.current);
                match evaluate(&self.total) {
                    Ok(value) => {
                        self.current = format_number(value);
                        self.total.clear();
                    }
                    Err(err) => {
                        tracing::debug!(expression = %self.total, error = %err, "evaluation failed");
                        self.current = ERROR_TEXT.to_string();
                    }
                }
            }
        }
    }

    pub fn press_all(&mut self, keys: impl IntoIterator<Item = Key>) {
        for key in keys {
            self.press(key);
        }
    }

    pub fn screen(&self) -> Screen {
        let total = self
            .total
            .chars()
            .map(|ch| match operator_symbol(ch) {
                Some(symbol) => symbol.to_string(),
                None => ch.to_string(),
            })
            .collect();
        Screen {
            total,
            current: self.current.chars().take(self.display_width).collect(),
            error: self.current == ERROR_TEXT,
        }
    }
}
