//! Cell value representation
//!
//! This module defines the [`Value`] enum, which represents everything that can
//! occupy a grid cell: either an arbitrary-precision integer or an operator.
//!
//! # Operator Alphabet
//!
//! | Symbol | Opcode | Role |
//! |--------|--------|------|
//! | `<` `>` `^` `v` | [`OpCode::MoveLeft`] .. [`OpCode::MoveDown`] | directional movers |
//! | `+` `-` `*` `/` `%` | [`OpCode::Add`] .. [`OpCode::Rem`] | binary arithmetic |
//! | `=` `#` | [`OpCode::Equal`], [`OpCode::NotEqual`] | equality testers |
//! | `@` | [`OpCode::Warp`] | time travel |
//! | `S` | [`OpCode::Submit`] | result sink |
//! | `A` `B` | [`OpCode::ParamA`], [`OpCode::ParamB`] | input placeholders |
//!
//! Values render back to exactly the token they were parsed from, so a grid
//! printed with [`Grid`](super::grid::Grid)'s `Display` can be parsed again.

use num_bigint::BigInt;
use std::fmt;
use thiserror::Error;

/// Operator symbols understood by the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    MoveLeft,  // <
    MoveRight, // >
    MoveUp,    // ^
    MoveDown,  // v
    Add,       // +
    Sub,       // -
    Mul,       // *
    Div,       // /
    Rem,       // %
    Equal,     // =
    NotEqual,  // #
    Warp,      // @
    Submit,    // S
    ParamA,    // A
    ParamB,    // B
}

impl OpCode {
    /// Look up the opcode for a single-character symbol
    pub fn from_symbol(symbol: char) -> Option<Self> {
        let op = match symbol {
            '<' => OpCode::MoveLeft,
            '>' => OpCode::MoveRight,
            '^' => OpCode::MoveUp,
            'v' => OpCode::MoveDown,
            '+' => OpCode::Add,
            '-' => OpCode::Sub,
            '*' => OpCode::Mul,
            '/' => OpCode::Div,
            '%' => OpCode::Rem,
            '=' => OpCode::Equal,
            '#' => OpCode::NotEqual,
            '@' => OpCode::Warp,
            'S' => OpCode::Submit,
            'A' => OpCode::ParamA,
            'B' => OpCode::ParamB,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(self) -> char {
        match self {
            OpCode::MoveLeft => '<',
            OpCode::MoveRight => '>',
            OpCode::MoveUp => '^',
            OpCode::MoveDown => 'v',
            OpCode::Add => '+',
            OpCode::Sub => '-',
            OpCode::Mul => '*',
            OpCode::Div => '/',
            OpCode::Rem => '%',
            OpCode::Equal => '=',
            OpCode::NotEqual => '#',
            OpCode::Warp => '@',
            OpCode::Submit => 'S',
            OpCode::ParamA => 'A',
            OpCode::ParamB => 'B',
        }
    }

    /// Placeholders only exist between parsing and parameter substitution
    pub fn is_placeholder(self) -> bool {
        matches!(self, OpCode::ParamA | OpCode::ParamB)
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Errors produced when a single token cannot become a [`Value`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("unknown operator symbol '{0}'")]
    UnknownOperator(char),

    #[error("malformed integer literal '{0}'")]
    InvalidInteger(String),
}

/// Contents of an occupied cell
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Int(BigInt),
    Op(OpCode),
}

impl Value {
    /// Parse a single program token.
    ///
    /// A token consisting of one non-digit character is an operator symbol;
    /// anything else must be a signed decimal integer.
    pub fn from_token(token: &str) -> Result<Self, TokenError> {
        let mut chars = token.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if !c.is_ascii_digit() {
                return OpCode::from_symbol(c)
                    .map(Value::Op)
                    .ok_or(TokenError::UnknownOperator(c));
            }
        }

        token
            .parse::<BigInt>()
            .map(Value::Int)
            .map_err(|_| TokenError::InvalidInteger(token.to_string()))
    }

    /// Get the integer value, returns None if this is an operator
    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            Value::Int(n) => Some(n),
            Value::Op(_) => None,
        }
    }

    /// Get the opcode, returns None if this is an integer
    pub fn as_op(&self) -> Option<OpCode> {
        match self {
            Value::Op(op) => Some(*op),
            Value::Int(_) => None,
        }
    }

    pub fn is_op(&self, op: OpCode) -> bool {
        self.as_op() == Some(op)
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::Int(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(BigInt::from(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(BigInt::from(n))
    }
}

impl From<OpCode> for Value {
    fn from(op: OpCode) -> Self {
        Value::Op(op)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Op(op) => write!(f, "{}", op),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_symbols_become_operators() {
        assert_eq!(Value::from_token("+"), Ok(Value::Op(OpCode::Add)));
        assert_eq!(Value::from_token("-"), Ok(Value::Op(OpCode::Sub)));
        assert_eq!(Value::from_token("v"), Ok(Value::Op(OpCode::MoveDown)));
        assert_eq!(Value::from_token("A"), Ok(Value::Op(OpCode::ParamA)));
    }

    #[test]
    fn test_integers() {
        assert_eq!(Value::from_token("7"), Ok(Value::from(7)));
        assert_eq!(Value::from_token("-12"), Ok(Value::from(-12)));

        let big = "123456789012345678901234567890";
        let parsed = Value::from_token(big).unwrap();
        assert_eq!(parsed.to_string(), big);
    }

    #[test]
    fn test_malformed_tokens() {
        assert_eq!(
            Value::from_token("x"),
            Err(TokenError::UnknownOperator('x'))
        );
        assert!(matches!(
            Value::from_token("12ab"),
            Err(TokenError::InvalidInteger(ref s)) if s == "12ab"
        ));
        assert!(matches!(
            Value::from_token("--"),
            Err(TokenError::InvalidInteger(_))
        ));
    }

    #[test]
    fn test_rendering_matches_source_token() {
        for token in ["<", ">", "^", "v", "=", "#", "@", "S", "%", "0", "-3"] {
            assert_eq!(Value::from_token(token).unwrap().to_string(), token);
        }
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(Value::from(5), Value::from_token("5").unwrap());
        assert_ne!(Value::from(5), Value::Op(OpCode::Add));
        assert!(Value::Op(OpCode::Submit).is_op(OpCode::Submit));
        assert!(Value::from(1).as_op().is_none());
    }
}
