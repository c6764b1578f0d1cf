//! Program text parser
//!
//! This module provides the [`Parser`] struct, which turns the textual board
//! layout into the initial [`Grid`].
//!
//! # Layout Rules
//!
//! - Rows are separated by line breaks (`\n` or `\r\n`)
//! - Tokens within a row are separated by any run of whitespace; leading
//!   indentation is ignored
//! - `.` marks an empty cell
//! - The n-th token of the m-th line lands at coordinate `(n, m)`, both 0-based

use crate::board::{Coord, Grid, TokenError, Value};
use thiserror::Error;

/// Position of a token in the program text (1-based line and token column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl ParseError {
    fn from_token(err: TokenError, location: SourceLocation) -> Self {
        ParseError {
            message: err.to_string(),
            location,
        }
    }
}

/// Parser for board layouts
pub struct Parser<'a> {
    source: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Parse the whole layout into the initial grid (placeholders intact)
    pub fn parse_grid(&self) -> Result<Grid, ParseError> {
        let mut grid = Grid::new();

        for (row, line) in self.source.lines().enumerate() {
            for (column, token) in line.split_whitespace().enumerate() {
                if token == "." {
                    continue;
                }

                let location = SourceLocation::new(row + 1, column + 1);
                let value = Value::from_token(token)
                    .map_err(|err| ParseError::from_token(err, location))?;
                let coord = Coord::new(to_axis(column, location)?, to_axis(row, location)?);
                grid.insert(coord, value);
            }
        }

        Ok(grid)
    }
}

fn to_axis(index: usize, location: SourceLocation) -> Result<i64, ParseError> {
    i64::try_from(index).map_err(|_| ParseError {
        message: "board too large".to_string(),
        location,
    })
}

/// Convenience wrapper around [`Parser::parse_grid`]
pub fn parse_grid(source: &str) -> Result<Grid, ParseError> {
    Parser::new(source).parse_grid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::OpCode;

    #[test]
    fn test_parse_simple_layout() {
        let grid = parse_grid(". 4 .\n3 + .\n. . .").unwrap();

        assert_eq!(grid.len(), 3);
        assert_eq!(grid.get(Coord::new(1, 0)), Some(&Value::from(4)));
        assert_eq!(grid.get(Coord::new(0, 1)), Some(&Value::from(3)));
        assert_eq!(grid.get(Coord::new(1, 1)), Some(&Value::Op(OpCode::Add)));
        assert_eq!(grid.get(Coord::new(2, 2)), None);
    }

    #[test]
    fn test_irregular_whitespace() {
        let grid = parse_grid("  1   >  .\r\n\t.  .   -7\n").unwrap();

        assert_eq!(grid.get(Coord::new(0, 0)), Some(&Value::from(1)));
        assert_eq!(
            grid.get(Coord::new(1, 0)),
            Some(&Value::Op(OpCode::MoveRight))
        );
        assert_eq!(grid.get(Coord::new(2, 1)), Some(&Value::from(-7)));
    }

    #[test]
    fn test_placeholders_survive_parsing() {
        let grid = parse_grid("A + B").unwrap();
        assert_eq!(
            grid.find_placeholder(),
            Some((Coord::new(0, 0), OpCode::ParamA))
        );
    }

    #[test]
    fn test_error_location() {
        let err = parse_grid(". . .\n. 1x .").unwrap_err();
        assert_eq!(err.location, SourceLocation::new(2, 2));
        assert!(err.to_string().contains("1x"));

        let err = parse_grid("? . .").unwrap_err();
        assert_eq!(err.location, SourceLocation::new(1, 1));
    }
}
