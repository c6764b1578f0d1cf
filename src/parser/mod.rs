//! Board layout parser
//!
//! This module turns program text into the initial [`Grid`](crate::board::Grid):
//! - [`parse`]: the [`Parser`](parse::Parser), [`ParseError`](parse::ParseError)
//!   and source locations
//!
//! # Program Format
//!
//! ```text
//! .  4  .
//! 3  +  .
//! .  .  S
//! ```
//!
//! Whitespace-delimited tokens per row, `.` for an empty cell. Single
//! non-digit characters are operators; everything else is a decimal integer.

pub mod parse;

pub use parse::{ParseError, Parser, SourceLocation, parse_grid};
