//! Fatal simulation errors
//!
//! This module defines [`SimError`], which represents every way a run can abort.
//!
//! All simulation errors are fatal: the step that raised one is discarded
//! without touching the timeline, and the run stops. Exhausting the step budget
//! is not an error and is reported through
//! [`Outcome::StepBudgetExceeded`](super::engine::Outcome) instead.

use crate::board::{Coord, Offset, OpCode, Value};
use crate::parser::ParseError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Malformed program text
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A placeholder reached execution without being substituted
    #[error("placeholder '{symbol}' at {coord} was never substituted")]
    PlaceholderLeak { symbol: OpCode, coord: Coord },

    /// Two operators wrote different values to the same cell in one step
    #[error("conflicting writes to {coord}: {existing} and {incoming}")]
    WriteConflict {
        coord: Coord,
        existing: Value,
        incoming: Value,
    },

    /// Two warps in one step targeted different times
    #[error("attempt to warp to two different times: {first} and {second}")]
    WarpTimeConflict { first: usize, second: usize },

    /// Two warps in one step wrote different values to the same past cell
    #[error("attempt to warp two different values to {coord} at time {time}: {existing} and {incoming}")]
    WarpValueConflict {
        coord: Coord,
        time: usize,
        existing: Value,
        incoming: Value,
    },

    /// More than one distinct result in a step, or a result after one was recorded
    #[error("more than one result submitted: {}", format_values(.values))]
    MultipleSubmissions { values: Vec<Value> },

    /// `/` or `%` with a zero divisor
    #[error("division by zero at {coord}")]
    DivisionByZero { coord: Coord },

    /// Warp operands that cannot address a valid past snapshot
    #[error("invalid warp at {coord}: {reason}")]
    InvalidWarp { coord: Coord, reason: String },

    /// An operator on the outermost addressable cell wrote past it
    #[error("operator at {coord} writes past the edge of the board ({direction:?})")]
    EdgeOfBoard { coord: Coord, direction: Offset },

    /// Timeline lookup or rewrite failed
    #[error("history operation failed: {message}")]
    HistoryOperationFailed { message: String },
}

fn format_values(values: &[Value]) -> String {
    let rendered: Vec<String> = values.iter().map(Value::to_string).collect();
    format!("[{}]", rendered.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SourceLocation;

    #[test]
    fn test_messages_name_the_culprits() {
        let err = SimError::WriteConflict {
            coord: Coord::new(2, 0),
            existing: Value::from(1),
            incoming: Value::from(2),
        };
        assert_eq!(err.to_string(), "conflicting writes to (2, 0): 1 and 2");

        let err = SimError::MultipleSubmissions {
            values: vec![Value::from(3), Value::from(4)],
        };
        assert_eq!(err.to_string(), "more than one result submitted: [3, 4]");

        let err = SimError::EdgeOfBoard {
            coord: Coord::new(i64::MAX, 0),
            direction: Offset::Right,
        };
        assert_eq!(
            err.to_string(),
            format!("operator at ({}, 0) writes past the edge of the board (Right)", i64::MAX)
        );
    }

    #[test]
    fn test_parse_errors_pass_through() {
        let parse = ParseError {
            message: "bad".to_string(),
            location: SourceLocation::new(1, 2),
        };
        let err = SimError::from(parse.clone());
        assert_eq!(err.to_string(), parse.to_string());
    }
}
