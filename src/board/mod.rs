//! Board model for the grid language
//!
//! This module provides the core board abstractions:
//! - [`value`]: Cell values (arbitrary-precision integers and operator symbols)
//! - [`coord`]: Coordinates and the four neighbor offsets
//! - [`grid`]: Sparse grid snapshot for a single time index
//!
//! # Coordinate System
//!
//! Column `x` grows to the right and row `y` grows downward, matching the
//! order tokens appear in the program text:
//! ```text
//!        x=0 x=1 x=2
//! y=0     .   4   .
//! y=1     3   +   .
//! y=2     .   .   .
//! ```

pub mod coord;
pub mod grid;
pub mod value;

pub use coord::{Coord, Offset};
pub use grid::{BoundingBox, Grid};
pub use value::{OpCode, TokenError, Value};
