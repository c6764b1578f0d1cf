//! Sparse grid snapshot
//!
//! A [`Grid`] maps occupied coordinates to their [`Value`]; absence means the
//! cell is empty. Grids are treated as immutable once a step has produced them:
//! the engine reads the pre-step grid and builds the next one from a copy, so
//! the crate-visible mutators below are only used while a grid is under
//! construction.

use super::coord::Coord;
use super::value::{OpCode, Value};
use num_bigint::BigInt;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;

/// Boards with a larger bounding box are printed as a cell list instead
const MAX_RENDERED_AREA: u64 = 1 << 16;

/// Axis-aligned extent of a set of coordinates (inclusive bounds)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i64,
    pub max_x: i64,
    pub min_y: i64,
    pub max_y: i64,
}

impl BoundingBox {
    pub fn around(coord: Coord) -> Self {
        BoundingBox {
            min_x: coord.x,
            max_x: coord.x,
            min_y: coord.y,
            max_y: coord.y,
        }
    }

    pub fn include(&mut self, coord: Coord) {
        self.min_x = self.min_x.min(coord.x);
        self.max_x = self.max_x.max(coord.x);
        self.min_y = self.min_y.min(coord.y);
        self.max_y = self.max_y.max(coord.y);
    }

    pub fn union(self, other: BoundingBox) -> Self {
        BoundingBox {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Saturates at `u64::MAX` when the box spans the whole `i64` range
    pub fn width(&self) -> u64 {
        self.max_x.abs_diff(self.min_x).saturating_add(1)
    }

    pub fn height(&self) -> u64 {
        self.max_y.abs_diff(self.min_y).saturating_add(1)
    }

    /// Number of cells inside the box, saturating
    pub fn area(&self) -> u64 {
        self.width().saturating_mul(self.height())
    }
}

/// The board at a single time index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    cells: FxHashMap<Coord, Value>,
}

impl Grid {
    pub fn new() -> Self {
        Grid {
            cells: FxHashMap::default(),
        }
    }

    pub fn get(&self, coord: Coord) -> Option<&Value> {
        self.cells.get(&coord)
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate occupied cells in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Value)> {
        self.cells.iter().map(|(coord, value)| (*coord, value))
    }

    /// Occupied cells in row-major order
    pub fn sorted_cells(&self) -> Vec<(Coord, &Value)> {
        let mut cells: Vec<_> = self.iter().collect();
        cells.sort_by_key(|(coord, _)| *coord);
        cells
    }

    /// Cells holding an operator, in row-major order
    pub fn operators(&self) -> Vec<(Coord, OpCode)> {
        self.sorted_cells()
            .into_iter()
            .filter_map(|(coord, value)| value.as_op().map(|op| (coord, op)))
            .collect()
    }

    pub(crate) fn insert(&mut self, coord: Coord, value: Value) {
        self.cells.insert(coord, value);
    }

    pub(crate) fn remove(&mut self, coord: Coord) {
        self.cells.remove(&coord);
    }

    /// Replace every occurrence of a placeholder symbol with an integer.
    ///
    /// Returns the number of cells rewritten.
    pub fn substitute(&mut self, placeholder: OpCode, value: &BigInt) -> usize {
        let mut replaced = 0;
        for cell in self.cells.values_mut() {
            if cell.is_op(placeholder) {
                *cell = Value::Int(value.clone());
                replaced += 1;
            }
        }
        replaced
    }

    /// Substitute both input parameters, consuming the grid
    pub fn with_parameters(mut self, a: &BigInt, b: &BigInt) -> Self {
        self.substitute(OpCode::ParamA, a);
        self.substitute(OpCode::ParamB, b);
        self
    }

    /// First placeholder left on the board, if any (row-major)
    pub fn find_placeholder(&self) -> Option<(Coord, OpCode)> {
        self.operators()
            .into_iter()
            .find(|(_, op)| op.is_placeholder())
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut coords = self.cells.keys();
        let mut bbox = BoundingBox::around(*coords.next()?);
        for coord in coords {
            bbox.include(*coord);
        }
        Some(bbox)
    }

    /// Coordinates whose contents differ between `self` and `previous`
    pub fn changed_since(&self, previous: &Grid) -> FxHashSet<Coord> {
        let mut changed: FxHashSet<Coord> = self
            .iter()
            .filter(|(coord, value)| previous.get(*coord) != Some(*value))
            .map(|(coord, _)| coord)
            .collect();
        changed.extend(previous.cells.keys().filter(|c| !self.contains(**c)));
        changed
    }
}

impl FromIterator<(Coord, Value)> for Grid {
    fn from_iter<I: IntoIterator<Item = (Coord, Value)>>(iter: I) -> Self {
        Grid {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Bounding-box rendering, one row per line, tokens right-aligned to a common width.
///
/// Sparse boards spread too far to draw are listed as `(x, y) value` lines
/// in row-major order.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(bbox) = self.bounding_box() else {
            return Ok(());
        };

        if bbox.area() > MAX_RENDERED_AREA {
            for (coord, value) in self.sorted_cells() {
                writeln!(f, "{} {}", coord, value)?;
            }
            return Ok(());
        }

        let width = self
            .cells
            .values()
            .map(|value| value.to_string().len())
            .max()
            .unwrap_or(1);

        for y in bbox.min_y..=bbox.max_y {
            let row: Vec<String> = (bbox.min_x..=bbox.max_x)
                .map(|x| match self.get(Coord::new(x, y)) {
                    Some(value) => format!("{:>width$}", value.to_string()),
                    None => format!("{:>width$}", "."),
                })
                .collect();
            writeln!(f, "{}", row.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(cells: &[((i64, i64), Value)]) -> Grid {
        cells
            .iter()
            .map(|((x, y), v)| (Coord::new(*x, *y), v.clone()))
            .collect()
    }

    #[test]
    fn test_substitution_replaces_all_placeholders() {
        let g = grid(&[
            ((0, 0), Value::Op(OpCode::ParamA)),
            ((1, 0), Value::Op(OpCode::ParamB)),
            ((2, 0), Value::Op(OpCode::ParamA)),
            ((3, 0), Value::Op(OpCode::Add)),
        ]);
        let g = g.with_parameters(&BigInt::from(10), &BigInt::from(-4));

        assert_eq!(g.get(Coord::new(0, 0)), Some(&Value::from(10)));
        assert_eq!(g.get(Coord::new(1, 0)), Some(&Value::from(-4)));
        assert_eq!(g.get(Coord::new(2, 0)), Some(&Value::from(10)));
        assert_eq!(g.get(Coord::new(3, 0)), Some(&Value::Op(OpCode::Add)));
        assert!(g.find_placeholder().is_none());
    }

    #[test]
    fn test_bounding_box() {
        let g = grid(&[((-2, 1), Value::from(1)), ((3, -1), Value::from(2))]);
        let bbox = g.bounding_box().unwrap();
        assert_eq!((bbox.min_x, bbox.max_x), (-2, 3));
        assert_eq!((bbox.min_y, bbox.max_y), (-1, 1));
        assert_eq!(bbox.width(), 6);
        assert_eq!(bbox.height(), 3);
        assert!(Grid::new().bounding_box().is_none());
    }

    #[test]
    fn test_bounding_box_spanning_all_of_i64() {
        let g = grid(&[
            ((i64::MIN, 0), Value::from(1)),
            ((i64::MAX, 0), Value::from(2)),
        ]);
        let bbox = g.bounding_box().unwrap();
        assert_eq!(bbox.width(), u64::MAX);
        assert_eq!(bbox.height(), 1);
        assert_eq!(bbox.area(), u64::MAX);
    }

    #[test]
    fn test_display_pads_to_widest_token() {
        let g = grid(&[
            ((0, 0), Value::from(10)),
            ((1, 0), Value::Op(OpCode::Add)),
            ((1, 1), Value::from(3)),
        ]);
        assert_eq!(g.to_string(), "10  +\n .  3\n");
        assert_eq!(Grid::new().to_string(), "");
    }

    #[test]
    fn test_display_lists_far_apart_cells() {
        let g = grid(&[
            ((i64::MAX, 1), Value::Op(OpCode::MoveLeft)),
            ((-1, 0), Value::from(7)),
        ]);
        assert_eq!(
            g.to_string(),
            format!("(-1, 0) 7\n({}, 1) <\n", i64::MAX)
        );
    }

    #[test]
    fn test_changed_since() {
        let before = grid(&[((0, 0), Value::from(1)), ((1, 0), Value::from(2))]);
        let after = grid(&[((1, 0), Value::from(3)), ((2, 0), Value::from(4))]);
        let changed = after.changed_since(&before);
        assert_eq!(changed.len(), 3);
        assert!(changed.contains(&Coord::new(0, 0)));
        assert!(changed.contains(&Coord::new(1, 0)));
        assert!(changed.contains(&Coord::new(2, 0)));
        assert!(after.changed_since(&after).is_empty());
    }
}
