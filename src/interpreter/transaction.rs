//! Staging area for a single simulation step
//!
//! Operators never mutate the board they read. Instead, each one stages its
//! effects into a [`StepTransaction`]:
//!
//! - **removals**: coordinates to clear in the next grid
//! - **writes**: at most one value per coordinate; a second, different value
//!   for the same coordinate is a [`SimError::WriteConflict`]
//! - **warp**: at most one [`WarpRequest`]; every warp staged in a step must
//!   target the same time index and agree on the value of each past cell
//!
//! Conflicts are detected while staging, before anything is committed, so a
//! failing step leaves the timeline untouched.

use super::errors::SimError;
use crate::board::{Coord, Grid, Value};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::hash_map::Entry;

/// A pending rewrite of a past snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct WarpRequest {
    pub time: usize,
    pub writes: FxHashMap<Coord, Value>,
}

impl WarpRequest {
    /// Apply the staged writes to a copy of the target snapshot
    pub fn apply_to(&self, past: &Grid) -> Grid {
        let mut warped = past.clone();
        for (coord, value) in &self.writes {
            warped.insert(*coord, value.clone());
        }
        warped
    }
}

/// Effects staged by all operators during one step
#[derive(Debug, Clone)]
pub struct StepTransaction {
    source_time: usize,
    removals: FxHashSet<Coord>,
    writes: FxHashMap<Coord, Value>,
    warp: Option<WarpRequest>,
}

impl StepTransaction {
    pub fn new(source_time: usize) -> Self {
        StepTransaction {
            source_time,
            removals: FxHashSet::default(),
            writes: FxHashMap::default(),
            warp: None,
        }
    }

    /// Time index of the snapshot this step reads from
    pub fn source_time(&self) -> usize {
        self.source_time
    }

    pub fn remove(&mut self, coord: Coord) {
        self.removals.insert(coord);
    }

    /// Stage a forward write. Writing the same value twice is idempotent.
    pub fn write(&mut self, coord: Coord, value: Value) -> Result<(), SimError> {
        match self.writes.entry(coord) {
            Entry::Occupied(existing) if *existing.get() != value => {
                Err(SimError::WriteConflict {
                    coord,
                    existing: existing.get().clone(),
                    incoming: value,
                })
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }

    /// Stage a write into the snapshot at `time`
    pub fn warp(&mut self, time: usize, coord: Coord, value: Value) -> Result<(), SimError> {
        let request = self.warp.get_or_insert_with(|| WarpRequest {
            time,
            writes: FxHashMap::default(),
        });

        if request.time != time {
            return Err(SimError::WarpTimeConflict {
                first: request.time,
                second: time,
            });
        }

        match request.writes.entry(coord) {
            Entry::Occupied(existing) if *existing.get() != value => {
                Err(SimError::WarpValueConflict {
                    coord,
                    time,
                    existing: existing.get().clone(),
                    incoming: value,
                })
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }

    pub fn is_removed(&self, coord: Coord) -> bool {
        self.removals.contains(&coord)
    }

    pub fn written(&self, coord: Coord) -> Option<&Value> {
        self.writes.get(&coord)
    }

    pub fn removal_count(&self) -> usize {
        self.removals.len()
    }

    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    pub fn warp_request(&self) -> Option<&WarpRequest> {
        self.warp.as_ref()
    }

    /// Build the next grid: copy, apply removals, then apply writes
    pub fn apply_to(&self, current: &Grid) -> Grid {
        let mut next = current.clone();
        for coord in &self.removals {
            next.remove(*coord);
        }
        for (coord, value) in &self.writes {
            next.insert(*coord, value.clone());
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::OpCode;

    #[test]
    fn test_identical_writes_are_idempotent() {
        let mut tx = StepTransaction::new(1);
        let target = Coord::new(2, 0);
        tx.write(target, Value::from(7)).unwrap();
        tx.write(target, Value::from(7)).unwrap();

        assert_eq!(tx.write_count(), 1);
        assert_eq!(tx.written(target), Some(&Value::from(7)));
    }

    #[test]
    fn test_different_writes_conflict() {
        let mut tx = StepTransaction::new(1);
        let target = Coord::new(2, 0);
        tx.write(target, Value::from(1)).unwrap();
        let err = tx.write(target, Value::from(2)).unwrap_err();

        assert_eq!(
            err,
            SimError::WriteConflict {
                coord: target,
                existing: Value::from(1),
                incoming: Value::from(2),
            }
        );
    }

    #[test]
    fn test_warps_must_agree_on_time() {
        let mut tx = StepTransaction::new(5);
        tx.warp(3, Coord::new(0, 0), Value::from(1)).unwrap();
        let err = tx.warp(2, Coord::new(1, 0), Value::from(1)).unwrap_err();

        assert_eq!(err, SimError::WarpTimeConflict { first: 3, second: 2 });
    }

    #[test]
    fn test_warps_must_agree_on_values() {
        let mut tx = StepTransaction::new(5);
        let target = Coord::new(4, 4);
        tx.warp(3, target, Value::from(9)).unwrap();
        tx.warp(3, target, Value::from(9)).unwrap();
        tx.warp(3, Coord::new(0, 0), Value::Op(OpCode::Add)).unwrap();

        let err = tx.warp(3, target, Value::from(8)).unwrap_err();
        assert!(matches!(
            err,
            SimError::WarpValueConflict { time: 3, coord, .. } if coord == target
        ));
        assert_eq!(tx.warp_request().unwrap().writes.len(), 2);
    }

    #[test]
    fn test_writes_win_over_removals() {
        let current: Grid = [
            (Coord::new(0, 0), Value::from(1)),
            (Coord::new(1, 0), Value::from(2)),
        ]
        .into_iter()
        .collect();

        let mut tx = StepTransaction::new(1);
        tx.remove(Coord::new(0, 0));
        tx.remove(Coord::new(1, 0));
        tx.write(Coord::new(1, 0), Value::from(5)).unwrap();

        let next = tx.apply_to(&current);
        assert_eq!(next.get(Coord::new(0, 0)), None);
        assert_eq!(next.get(Coord::new(1, 0)), Some(&Value::from(5)));
        // the source grid is untouched
        assert_eq!(current.get(Coord::new(0, 0)), Some(&Value::from(1)));
    }
}
