// Snapshot history for time-travelling execution

use crate::board::{BoundingBox, Grid, Value};

/// Ordered grid snapshots indexed by time, starting at 1, plus the submitted result.
///
/// Indices stay contiguous: the only way to shorten the history is
/// [`Timeline::rewrite`], which truncates to a past time and replaces it.
#[derive(Debug, Clone)]
pub struct Timeline {
    snapshots: Vec<Grid>,
    result: Option<Value>,
}

impl Timeline {
    /// Seed a timeline with the snapshot for time 1
    pub fn new(initial: Grid) -> Self {
        Timeline {
            snapshots: vec![initial],
            result: None,
        }
    }

    /// Time index of the latest snapshot
    pub fn current_time(&self) -> usize {
        self.snapshots.len()
    }

    pub fn current(&self) -> &Grid {
        // never empty: seeded in `new`, and `rewrite` keeps at least one entry
        &self.snapshots[self.snapshots.len() - 1]
    }

    /// Get the snapshot at a 1-based time index
    pub fn get(&self, time: usize) -> Option<&Grid> {
        time.checked_sub(1).and_then(|index| self.snapshots.get(index))
    }

    /// Number of snapshots, equal to the current time index
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// A timeline always holds the seed snapshot
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Append the snapshot for the next time index, returning that index
    pub fn push(&mut self, grid: Grid) -> usize {
        self.snapshots.push(grid);
        self.snapshots.len()
    }

    /// Discard everything after `time` and replace the snapshot at `time`
    pub fn rewrite(&mut self, time: usize, grid: Grid) -> Result<(), String> {
        if time == 0 || time > self.snapshots.len() {
            return Err(format!(
                "Cannot rewrite time {}: history covers 1..={}",
                time,
                self.snapshots.len()
            ));
        }

        self.snapshots.truncate(time);
        self.snapshots[time - 1] = grid;
        Ok(())
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Record the result. Fails with the already-recorded value if one exists.
    pub fn submit(&mut self, value: Value) -> Result<(), Value> {
        match &self.result {
            Some(existing) => Err(existing.clone()),
            None => {
                self.result = Some(value);
                Ok(())
            }
        }
    }

    /// Iterate `(time, grid)` pairs from time 1
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Grid)> {
        self.snapshots.iter().enumerate().map(|(i, g)| (i + 1, g))
    }
}

/// How a trace frame was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Initial,
    Advanced,
    Warped { from: usize },
}

/// One visited state of the simulation
#[derive(Debug, Clone)]
pub struct TraceFrame {
    pub step: usize,
    pub time: usize,
    pub grid: Grid,
    pub transition: Transition,
    pub result: Option<Value>,
}

/// Append-only record of every state the simulation passed through,
/// including the branches later erased from the [`Timeline`] by warps
#[derive(Debug, Clone, Default)]
pub struct Trace {
    frames: Vec<TraceFrame>,
}

impl Trace {
    pub fn new() -> Self {
        Trace { frames: Vec::new() }
    }

    pub fn push(&mut self, frame: TraceFrame) {
        self.frames.push(frame);
    }

    pub fn get(&self, index: usize) -> Option<&TraceFrame> {
        self.frames.get(index)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[TraceFrame] {
        &self.frames
    }

    pub fn warp_count(&self) -> usize {
        self.frames
            .iter()
            .filter(|f| matches!(f.transition, Transition::Warped { .. }))
            .count()
    }
}

/// Space and time consumed by a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpaceUsed {
    pub bounds: Option<BoundingBox>,
    pub ticks: usize,
}

impl SpaceUsed {
    /// Fold a visited grid and its time index into the running totals
    pub fn record(&mut self, grid: &Grid, time: usize) {
        self.ticks = self.ticks.max(time);
        if let Some(bbox) = grid.bounding_box() {
            self.bounds = Some(match self.bounds {
                Some(existing) => existing.union(bbox),
                None => bbox,
            });
        }
    }

    pub fn width(&self) -> u64 {
        self.bounds.map_or(0, |b| b.width())
    }

    pub fn height(&self) -> u64 {
        self.bounds.map_or(0, |b| b.height())
    }

    /// width × height × ticks
    pub fn volume(&self) -> u64 {
        self.width()
            .saturating_mul(self.height())
            .saturating_mul(self.ticks as u64)
    }
}
