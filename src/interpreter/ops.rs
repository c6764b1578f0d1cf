//! Operator semantics
//!
//! Every operator reads its neighbors from the pre-step [`Grid`] and stages
//! effects into the [`StepTransaction`]; nothing an operator stages is visible
//! to any other operator in the same step.
//!
//! # Neighbor Roles
//!
//! ```text
//!  mover `>`:   a > b      moves a to b
//!  arithmetic:  . y .      x op y is written to both r and d
//!               x + r
//!               . d .
//!  warp:        . v .      writes v at (origin - (dx, dy)) in time t - dt
//!              dx @ dy
//!               . dt .
//! ```

use super::errors::SimError;
use super::transaction::StepTransaction;
use crate::board::{Coord, Grid, Offset, OpCode, Value};
use num_bigint::{BigInt, Sign};

/// An operator cell together with the snapshot it reads from
struct Site<'a> {
    grid: &'a Grid,
    origin: Coord,
}

impl<'a> Site<'a> {
    /// Address of a neighbor about to change; fails past the edge of the coordinate space
    fn at(&self, offset: Offset) -> Result<Coord, SimError> {
        self.origin.offset(offset).ok_or(SimError::EdgeOfBoard {
            coord: self.origin,
            direction: offset,
        })
    }

    /// Neighbors past the edge of the coordinate space read as empty
    fn read(&self, offset: Offset) -> Option<&'a Value> {
        self.origin
            .offset(offset)
            .and_then(|coord| self.grid.get(coord))
    }

    fn read_int(&self, offset: Offset) -> Option<&'a BigInt> {
        self.read(offset).and_then(Value::as_int)
    }
}

/// Evaluate one operator against `grid`, the snapshot `tx` was opened on
pub fn execute(
    grid: &Grid,
    origin: Coord,
    op: OpCode,
    tx: &mut StepTransaction,
) -> Result<(), SimError> {
    let site = Site { grid, origin };

    match op {
        OpCode::MoveLeft => move_value(&site, Offset::Left, tx),
        OpCode::MoveRight => move_value(&site, Offset::Right, tx),
        OpCode::MoveUp => move_value(&site, Offset::Up, tx),
        OpCode::MoveDown => move_value(&site, Offset::Down, tx),
        OpCode::Add
        | OpCode::Sub
        | OpCode::Mul
        | OpCode::Div
        | OpCode::Rem => arithmetic(&site, op, tx),
        OpCode::Equal => compare(&site, true, tx),
        OpCode::NotEqual => compare(&site, false, tx),
        OpCode::Warp => warp(&site, tx),
        // resolved by the engine once all writes are staged
        OpCode::Submit => Ok(()),
        OpCode::ParamA | OpCode::ParamB => Err(SimError::PlaceholderLeak {
            symbol: op,
            coord: origin,
        }),
    }
}

fn move_value(site: &Site, direction: Offset, tx: &mut StepTransaction) -> Result<(), SimError> {
    let from = direction.opposite();
    match site.read(from) {
        Some(value) => {
            tx.remove(site.at(from)?);
            tx.write(site.at(direction)?, value.clone())
        }
        None => Ok(()),
    }
}

fn arithmetic(site: &Site, op: OpCode, tx: &mut StepTransaction) -> Result<(), SimError> {
    let (Some(x), Some(y)) = (site.read_int(Offset::Left), site.read_int(Offset::Up)) else {
        return Ok(());
    };

    let is_division = matches!(op, OpCode::Div | OpCode::Rem);
    if is_division && y.sign() == Sign::NoSign {
        return Err(SimError::DivisionByZero { coord: site.origin });
    }

    // BigInt division and remainder truncate toward zero
    let result = match op {
        OpCode::Add => x + y,
        OpCode::Sub => x - y,
        OpCode::Mul => x * y,
        OpCode::Div => x / y,
        OpCode::Rem => x % y,
        _ => unreachable!("not an arithmetic operator: {}", op),
    };

    tx.remove(site.at(Offset::Left)?);
    tx.remove(site.at(Offset::Up)?);
    let result = Value::Int(result);
    tx.write(site.at(Offset::Right)?, result.clone())?;
    tx.write(site.at(Offset::Down)?, result)
}

fn compare(site: &Site, fire_when_equal: bool, tx: &mut StepTransaction) -> Result<(), SimError> {
    let (Some(x), Some(y)) = (site.read(Offset::Left), site.read(Offset::Up)) else {
        return Ok(());
    };

    if (x == y) != fire_when_equal {
        return Ok(());
    }

    tx.remove(site.at(Offset::Left)?);
    tx.remove(site.at(Offset::Up)?);
    tx.write(site.at(Offset::Right)?, y.clone())?;
    tx.write(site.at(Offset::Down)?, x.clone())
}

fn warp(site: &Site, tx: &mut StepTransaction) -> Result<(), SimError> {
    let time = tx.source_time();
    let (Some(value), Some(dx), Some(dy), Some(dt)) = (
        site.read(Offset::Up),
        site.read_int(Offset::Left),
        site.read_int(Offset::Right),
        site.read_int(Offset::Down),
    ) else {
        return Ok(());
    };

    let invalid = |reason: String| SimError::InvalidWarp {
        coord: site.origin,
        reason,
    };

    let dx = i64::try_from(dx).map_err(|_| invalid(format!("dx {} out of range", dx)))?;
    let dy = i64::try_from(dy).map_err(|_| invalid(format!("dy {} out of range", dy)))?;
    let dt = usize::try_from(dt).map_err(|_| invalid(format!("dt {} out of range", dt)))?;

    if dt == 0 {
        return Err(invalid("dt must be positive".to_string()));
    }
    if dt >= time {
        return Err(invalid(format!(
            "cannot travel {} steps back from time {}",
            dt, time
        )));
    }

    let target = dx
        .checked_neg()
        .zip(dy.checked_neg())
        .and_then(|(nx, ny)| site.origin.checked_shift(nx, ny))
        .ok_or_else(|| invalid("target coordinate overflows".to_string()))?;

    tx.warp(time - dt, target, value.clone())
}
