// Simulation driver for the grid language

use crate::board::{Coord, Grid, OpCode, Value};
use crate::interpreter::errors::SimError;
use crate::interpreter::ops;
use crate::interpreter::transaction::StepTransaction;
use crate::snapshot::{SpaceUsed, Timeline, Trace, TraceFrame, Transition};
use num_bigint::BigInt;
use tracing::{debug, info, warn};

/// Run-level settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    /// Steps to execute before giving up on a submission
    pub max_steps: usize,
    /// Keep a copy of every visited grid for later inspection
    pub record_trace: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            max_steps: 1_000,
            record_trace: true,
        }
    }
}

/// How a run ended when no fatal error occurred
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Submitted(Value),
    StepBudgetExceeded,
}

/// What a single step did to the timeline
#[derive(Debug, Clone, PartialEq)]
pub struct StepSummary {
    pub time: usize,
    pub warped_from: Option<usize>,
    pub submitted: Option<Value>,
}

/// Everything a finished run hands back to its caller
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: Outcome,
    pub timeline: Timeline,
    pub trace: Trace,
    pub space: SpaceUsed,
    pub steps: usize,
}

/// A fully evaluated step, not yet committed
enum Resolution {
    Advance(Grid),
    Warp { time: usize, grid: Grid },
}

/// The simulation driver
pub struct Simulator {
    timeline: Timeline,
    trace: Trace,
    space: SpaceUsed,
    config: SimConfig,
    steps: usize,
}

impl Simulator {
    /// Create a simulator over an already-substituted grid
    pub fn new(initial: Grid, config: SimConfig) -> Self {
        let mut space = SpaceUsed::default();
        space.record(&initial, 1);

        let mut trace = Trace::new();
        if config.record_trace {
            trace.push(TraceFrame {
                step: 0,
                time: 1,
                grid: initial.clone(),
                transition: Transition::Initial,
                result: None,
            });
        }

        Simulator {
            timeline: Timeline::new(initial),
            trace,
            space,
            config,
            steps: 0,
        }
    }

    /// Substitute the `A` and `B` placeholders, then create a simulator
    pub fn with_parameters(initial: Grid, a: &BigInt, b: &BigInt, config: SimConfig) -> Self {
        Self::new(initial.with_parameters(a, b), config)
    }

    /// Run until a result is submitted or the step budget runs out
    pub fn run(&mut self) -> Result<Outcome, SimError> {
        self.run_with(|_| {})
    }

    /// Like [`Simulator::run`], calling `on_state` with every state before it is stepped
    pub fn run_with<F: FnMut(&Simulator)>(&mut self, mut on_state: F) -> Result<Outcome, SimError> {
        loop {
            on_state(&*self);
            if let Some(result) = self.timeline.result() {
                return Ok(Outcome::Submitted(result.clone()));
            }
            if self.steps >= self.config.max_steps {
                warn!(
                    steps = self.steps,
                    time = self.timeline.current_time(),
                    "step budget exhausted without a result"
                );
                return Ok(Outcome::StepBudgetExceeded);
            }
            self.step()?;
        }
    }

    /// Execute exactly one step.
    ///
    /// The step is evaluated and validated in full before the timeline is
    /// touched; on error the timeline is left exactly as it was.
    pub fn step(&mut self) -> Result<StepSummary, SimError> {
        let time = self.timeline.current_time();
        let (resolution, submission) = self.evaluate(time)?;

        // Only the result can still be refused; the warp target was looked up in `evaluate`
        if let Some(value) = &submission {
            self.timeline
                .submit(value.clone())
                .map_err(|existing| SimError::MultipleSubmissions {
                    values: vec![existing, value.clone()],
                })?;
            info!(step = self.steps + 1, time, result = %value, "result submitted");
        }

        let (grid, transition) = match resolution {
            Resolution::Advance(grid) => {
                self.timeline.push(grid.clone());
                (grid, Transition::Advanced)
            }
            Resolution::Warp { time: target, grid } => {
                self.timeline
                    .rewrite(target, grid.clone())
                    .map_err(|message| SimError::HistoryOperationFailed { message })?;
                info!(step = self.steps + 1, from = time, to = target, "time warp");
                (grid, Transition::Warped { from: time })
            }
        };

        self.steps += 1;
        let new_time = self.timeline.current_time();
        self.space.record(&grid, new_time);

        if self.config.record_trace {
            self.trace.push(TraceFrame {
                step: self.steps,
                time: new_time,
                grid,
                transition,
                result: self.timeline.result().cloned(),
            });
        }

        Ok(StepSummary {
            time: new_time,
            warped_from: match transition {
                Transition::Warped { from } => Some(from),
                _ => None,
            },
            submitted: submission,
        })
    }

    /// Evaluate every operator against the current snapshot and resolve the
    /// staged effects into the next state, without committing anything
    fn evaluate(&self, time: usize) -> Result<(Resolution, Option<Value>), SimError> {
        let current = self.timeline.current();
        let operators = current.operators();

        let mut tx = StepTransaction::new(time);
        for (coord, op) in &operators {
            ops::execute(current, *coord, *op, &mut tx)?;
        }

        debug!(
            step = self.steps + 1,
            time,
            operators = operators.len(),
            writes = tx.write_count(),
            removals = tx.removal_count(),
            warp = ?tx.warp_request().map(|w| w.time),
            "step evaluated"
        );

        let submission = self.collect_submission(&operators, &tx)?;

        let resolution = match tx.warp_request() {
            Some(request) => {
                let past = self.timeline.get(request.time).ok_or_else(|| {
                    SimError::HistoryOperationFailed {
                        message: format!("no snapshot at time {}", request.time),
                    }
                })?;
                Resolution::Warp {
                    time: request.time,
                    grid: request.apply_to(past),
                }
            }
            None => Resolution::Advance(tx.apply_to(current)),
        };

        Ok((resolution, submission))
    }

    /// Values written this step into `S` cells that survived the step's removals
    fn collect_submission(
        &self,
        operators: &[(Coord, OpCode)],
        tx: &StepTransaction,
    ) -> Result<Option<Value>, SimError> {
        let mut candidates: Vec<Value> = Vec::new();
        for (coord, op) in operators {
            if *op != OpCode::Submit || tx.is_removed(*coord) {
                continue;
            }
            if let Some(value) = tx.written(*coord) {
                if !candidates.contains(value) {
                    candidates.push(value.clone());
                }
            }
        }

        if candidates.len() > 1 {
            return Err(SimError::MultipleSubmissions { values: candidates });
        }

        let candidate = candidates.pop();
        if let (Some(existing), Some(incoming)) = (self.timeline.result(), &candidate) {
            return Err(SimError::MultipleSubmissions {
                values: vec![existing.clone(), incoming.clone()],
            });
        }
        Ok(candidate)
    }

    // ========== Getter methods ==========

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn space_used(&self) -> SpaceUsed {
        self.space
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn current_time(&self) -> usize {
        self.timeline.current_time()
    }

    pub fn result(&self) -> Option<&Value> {
        self.timeline.result()
    }

    /// Finish the run and hand over the collected history
    pub fn into_report(self, outcome: Outcome) -> RunReport {
        RunReport {
            outcome,
            timeline: self.timeline,
            trace: self.trace,
            space: self.space,
            steps: self.steps,
        }
    }
}

/// Substitute parameters into `initial` and run it to completion
pub fn run(
    initial: Grid,
    a: &BigInt,
    b: &BigInt,
    max_steps: usize,
) -> Result<RunReport, SimError> {
    let config = SimConfig {
        max_steps,
        ..SimConfig::default()
    };
    let mut simulator = Simulator::with_parameters(initial, a, b, config);
    let outcome = simulator.run()?;
    Ok(simulator.into_report(outcome))
}
