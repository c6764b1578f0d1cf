//! # Introduction
//!
//! warpgrid simulates a two-dimensional grid language in which values flow
//! between operator cells in discrete global steps, and the `@` operator can
//! write a value into the *past*, rewriting history from that point on. Every
//! visited state is recorded so a run can be browsed forward and backward
//! through a terminal UI built with [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! Text → Parser → Grid → substitute A/B → Simulator ⟲ (Timeline, Trace) → TUI
//! ```
//!
//! 1. [`parser`]: splits the layout into tokens and builds the initial grid.
//! 2. [`board`]: the value model: [`board::Value`], [`board::Coord`] and the
//!    sparse [`board::Grid`] snapshot.
//! 3. [`interpreter`]: evaluates all operators against a frozen snapshot,
//!    stages their effects in a [`interpreter::transaction::StepTransaction`],
//!    and resolves each step into a new or rewritten snapshot.
//! 4. [`snapshot`]: the [`snapshot::Timeline`] of snapshots indexed by time,
//!    and the append-only [`snapshot::Trace`] of everything visited.
//! 5. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Operators
//!
//! Movers `<` `>` `^` `v`, arithmetic `+` `-` `*` `/` `%`, comparisons `=` `#`,
//! time warp `@`, submit `S`, and the input placeholders `A` `B`.

pub mod board;
pub mod interpreter;
pub mod parser;
pub mod snapshot;
pub mod ui;
