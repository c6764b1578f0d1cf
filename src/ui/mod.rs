//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, auto-play
//! - **[`panes`]**: stateless render functions for each visible pane (board,
//!   timeline, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a finished run's
//! [`Trace`] and call [`App::run`] to start the event loop.
//!
//! [`Trace`]: crate::snapshot::Trace
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::{App, RunStatus};
