//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`board`]: The grid snapshot of the selected frame, with changed cells highlighted
//! - [`timeline`]: Every visited frame with its time index and warp markers
//! - [`status`]: Status bar with keybindings and run state
//!
//! Each pane module exports a primary `render_*` function taking a
//! `*RenderData` bundle, plus a scroll state type where the pane scrolls.

pub mod board;
pub mod status;
pub mod timeline;

pub use board::{BoardRenderData, BoardScrollState, render_board_pane};
pub use status::{StatusRenderData, render_status_bar};
pub use timeline::{TimelineRenderData, TimelineScrollState, render_timeline_pane};
