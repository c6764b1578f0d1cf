//! Main TUI application state and logic

use crate::board::BoundingBox;
use crate::interpreter::{Outcome, SimError};
use crate::snapshot::{Trace, TraceFrame};
use crate::ui::panes::{
    BoardRenderData, BoardScrollState, StatusRenderData, TimelineRenderData,
    TimelineScrollState, render_board_pane, render_status_bar, render_timeline_pane,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Board,
    Timeline,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Board => FocusedPane::Timeline,
            FocusedPane::Timeline => FocusedPane::Board,
        }
    }
}

/// How the simulation that produced the trace ended
#[derive(Debug, Clone)]
pub enum RunStatus {
    Finished(Outcome),
    Failed(SimError),
}

impl RunStatus {
    fn describe(&self) -> String {
        match self {
            RunStatus::Finished(Outcome::Submitted(value)) => format!("Result: {}", value),
            RunStatus::Finished(Outcome::StepBudgetExceeded) => {
                "Step budget exhausted, no result".to_string()
            }
            RunStatus::Failed(err) => format!("Error: {}", err),
        }
    }
}

/// The main application state
pub struct App {
    /// Every frame visited by the simulation
    pub trace: Trace,

    /// Fixed board viewport covering the whole run
    pub viewport: Option<BoundingBox>,

    pub run_status: RunStatus,

    /// Index of the displayed frame
    pub position: usize,

    pub focused_pane: FocusedPane,

    pub board_scroll: BoardScrollState,
    pub timeline_scroll: TimelineScrollState,

    pub should_quit: bool,

    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a frame was advanced in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    pub fn new(trace: Trace, viewport: Option<BoundingBox>, run_status: RunStatus) -> Self {
        let status_message = run_status.describe();
        App {
            trace,
            viewport,
            run_status,
            position: 0,
            focused_pane: FocusedPane::Board,
            board_scroll: BoardScrollState::default(),
            timeline_scroll: TimelineScrollState::default(),
            should_quit: false,
            status_message,
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_millis(500) {
                if !self.step_forward() {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Poll with a timeout so auto-play keeps ticking
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn current_frame(&self) -> Option<&TraceFrame> {
        self.trace.get(self.position)
    }

    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(main_chunks[0]);

        if let Some(current) = self.trace.get(self.position) {
            let previous = self
                .position
                .checked_sub(1)
                .and_then(|i| self.trace.get(i))
                .map(|f| &f.grid);

            render_board_pane(
                frame,
                columns[0],
                BoardRenderData {
                    grid: &current.grid,
                    previous,
                    viewport: self.viewport,
                    time: current.time,
                },
                self.focused_pane == FocusedPane::Board,
                &mut self.board_scroll,
            );
        }

        render_timeline_pane(
            frame,
            columns[1],
            TimelineRenderData {
                frames: self.trace.frames(),
                selected: self.position,
            },
            self.focused_pane == FocusedPane::Timeline,
            &mut self.timeline_scroll,
        );

        render_status_bar(
            frame,
            main_chunks[1],
            StatusRenderData {
                message: &self.status_message,
                frame_index: self.position,
                total_frames: self.trace.len(),
                time: self.current_frame().map_or(0, |f| f.time),
                is_error: matches!(self.run_status, RunStatus::Failed(_)),
                is_playing: self.is_playing,
            },
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left => {
                self.is_playing = false;
                if self.step_backward() {
                    self.status_message = "Stepped backward".to_string();
                } else {
                    self.status_message = "Already at the first frame".to_string();
                }
            }
            KeyCode::Right => {
                self.is_playing = false;
                if self.step_forward() {
                    self.status_message = "Stepped forward".to_string();
                } else {
                    self.status_message = self.run_status.describe();
                }
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Board => {
                    self.board_scroll.row_offset = self.board_scroll.row_offset.saturating_sub(1);
                }
                FocusedPane::Timeline => {
                    self.is_playing = false;
                    self.step_backward();
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Board => {
                    self.board_scroll.row_offset = self.board_scroll.row_offset.saturating_add(1);
                }
                FocusedPane::Timeline => {
                    self.is_playing = false;
                    self.step_forward();
                }
            },
            KeyCode::Char('h') => {
                self.board_scroll.col_offset = self.board_scroll.col_offset.saturating_sub(1);
            }
            KeyCode::Char('l') => {
                // clamped to the board width on the next render
                self.board_scroll.col_offset = self.board_scroll.col_offset.saturating_add(1);
            }
            KeyCode::Char(' ') => {
                // 200ms debounce against key repeat
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    self.status_message = if self.is_playing {
                        "Playing...".to_string()
                    } else {
                        "Paused".to_string()
                    };
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.position = self.trace.len().saturating_sub(1);
                self.status_message = self.run_status.describe();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.position = 0;
                self.status_message = "Jumped to start".to_string();
            }
            _ => {}
        }
    }

    fn step_forward(&mut self) -> bool {
        if self.position + 1 < self.trace.len() {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn step_backward(&mut self) -> bool {
        if self.position > 0 {
            self.position -= 1;
            true
        } else {
            false
        }
    }
}
