//! Board pane rendering
//!
//! Draws one grid snapshot inside a fixed viewport. The viewport is the union
//! bounding box of the whole run, so cells keep their screen position while
//! stepping through frames. Cells that differ from the previous frame are
//! highlighted.

use crate::board::{BoundingBox, Coord, Grid, OpCode, Value};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Scroll state for the board pane
#[derive(Debug, Default)]
pub struct BoardScrollState {
    pub row_offset: usize,
    pub col_offset: usize,
}

/// Data needed to render the board pane
pub struct BoardRenderData<'a> {
    pub grid: &'a Grid,
    pub previous: Option<&'a Grid>,
    pub viewport: Option<BoundingBox>,
    pub time: usize,
}

fn value_style(value: &Value) -> Style {
    let color = match value {
        Value::Int(_) => DEFAULT_THEME.number,
        Value::Op(op) => match op {
            OpCode::MoveLeft | OpCode::MoveRight | OpCode::MoveUp | OpCode::MoveDown => {
                DEFAULT_THEME.mover
            }
            OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div | OpCode::Rem => {
                DEFAULT_THEME.arithmetic
            }
            OpCode::Equal | OpCode::NotEqual => DEFAULT_THEME.comparison,
            OpCode::Warp => DEFAULT_THEME.warp,
            OpCode::Submit => DEFAULT_THEME.submit,
            OpCode::ParamA | OpCode::ParamB => DEFAULT_THEME.error,
        },
    };
    Style::default().fg(color)
}

/// Render the board pane
pub fn render_board_pane(
    frame: &mut Frame,
    area: Rect,
    data: BoardRenderData,
    is_focused: bool,
    scroll_state: &mut BoardScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" Board @ t={} ", data.time))
        .borders(Borders::ALL)
        .border_style(border_style);

    let Some(viewport) = data.viewport.or_else(|| data.grid.bounding_box()) else {
        let paragraph = Paragraph::new("(empty board)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let changed = data.previous.map(|prev| data.grid.changed_since(prev));

    let cell_width = data
        .grid
        .iter()
        .map(|(_, value)| value.to_string().len())
        .max()
        .unwrap_or(1);

    let rows = viewport.height() as usize;
    let cols = viewport.width() as usize;
    let visible_rows = area.height.saturating_sub(2).max(1) as usize;
    let visible_cols = (area.width.saturating_sub(2) as usize / (cell_width + 1)).max(1);

    // Clamp scroll offsets to the content
    scroll_state.row_offset = scroll_state.row_offset.min(rows.saturating_sub(visible_rows));
    scroll_state.col_offset = scroll_state.col_offset.min(cols.saturating_sub(visible_cols));

    let lines: Vec<Line> = (viewport.min_y..=viewport.max_y)
        .skip(scroll_state.row_offset)
        .take(visible_rows)
        .map(|y| {
            let spans: Vec<Span> = (viewport.min_x..=viewport.max_x)
                .skip(scroll_state.col_offset)
                .take(visible_cols)
                .map(|x| {
                    let coord = Coord::new(x, y);
                    let (text, mut style) = match data.grid.get(coord) {
                        Some(value) => (value.to_string(), value_style(value)),
                        None => (".".to_string(), Style::default().fg(DEFAULT_THEME.comment)),
                    };
                    if changed.as_ref().is_some_and(|c| c.contains(&coord)) {
                        style = style
                            .bg(DEFAULT_THEME.changed_cell_bg)
                            .add_modifier(Modifier::BOLD);
                    }
                    Span::styled(format!("{:>width$} ", text, width = cell_width), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
