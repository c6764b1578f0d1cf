//! Timeline pane: every visited frame, newest at the bottom

use crate::snapshot::{TraceFrame, Transition};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding},
};

/// Scroll state for the timeline pane
#[derive(Debug, Default)]
pub struct TimelineScrollState {
    pub offset: usize,
}

/// Data needed to render the timeline pane
pub struct TimelineRenderData<'a> {
    pub frames: &'a [TraceFrame],
    pub selected: usize,
}

fn frame_line(frame: &TraceFrame) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format!("#{:<4}", frame.step),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!("t={:<4}", frame.time),
            Style::default().fg(DEFAULT_THEME.primary),
        ),
    ];

    match frame.transition {
        Transition::Initial => spans.push(Span::styled(
            "start",
            Style::default().fg(DEFAULT_THEME.success),
        )),
        Transition::Advanced => {}
        Transition::Warped { from } => spans.push(Span::styled(
            format!("warp {} → {}", from, frame.time),
            Style::default().fg(DEFAULT_THEME.warp),
        )),
    }

    if let Some(result) = &frame.result {
        spans.push(Span::styled(
            format!("  S={}", result),
            Style::default().fg(DEFAULT_THEME.submit),
        ));
    }

    Line::from(spans)
}

/// Render the timeline pane
pub fn render_timeline_pane(
    frame: &mut Frame,
    area: Rect,
    data: TimelineRenderData,
    is_focused: bool,
    scroll_state: &mut TimelineScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Timeline ")
        .borders(Borders::ALL)
        .border_style(border_style)
        .padding(Padding::new(1, 0, 0, 0));

    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Keep the selected frame in view
    if data.selected < scroll_state.offset {
        scroll_state.offset = data.selected;
    } else if data.selected >= scroll_state.offset + visible_height {
        scroll_state.offset = data.selected + 1 - visible_height;
    }

    let items: Vec<ListItem> = data
        .frames
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(i, f)| {
            let item = ListItem::new(frame_line(f));
            if i == data.selected {
                item.style(
                    Style::default()
                        .bg(DEFAULT_THEME.current_line_bg)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                item
            }
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
