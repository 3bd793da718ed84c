use chrono::Local;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::app_state::AppState;
use crate::state::captured::CapturedRequest;
use crate::state::focus::Focus;
use super::highlight::method_color;
use super::layout::{ACCENT_BLUE, SURFACE, TEXT_MUTED, pane_block};

const STAR: Color = Color::Rgb(224, 175, 104);

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let source = state
        .capture_path
        .as_deref()
        .and_then(|p| p.file_name())
        .map(|n| format!(" · {}", n.to_string_lossy()))
        .unwrap_or_default();
    let title = format!(
        " Requests{} ({}/{}) ",
        source,
        state.visibility.visible.len(),
        state.log.len()
    );
    let block = pane_block(state, Focus::RequestList, title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.visibility.visible.is_empty() {
        let hint = if state.log.is_empty() {
            "  No requests captured yet"
        } else {
            "  No requests match the filter"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(hint, Style::default().fg(TEXT_MUTED))),
            inner,
        );
        return;
    }

    let height = inner.height as usize;
    if height == 0 {
        return;
    }
    let offset = state.list_cursor.saturating_sub(height - 1);
    let focused = state.focus == Focus::RequestList;

    for (row, &idx) in state.visibility.visible.iter().skip(offset).take(height).enumerate() {
        let Some(request) = state.log.get(idx) else {
            continue;
        };
        let under_cursor = offset + row == state.list_cursor;
        let row_bg = if under_cursor && focused { SURFACE } else { Color::Reset };
        let row_rect = Rect {
            x: inner.x,
            y: inner.y + row as u16,
            width: inner.width,
            height: 1,
        };
        let line = row_line(request, state.selected == Some(idx), under_cursor);
        frame.render_widget(
            Paragraph::new(line).style(Style::default().bg(row_bg)),
            row_rect,
        );
    }
}

fn row_line(request: &CapturedRequest, selected: bool, under_cursor: bool) -> Line<'static> {
    let marker = if selected { "▍" } else { " " };
    let star = if request.starred { "★ " } else { "  " };
    let time = request.captured_at.with_timezone(&Local).format("%H:%M:%S");
    let path_style = if under_cursor {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(marker, Style::default().fg(ACCENT_BLUE)),
        Span::styled(star, Style::default().fg(STAR)),
        Span::styled(
            format!("{:<7}", request.method),
            Style::default()
                .fg(method_color(&request.method))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{} ", time), Style::default().fg(TEXT_MUTED)),
        Span::styled(request.display_path(), path_style),
    ])
}
