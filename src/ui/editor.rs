use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::Style,
    text::Span,
    widgets::Paragraph,
};

use crate::state::app_state::AppState;
use crate::state::focus::Focus;
use crate::state::mode::Mode;
use super::highlight::highlight_http;
use super::layout::{TEXT_MUTED, pane_block};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let editor = &state.editor;
    let history = &state.history;
    let scheme = if editor.use_https { "https" } else { "http" };
    let title = if history.is_empty() {
        format!(" Request · {} ", scheme)
    } else {
        format!(
            " Request · {} · {}{}/{}{} ",
            scheme,
            if history.can_go_back() { "◀ " } else { "" },
            history.current_index() + 1,
            history.len(),
            if history.can_go_forward() { " ▶" } else { "" },
        )
    };
    let block = pane_block(state, Focus::Editor, title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if editor.text.is_empty() && state.mode == Mode::Normal {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "  Select a request with Enter, or press i to write one",
                Style::default().fg(TEXT_MUTED),
            )),
            inner,
        );
        return;
    }

    let (row, col) = editor.cursor_row_col();
    let scroll = scroll_for(row, inner.height);
    frame.render_widget(
        Paragraph::new(highlight_http(&editor.text)).scroll((scroll, 0)),
        inner,
    );

    if state.focus == Focus::Editor && state.mode == Mode::Insert {
        let y = row
            .checked_sub(usize::from(scroll))
            .and_then(|dy| u16::try_from(dy).ok())
            .map(|dy| inner.y.saturating_add(dy));
        let x = u16::try_from(col).ok().map(|dx| inner.x.saturating_add(dx));
        if let (Some(x), Some(y)) = (x, y) {
            if y < inner.bottom() && x < inner.right() {
                frame.set_cursor_position(Position { x, y });
            }
        }
    }
}

/// First visible line so that line `row` is inside a viewport of `height`.
/// Saturates at `u16::MAX`, the furthest a `Paragraph` can scroll.
fn scroll_for(row: usize, height: u16) -> u16 {
    let height = usize::from(height);
    if height == 0 || row < height {
        return 0;
    }
    u16::try_from(row - height + 1).unwrap_or(u16::MAX)
}
