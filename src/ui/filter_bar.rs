use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::filter::Category;
use crate::state::app_state::AppState;
use crate::state::focus::Focus;
use crate::state::mode::Mode;
use super::layout::{ACCENT_BLUE, TEXT_MUTED, pane_block};

const ERROR: Color = Color::Rgb(247, 118, 142);

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let filter = &state.filter;
    let title = match &filter.category {
        Category::All => " Filter ".to_string(),
        category => format!(" Filter · {} ", category),
    };
    let block = pane_block(state, Focus::Filter, title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (mode_label, mode_style) = if filter.regex_mode && state.visibility.regex_error {
        ("re! ", Style::default().fg(ERROR).add_modifier(Modifier::BOLD))
    } else if filter.regex_mode {
        ("re  ", Style::default().fg(ACCENT_BLUE))
    } else {
        ("/   ", Style::default().fg(TEXT_MUTED))
    };

    let editing = state.mode == Mode::Insert && state.focus == Focus::Filter;
    let term = if filter.search_term.is_empty() && !editing {
        Span::styled("search method, URL, headers, body", Style::default().fg(TEXT_MUTED))
    } else {
        Span::raw(filter.search_term.clone())
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![Span::styled(mode_label, mode_style), term])),
        inner,
    );

    if editing {
        let col = filter.search_term.chars().count() as u16 + mode_label.chars().count() as u16;
        frame.set_cursor_position(Position {
            x: (inner.x + col).min(inner.right().saturating_sub(1)),
            y: inner.y,
        });
    }
}
