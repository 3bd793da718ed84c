use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders},
};

use crate::state::app_state::AppState;
use crate::state::focus::Focus;
use super::{editor, filter_bar, request_list, response, status_bar};

// TokyoNight palette
pub const ACCENT_BLUE: Color = Color::Rgb(122, 162, 247);  // #7aa2f7
pub const BORDER_INACTIVE: Color = Color::Rgb(65, 72, 104); // #414868
pub const TEXT_MUTED: Color = Color::Rgb(86, 95, 137);     // #565f89
pub const SURFACE: Color = Color::Rgb(36, 40, 59);         // #24283b

pub const SPINNER_FRAMES: &[char] = &['⣾', '⣽', '⣻', '⢿', '⡿', '⣟', '⣯', '⣷'];

/// Bordered block whose border lights up when `pane` has focus.
pub fn pane_block(state: &AppState, pane: Focus, title: String) -> Block<'static> {
    let border_color = if state.focus == pane { ACCENT_BLUE } else { BORDER_INACTIVE };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // Split off status bar at bottom
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let main_area = vertical[0];
    let status_area = vertical[1];

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Min(0)])
        .split(main_area);

    // Left: filter box above the request list
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(horiz[0]);
    filter_bar::render(frame, left[0], state);
    request_list::render(frame, left[1], state);

    // Right: editor, response meta line, response viewer
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(horiz[1]);
    editor::render(frame, right[0], state);
    response::render_meta(frame, right[1], state);
    response::viewer::render(frame, right[2], state);

    status_bar::render(frame, status_area, state);
}
