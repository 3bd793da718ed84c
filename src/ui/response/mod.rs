pub mod viewer;

use chrono::Local;
use humansize::{DECIMAL, format_size};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::app_state::AppState;
use crate::state::response_state::{SendPhase, StatusClass};
use super::highlight::status_color;
use super::layout::{BORDER_INACTIVE, TEXT_MUTED};

/// One-line summary above the response: status, time and size.
pub fn render_meta(frame: &mut Frame, area: Rect, state: &AppState) {
    let line = match &state.send {
        SendPhase::Succeeded(success) => {
            let size_str = format_size(success.size_bytes as u64, DECIMAL);
            let mut spans = vec![
                Span::styled(
                    format!(" {} {}", success.response.status, success.response.status_text),
                    Style::default()
                        .fg(status_color(success.class))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(
                        "  ·  {}ms  ·  {}  ·  {}",
                        success.elapsed.as_millis(),
                        size_str,
                        success.received_at.with_timezone(&Local).format("%H:%M:%S"),
                    ),
                    Style::default().fg(TEXT_MUTED),
                ),
            ];
            if !success.dropped_headers.is_empty() {
                spans.push(Span::styled(
                    format!("  ·  {} header(s) not sent", success.dropped_headers.len()),
                    Style::default().fg(TEXT_MUTED),
                ));
            }
            Line::from(spans)
        }
        SendPhase::Failed(failure) => Line::from(Span::styled(
            format!(" Failed  ·  {}ms", failure.elapsed.as_millis()),
            Style::default()
                .fg(status_color(StatusClass::ServerError))
                .add_modifier(Modifier::BOLD),
        )),
        _ => Line::from(Span::styled("─", Style::default().fg(BORDER_INACTIVE))),
    };
    frame.render_widget(Paragraph::new(line), area);
}
