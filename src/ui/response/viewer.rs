use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::Paragraph,
};

use crate::state::app_state::AppState;
use crate::state::focus::Focus;
use crate::state::response_state::SendPhase;
use super::super::highlight::highlight_http;
use super::super::layout::{SPINNER_FRAMES, TEXT_MUTED, pane_block};

const ERROR: Color = Color::Rgb(247, 118, 142);

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = pane_block(state, Focus::Response, " Response ".to_string());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = match &state.send {
        SendPhase::Idle => Text::from(Line::from(Span::styled(
            "  Ctrl+R sends the request in the editor",
            Style::default().fg(TEXT_MUTED),
        ))),
        SendPhase::Parsing => Text::from(Line::from(Span::styled(
            "  Parsing…",
            Style::default().fg(TEXT_MUTED),
        ))),
        SendPhase::Sending { spinner_tick, .. } => {
            let idx = (*spinner_tick as usize) % SPINNER_FRAMES.len();
            Text::from(Line::from(vec![
                Span::styled(
                    format!("  {} ", SPINNER_FRAMES[idx]),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled("Sending…  (Esc to cancel)", Style::default().fg(TEXT_MUTED)),
            ]))
        }
        SendPhase::Succeeded(success) => {
            let mut text = highlight_http(&success.raw);
            if !success.dropped_headers.is_empty() {
                text.lines.push(Line::default());
                text.lines.push(Line::from(Span::styled(
                    format!("-- not sent: {}", success.dropped_headers.join(", ")),
                    Style::default().fg(TEXT_MUTED),
                )));
            }
            text
        }
        SendPhase::Failed(failure) => Text::from(
            failure
                .report()
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(ERROR))))
                .collect::<Vec<_>>(),
        ),
    };

    frame.render_widget(Paragraph::new(text).scroll((state.response_scroll, 0)), inner);
}
