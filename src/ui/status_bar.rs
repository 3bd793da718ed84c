use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::app_state::{AppState, NoticeKind};
use crate::state::focus::Focus;
use crate::state::mode::Mode;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let (mode_label, mode_color) = match state.mode {
        Mode::Normal => ("NORMAL", Color::Rgb(122, 162, 247)),   // blue
        Mode::Insert => ("INSERT", Color::Rgb(158, 206, 106)),   // green
    };

    let mode_span = Span::styled(
        format!(" {} ", mode_label),
        Style::default()
            .fg(Color::Black)
            .bg(mode_color)
            .add_modifier(Modifier::BOLD),
    );

    let tail = match &state.notice {
        Some(notice) => {
            let color = match notice.kind {
                NoticeKind::Info => Color::Rgb(158, 206, 106),
                NoticeKind::Error => Color::Rgb(247, 118, 142),
            };
            Span::styled(format!("  {}", notice.text), Style::default().fg(color))
        }
        None => Span::styled(hints(state), Style::default().fg(Color::Rgb(65, 72, 104))),
    };

    let line = Line::from(vec![mode_span, tail]);
    frame.render_widget(Paragraph::new(line), area);
}

fn hints(state: &AppState) -> &'static str {
    match (state.mode, state.focus) {
        (Mode::Insert, Focus::Filter) => "  · Enter/Esc:done · Ctrl+R:send",
        (Mode::Insert, _) => "  · Esc:done · Ctrl+R:send",
        (Mode::Normal, Focus::RequestList) => {
            "  · Enter:select · s:star · c:category · /:search · R:regex · Tab:focus · q:quit"
        }
        (Mode::Normal, _) => {
            "  · i:edit · Ctrl+R:send · [ ]:history · t:https · y:copy · Tab:focus · q:quit"
        }
    }
}
