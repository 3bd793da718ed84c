use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::capture::RequestLog;
use crate::filter::{FilterState, Visibility, compute_visibility};
use crate::history::HistoryStack;
use super::{editor::EditorState, focus::Focus, mode::Mode, response_state::SendPhase};

const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A transient message shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    pub expires_at: Instant,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self::with_kind(text, NoticeKind::Info)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::with_kind(text, NoticeKind::Error)
    }

    fn with_kind(text: impl Into<String>, kind: NoticeKind) -> Self {
        Self {
            text: text.into(),
            kind,
            expires_at: Instant::now() + NOTICE_TTL,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub mode: Mode,
    pub focus: Focus,
    pub log: RequestLog,
    pub filter: FilterState,
    pub visibility: Visibility,
    /// Cursor into `visibility.visible`, not into the log.
    pub list_cursor: usize,
    /// Log index of the request loaded into the editor.
    pub selected: Option<usize>,
    pub editor: EditorState,
    pub history: HistoryStack,
    pub send: SendPhase,
    pub response_scroll: u16,
    pub notice: Option<Notice>,
    pub capture_path: Option<PathBuf>,
    pub should_quit: bool,
    /// Set to `true` whenever visible state changes. The render loop skips
    /// `terminal.draw()` when `false`, avoiding redundant work on idle ticks.
    pub dirty: bool,
}

impl AppState {
    /// Recompute the visible set after the log or the filter changed,
    /// keeping the list cursor on the same request when it is still shown.
    pub fn refilter(&mut self) {
        let previous = self.cursor_request();
        self.visibility = compute_visibility(self.log.as_slice(), &self.filter);
        self.list_cursor = previous
            .and_then(|idx| self.visibility.visible.iter().position(|&v| v == idx))
            .unwrap_or_else(|| {
                self.list_cursor
                    .min(self.visibility.visible.len().saturating_sub(1))
            });
    }

    /// Log index under the list cursor.
    pub fn cursor_request(&self) -> Option<usize> {
        self.visibility.visible.get(self.list_cursor).copied()
    }

    pub fn move_list_cursor(&mut self, delta: isize) {
        let len = self.visibility.visible.len();
        if len == 0 {
            self.list_cursor = 0;
            return;
        }
        let next = self.list_cursor.saturating_add_signed(delta);
        self.list_cursor = next.min(len - 1);
    }
}
