use std::path::{Path, PathBuf};

use crossterm::event::{KeyEventKind, MouseEvent, MouseEventKind};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::actions::{Action, action_for};
use crate::capture::har::load_har;
use crate::clipboard::Clipboard;
use crate::error::{AppError, TransportError, TransportErrorKind};
use crate::event::{Event, SendResult};
use crate::history::{HistoryStack, Snapshot};
use crate::http::executor::execute;
use crate::http::send::{parse_failed, prepare, succeeded, transport_failed};
use crate::http::transport::Transport;
use crate::raw::format_request;
use crate::state::app_state::{AppState, Notice};
use crate::state::captured::CapturedRequest;
use crate::state::focus::Focus;
use crate::state::mode::Mode;
use crate::state::response_state::SendPhase;

pub struct App<T: Transport> {
    pub state: AppState,
    transport: T,
    clipboard: Clipboard,
    tx: UnboundedSender<Event>,
    cancel: Option<CancellationToken>,
    /// Bumped on every send and selection; responses tagged with an older
    /// value are stale.
    generation: u64,
    /// Header names the in-flight send left out.
    pending_dropped: Vec<String>,
}

impl<T: Transport> App<T> {
    pub fn new(
        transport: T,
        clipboard: Clipboard,
        tx: UnboundedSender<Event>,
        history_limit: usize,
    ) -> Self {
        Self {
            state: AppState {
                history: HistoryStack::new(history_limit),
                dirty: true,
                ..Default::default()
            },
            transport,
            clipboard,
            tx,
            cancel: None,
            generation: 0,
            pending_dropped: Vec::new(),
        }
    }

    /// Seed the request log from a capture loaded at startup.
    pub fn load_capture(&mut self, path: Option<PathBuf>, records: Vec<CapturedRequest>) {
        let added = self.state.log.ingest(records);
        tracing::info!(added, "capture loaded");
        self.state.capture_path = path;
        self.state.refilter();
        self.state.dirty = true;
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                self.state.dirty = true;
                if let Some(action) = action_for(key, self.state.mode, self.state.focus) {
                    self.dispatch(action);
                }
            }
            Event::Key(_) => {}
            Event::Response(result) => {
                self.state.dirty = true;
                self.handle_response(result);
            }
            // Tick: only dirty when the spinner or a notice is visible.
            Event::Tick => self.handle_tick(),
            Event::Mouse(mouse) => {
                self.state.dirty = true;
                self.handle_mouse(mouse);
            }
            Event::Resize => self.state.dirty = true,
            Event::CaptureChanged(path) => self.reload_capture(&path),
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.state.should_quit = true,
            Action::FocusNext => self.state.focus = self.state.focus.next(),
            Action::FocusPrev => self.state.focus = self.state.focus.prev(),
            Action::FocusPane(focus) => self.state.focus = focus,
            Action::MoveDown => self.move_vertical(1),
            Action::MoveUp => self.move_vertical(-1),
            Action::Select => self.select(),
            Action::ToggleStar => self.toggle_star(),
            Action::CycleCategory => {
                self.state.filter.category = self.state.filter.category.next();
                self.state.refilter();
            }
            Action::EditSearch => {
                self.state.focus = Focus::Filter;
                self.state.mode = Mode::Insert;
            }
            Action::ToggleRegex => {
                self.state.filter.regex_mode = !self.state.filter.regex_mode;
                self.state.refilter();
            }
            Action::EnterInsert => {
                if self.state.focus != Focus::Filter {
                    self.state.focus = Focus::Editor;
                }
                self.state.mode = Mode::Insert;
            }
            Action::LeaveInsert => {
                self.state.mode = Mode::Normal;
                if self.state.focus == Focus::Editor {
                    self.record_snapshot();
                }
            }
            Action::CancelSend => self.cancel_send(),
            Action::HistoryBack => self.history_step(false),
            Action::HistoryForward => self.history_step(true),
            Action::ToggleHttps => {
                self.state.editor.use_https = !self.state.editor.use_https;
                self.record_snapshot();
            }
            Action::Copy => self.copy_focused(),
            Action::Send => self.send(),
            edit => self.handle_edit(edit),
        }
    }

    fn handle_edit(&mut self, action: Action) {
        if self.state.focus == Focus::Filter {
            self.edit_search(action);
            return;
        }
        let editor = &mut self.state.editor;
        match action {
            Action::InsertChar(c) => editor.insert_char(c),
            Action::Newline => editor.insert_char('\n'),
            Action::Backspace => editor.backspace(),
            Action::Delete => editor.delete(),
            Action::CursorLeft => editor.move_left(),
            Action::CursorRight => editor.move_right(),
            Action::CursorUp => editor.move_up(),
            Action::CursorDown => editor.move_down(),
            Action::CursorHome => editor.move_home(),
            Action::CursorEnd => editor.move_end(),
            _ => {}
        }
    }

    /// The search box edits at its end only.
    fn edit_search(&mut self, action: Action) {
        let term = &mut self.state.filter.search_term;
        let changed = match action {
            Action::InsertChar(c) => {
                term.push(c);
                true
            }
            Action::Backspace => term.pop().is_some(),
            _ => false,
        };
        if changed {
            self.state.refilter();
        }
    }

    fn move_vertical(&mut self, delta: isize) {
        match self.state.focus {
            Focus::RequestList => self.state.move_list_cursor(delta),
            Focus::Editor if delta > 0 => self.state.editor.move_down(),
            Focus::Editor => self.state.editor.move_up(),
            Focus::Response => {
                self.state.response_scroll =
                    self.state.response_scroll.saturating_add_signed(delta as i16);
            }
            Focus::Filter => {}
        }
    }

    /// Load the request under the list cursor into the editor. History
    /// restarts from its freshly formatted text.
    fn select(&mut self) {
        let Some(idx) = self.state.cursor_request() else {
            return;
        };
        let Some(request) = self.state.log.get(idx) else {
            return;
        };
        let snapshot = Snapshot::new(format_request(request), request.is_https());
        tracing::debug!(idx, url = %request.url, "request selected");

        self.abandon_send();
        self.state.send = SendPhase::Idle;
        self.state.response_scroll = 0;
        self.state.editor.load(&snapshot);
        self.state.history.reset(snapshot);
        self.state.selected = Some(idx);
    }

    fn toggle_star(&mut self) {
        let Some(idx) = self.state.cursor_request() else {
            return;
        };
        if self.state.log.toggle_star(idx).is_some() {
            self.state.refilter();
        }
    }

    fn record_snapshot(&mut self) {
        let snapshot = self.state.editor.snapshot();
        if self.state.history.push(snapshot) {
            tracing::debug!(len = self.state.history.len(), "history snapshot recorded");
        }
    }

    fn history_step(&mut self, forward: bool) {
        // Unrecorded edits become the newest snapshot before moving.
        self.record_snapshot();
        let snapshot = if forward {
            self.state.history.forward()
        } else {
            self.state.history.back()
        };
        if let Some(snapshot) = snapshot.cloned() {
            self.state.editor.load(&snapshot);
        }
    }

    fn send(&mut self) {
        self.record_snapshot();
        self.abandon_send();
        self.state.response_scroll = 0;
        self.state.send = SendPhase::Parsing;

        let prepared = match prepare(&self.state.editor.text, self.state.editor.use_https) {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::debug!(error = %e, "request text did not parse");
                self.state.send = SendPhase::Failed(parse_failed(e));
                return;
            }
        };
        if !prepared.dropped_headers.is_empty() {
            tracing::debug!(dropped = ?prepared.dropped_headers, "headers not sent");
        }

        let token = CancellationToken::new();
        self.cancel = Some(token.clone());
        self.pending_dropped = prepared.dropped_headers;
        self.state.send = SendPhase::Sending {
            generation: self.generation,
            spinner_tick: 0,
        };

        let transport = self.transport.clone();
        let tx = self.tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            execute(transport, prepared.request, generation, tx, token).await;
        });
    }

    /// Cancel any in-flight send and make its eventual result stale.
    fn abandon_send(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
        self.generation += 1;
        self.pending_dropped.clear();
    }

    pub fn cancel_send(&mut self) {
        if self.state.send.is_sending() {
            tracing::info!(generation = self.generation, "send cancelled");
            self.abandon_send();
            self.state.send = SendPhase::Idle;
        }
    }

    fn handle_response(&mut self, SendResult { generation, result }: SendResult) {
        let awaited = matches!(
            self.state.send,
            SendPhase::Sending { generation: g, .. } if g == generation
        );
        if generation != self.generation || !awaited {
            tracing::debug!(generation, current = self.generation, "discarding stale response");
            return;
        }
        self.cancel = None;
        let dropped = std::mem::take(&mut self.pending_dropped);
        self.state.send = match result {
            Ok((response, elapsed)) => SendPhase::Succeeded(succeeded(response, elapsed, dropped)),
            Err(AppError::Cancelled) => SendPhase::Idle,
            Err(AppError::Transport(e)) => {
                tracing::warn!(kind = %e.kind, error = %e.message, "send failed");
                SendPhase::Failed(transport_failed(e))
            }
            Err(e) => {
                tracing::warn!(error = %e, "send failed");
                SendPhase::Failed(transport_failed(TransportError::new(
                    TransportErrorKind::Other,
                    e.to_string(),
                )))
            }
        };
    }

    fn reload_capture(&mut self, path: &Path) {
        let records = match load_har(path) {
            Ok(records) => records,
            Err(e) => {
                // Exporters often write in several steps; the next event
                // brings a complete file.
                tracing::debug!(error = %e, path = %path.display(), "capture not readable yet");
                return;
            }
        };
        let added = self.state.log.ingest_tail(records);
        if added > 0 {
            tracing::info!(added, total = self.state.log.len(), "new requests captured");
            self.state.refilter();
            self.state.dirty = true;
        }
    }

    /// Text of the focused pane: the response pane copies the response,
    /// every other pane copies the request being edited.
    fn focused_text(&self) -> Option<String> {
        let text = match self.state.focus {
            Focus::Response => match &self.state.send {
                SendPhase::Succeeded(success) => success.raw.clone(),
                SendPhase::Failed(failure) => failure.report(),
                _ => return None,
            },
            _ => self.state.editor.text.clone(),
        };
        (!text.is_empty()).then_some(text)
    }

    fn copy_focused(&mut self) {
        let Some(text) = self.focused_text() else {
            self.state.notice = Some(Notice::info("Nothing to copy"));
            return;
        };
        self.state.notice = Some(match self.clipboard.copy(&text) {
            Ok(sink) => {
                tracing::debug!(sink, bytes = text.len(), "copied to clipboard");
                Notice::info("Copied to clipboard")
            }
            Err(e) => {
                tracing::warn!(error = %e, "clipboard unavailable");
                Notice::error(format!("Copy failed: {}", e))
            }
        });
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => {
                self.state.response_scroll = self.state.response_scroll.saturating_add(3);
            }
            MouseEventKind::ScrollUp => {
                self.state.response_scroll = self.state.response_scroll.saturating_sub(3);
            }
            _ => {}
        }
    }

    fn handle_tick(&mut self) {
        if let SendPhase::Sending { spinner_tick, .. } = &mut self.state.send {
            *spinner_tick = spinner_tick.wrapping_add(1);
            self.state.dirty = true;
        }
        let expired = self
            .state
            .notice
            .as_ref()
            .is_some_and(|n| n.is_expired(std::time::Instant::now()));
        if expired {
            self.state.notice = None;
            self.state.dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use tokio::sync::mpsc::{self, UnboundedReceiver};

    use crate::clipboard::ClipboardSink;
    use crate::error::ParseError;
    use crate::http::transport::OutgoingRequest;
    use crate::state::app_state::NoticeKind;
    use crate::state::response_state::{CapturedResponse, FailureReason, StatusClass};

    /// Records every request and answers with a fixed response.
    #[derive(Clone, Default)]
    struct MockTransport {
        sent: Arc<Mutex<Vec<OutgoingRequest>>>,
        fail: Option<TransportErrorKind>,
    }

    impl Transport for MockTransport {
        fn send(
            &self,
            request: OutgoingRequest,
        ) -> impl std::future::Future<Output = Result<CapturedResponse, TransportError>> + Send
        {
            self.sent.lock().unwrap().push(request);
            let fail = self.fail;
            async move {
                match fail {
                    Some(kind) => Err(TransportError::new(kind, "boom")),
                    None => Ok(CapturedResponse {
                        status: 200,
                        status_text: "OK".into(),
                        headers: Vec::new(),
                        body: "{\"ok\":true}".into(),
                    }),
                }
            }
        }
    }

    struct Sink {
        fail: bool,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl ClipboardSink for Sink {
        fn name(&self) -> &'static str {
            "test"
        }

        fn copy(&mut self, text: &str) -> Result<(), AppError> {
            if self.fail {
                return Err(AppError::Clipboard("no display".into()));
            }
            self.seen.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct Harness {
        app: App<MockTransport>,
        rx: UnboundedReceiver<Event>,
        sent: Arc<Mutex<Vec<OutgoingRequest>>>,
        copied: Arc<Mutex<Vec<String>>>,
    }

    fn harness_with(transport: MockTransport, clipboard_works: bool) -> Harness {
        let (tx, rx) = mpsc::unbounded_channel();
        let copied = Arc::new(Mutex::new(Vec::new()));
        let clipboard = Clipboard::new(
            Box::new(Sink { fail: !clipboard_works, seen: copied.clone() }),
            Box::new(Sink { fail: !clipboard_works, seen: copied.clone() }),
        );
        let sent = transport.sent.clone();
        let mut app = App::new(transport, clipboard, tx, 10);
        app.load_capture(
            None,
            vec![
                CapturedRequest::new("GET", "https://api.test/users").with_header("Accept", "*/*"),
                CapturedRequest::new("GET", "https://cdn.test/app.js"),
                CapturedRequest::new("POST", "http://api.test/login")
                    .with_header("Cookie", "s=1")
                    .with_header("Content-Type", "application/json")
                    .with_body("{\"u\":\"a\"}"),
            ],
        );
        Harness { app, rx, sent, copied }
    }

    fn harness() -> Harness {
        harness_with(MockTransport::default(), true)
    }

    async fn deliver(h: &mut Harness) {
        let event = tokio::time::timeout(Duration::from_secs(1), h.rx.recv())
            .await
            .unwrap()
            .unwrap();
        h.app.handle_event(event);
    }

    #[test]
    fn test_static_assets_never_reach_the_list() {
        let h = harness();
        assert_eq!(h.app.state.log.len(), 2);
        assert_eq!(h.app.state.visibility.visible, vec![0, 1]);
    }

    #[test]
    fn test_select_formats_and_seeds_history() {
        let mut h = harness();
        h.app.dispatch(Action::MoveDown);
        h.app.dispatch(Action::Select);

        let state = &h.app.state;
        assert_eq!(state.selected, Some(1));
        assert!(!state.editor.use_https);
        assert!(state.editor.text.starts_with("POST /login HTTP/1.1\nHost: api.test\n"));
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_insert_edits_are_recorded_on_leave() {
        let mut h = harness();
        h.app.dispatch(Action::Select);
        h.app.dispatch(Action::EnterInsert);
        h.app.dispatch(Action::CursorEnd);
        h.app.dispatch(Action::InsertChar('X'));
        h.app.dispatch(Action::LeaveInsert);
        assert_eq!(h.app.state.history.len(), 2);

        h.app.dispatch(Action::HistoryBack);
        assert_eq!(h.app.state.editor.text.lines().next(), Some("GET /users HTTP/1.1"));
        h.app.dispatch(Action::HistoryForward);
        assert_eq!(h.app.state.editor.text.lines().next(), Some("GET /users HTTP/1.1X"));
    }

    #[test]
    fn test_toggle_https_is_undoable() {
        let mut h = harness();
        h.app.dispatch(Action::Select);
        assert!(h.app.state.editor.use_https);
        h.app.dispatch(Action::ToggleHttps);
        assert!(!h.app.state.editor.use_https);
        h.app.dispatch(Action::HistoryBack);
        assert!(h.app.state.editor.use_https);
    }

    #[test]
    fn test_search_box_filters_while_typing() {
        let mut h = harness();
        h.app.dispatch(Action::EditSearch);
        for c in "login".chars() {
            h.app.dispatch(Action::InsertChar(c));
        }
        assert_eq!(h.app.state.visibility.visible, vec![1]);
        h.app.dispatch(Action::LeaveInsert);
        assert_eq!(h.app.state.mode, Mode::Normal);

        h.app.dispatch(Action::ToggleRegex);
        h.app.state.filter.search_term = "[".into();
        h.app.state.refilter();
        assert!(h.app.state.visibility.regex_error);
        assert!(h.app.state.visibility.visible.is_empty());
    }

    #[test]
    fn test_star_and_category() {
        let mut h = harness();
        h.app.dispatch(Action::ToggleStar);
        h.app.dispatch(Action::CycleCategory);
        assert_eq!(h.app.state.visibility.visible, vec![0]);
        h.app.dispatch(Action::CycleCategory);
        assert_eq!(h.app.state.visibility.visible, vec![0]);
        h.app.dispatch(Action::CycleCategory);
        assert_eq!(h.app.state.visibility.visible, vec![1]);
    }

    #[tokio::test]
    async fn test_send_success_filters_headers() {
        let mut h = harness();
        h.app.dispatch(Action::MoveDown);
        h.app.dispatch(Action::Select);
        h.app.dispatch(Action::Send);
        assert!(h.app.state.send.is_sending());
        deliver(&mut h).await;

        let sent = h.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "http://api.test/login");
        assert!(sent[0].headers.iter().all(|hd| hd.name != "Cookie"));
        assert_eq!(sent[0].body.as_deref(), Some("{\n  \"u\": \"a\"\n}"));

        match &h.app.state.send {
            SendPhase::Succeeded(success) => {
                assert_eq!(success.class, StatusClass::Success);
                assert_eq!(success.dropped_headers, vec!["Cookie"]);
                assert!(success.raw.starts_with("HTTP/1.1 200 OK"));
            }
            other => panic!("unexpected phase {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_parse_failure_never_reaches_transport() {
        let mut h = harness();
        h.app.state.editor.text = "GET /only-a-path HTTP/1.1\nAccept: */*".into();
        h.app.dispatch(Action::Send);

        assert!(h.sent.lock().unwrap().is_empty());
        match &h.app.state.send {
            SendPhase::Failed(failure) => {
                assert_eq!(failure.reason, FailureReason::Parse(ParseError::MissingHostHeader));
                assert_eq!(failure.elapsed, Duration::ZERO);
            }
            other => panic!("unexpected phase {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_lists_causes() {
        let transport = MockTransport {
            fail: Some(TransportErrorKind::Connect),
            ..Default::default()
        };
        let mut h = harness_with(transport, true);
        h.app.dispatch(Action::Select);
        h.app.dispatch(Action::Send);
        deliver(&mut h).await;

        match &h.app.state.send {
            SendPhase::Failed(failure) => {
                assert_eq!(failure.reason, FailureReason::Transport(TransportErrorKind::Connect));
                assert!(!failure.likely_causes.is_empty());
            }
            other => panic!("unexpected phase {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let mut h = harness();
        h.app.dispatch(Action::Select);
        h.app.dispatch(Action::Send);
        let first = h.app.generation;
        h.app.dispatch(Action::Send);
        assert_ne!(first, h.app.generation);

        h.app.handle_event(Event::Response(SendResult {
            generation: first,
            result: Ok((CapturedResponse { status: 500, ..Default::default() }, Duration::ZERO)),
        }));
        assert!(h.app.state.send.is_sending());
    }

    #[tokio::test]
    async fn test_response_after_reselect_is_discarded() {
        let mut h = harness();
        h.app.dispatch(Action::Select);
        h.app.dispatch(Action::Send);
        let generation = h.app.generation;
        h.app.dispatch(Action::Select);

        h.app.handle_event(Event::Response(SendResult {
            generation,
            result: Ok((CapturedResponse { status: 200, ..Default::default() }, Duration::ZERO)),
        }));
        assert!(matches!(h.app.state.send, SendPhase::Idle));
    }

    #[test]
    fn test_resize_requests_redraw() {
        let mut h = harness();
        h.app.state.dirty = false;
        h.app.handle_event(Event::Resize);
        assert!(h.app.state.dirty);
    }

    #[tokio::test]
    async fn test_cancel_returns_to_idle() {
        let mut h = harness();
        h.app.dispatch(Action::Select);
        h.app.dispatch(Action::Send);
        h.app.dispatch(Action::CancelSend);
        assert!(matches!(h.app.state.send, SendPhase::Idle));

        // Whatever the cancelled task posts is ignored.
        deliver(&mut h).await;
        assert!(matches!(h.app.state.send, SendPhase::Idle));
    }

    #[test]
    fn test_copy_uses_clipboard_and_leaves_text() {
        let mut h = harness();
        h.app.dispatch(Action::Select);
        let before = h.app.state.editor.text.clone();
        h.app.dispatch(Action::Copy);

        assert_eq!(h.copied.lock().unwrap().as_slice(), &[before.clone()]);
        assert_eq!(h.app.state.editor.text, before);
        assert_eq!(h.app.state.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Info));
    }

    #[test]
    fn test_copy_failure_becomes_error_notice() {
        let mut h = harness_with(MockTransport::default(), false);
        h.app.dispatch(Action::Select);
        h.app.dispatch(Action::Copy);
        assert_eq!(h.app.state.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Error));
    }

    #[test]
    fn test_reload_capture_appends_new_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.har");
        fn har(urls: &[&str]) -> String {
            let entries: Vec<String> = urls
                .iter()
                .map(|url| {
                    format!(
                        r#"{{"request":{{"method":"GET","url":"{}","httpVersion":"HTTP/1.1","headers":[]}}}}"#,
                        url
                    )
                })
                .collect();
            format!(r#"{{"log":{{"entries":[{}]}}}}"#, entries.join(","))
        }

        let mut h = harness();
        h.app.state.log = Default::default();
        std::fs::write(&path, har(&["https://a.test/1"])).unwrap();
        h.app.handle_event(Event::CaptureChanged(path.clone()));
        assert_eq!(h.app.state.log.len(), 1);

        std::fs::write(&path, har(&["https://a.test/1", "https://a.test/2"])).unwrap();
        h.app.handle_event(Event::CaptureChanged(path.clone()));
        assert_eq!(h.app.state.log.len(), 2);
        assert_eq!(h.app.state.visibility.visible, vec![0, 1]);
    }
}
