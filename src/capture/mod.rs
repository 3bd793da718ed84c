//! Captured traffic: admission rules and the append-only request log.

pub mod har;
pub mod watch;

use crate::state::captured::CapturedRequest;

/// Static assets nobody wants to replay.
pub const STATIC_EXTENSIONS: &[&str] = &[
    ".js", ".css", ".map",
    ".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".ico",
    ".woff", ".woff2", ".ttf", ".eot", ".otf",
    ".mp4", ".webm", ".mp3", ".wav",
    ".pdf", ".zip", ".tar", ".gz",
];

pub fn is_static_asset(url: &str) -> bool {
    let url = url.to_lowercase();
    STATIC_EXTENSIONS
        .iter()
        .any(|ext| url.ends_with(ext) || url.contains(&format!("{}?", ext)))
}

/// Whether a captured URL belongs in the request list.
pub fn admits(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    (lower.starts_with("http://") || lower.starts_with("https://")) && !is_static_asset(url)
}

/// Captured requests in arrival order. Entries are never removed, so an
/// index stays a valid identity for the whole session.
#[derive(Debug, Clone, Default)]
pub struct RequestLog {
    requests: Vec<CapturedRequest>,
    /// Source records consumed so far, admitted or not.
    consumed: usize,
}

impl RequestLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the admissible records; returns how many were added.
    pub fn ingest(&mut self, records: impl IntoIterator<Item = CapturedRequest>) -> usize {
        let before = self.requests.len();
        for record in records {
            self.consumed += 1;
            if admits(&record.url) {
                self.requests.push(record);
            } else {
                tracing::debug!(url = %record.url, "skipping capture");
            }
        }
        self.requests.len() - before
    }

    /// Ingest only the records past those already consumed. Used when a
    /// capture file is re-read after growing.
    pub fn ingest_tail(&mut self, records: Vec<CapturedRequest>) -> usize {
        if records.len() < self.consumed {
            tracing::warn!(
                seen = self.consumed,
                now = records.len(),
                "capture source shrank, ignoring until it grows past what was seen"
            );
            return 0;
        }
        let skip = self.consumed;
        self.ingest(records.into_iter().skip(skip))
    }

    pub fn toggle_star(&mut self, index: usize) -> Option<bool> {
        let req = self.requests.get_mut(index)?;
        req.starred = !req.starred;
        Some(req.starred)
    }

    pub fn get(&self, index: usize) -> Option<&CapturedRequest> {
        self.requests.get(index)
    }

    pub fn as_slice(&self) -> &[CapturedRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
