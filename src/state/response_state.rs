use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, TransportErrorKind};
use super::captured::Header;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CapturedResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<Header>,
    pub body: String,
}

/// Display class of a response status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    ClientError,
    ServerError,
    Neutral,
}

impl StatusClass {
    pub fn of(status: u16) -> Self {
        match status {
            200..=299 => StatusClass::Success,
            400..=499 => StatusClass::ClientError,
            500..=599 => StatusClass::ServerError,
            _ => StatusClass::Neutral,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SendSuccess {
    pub response: CapturedResponse,
    /// `response` rendered as raw HTTP text.
    pub raw: String,
    pub class: StatusClass,
    pub elapsed: Duration,
    pub size_bytes: usize,
    /// Names the user wrote that the transport would not accept.
    pub dropped_headers: Vec<String>,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Parse(ParseError),
    Transport(TransportErrorKind),
}

#[derive(Debug, Clone)]
pub struct SendFailure {
    pub reason: FailureReason,
    pub message: String,
    pub likely_causes: &'static [&'static str],
    /// Always zero; a failed send has no meaningful round trip.
    pub elapsed: Duration,
}

impl SendFailure {
    /// Failure text as shown in the response pane.
    pub fn report(&self) -> String {
        let mut out = format!("Error: {}\n\n", self.message);
        if !self.likely_causes.is_empty() {
            out.push_str("Possible causes:\n");
            for cause in self.likely_causes {
                out.push_str("- ");
                out.push_str(cause);
                out.push('\n');
            }
            out.push('\n');
        }
        let kind = match &self.reason {
            FailureReason::Parse(ParseError::MalformedRequestLine(_)) => "MalformedRequestLine".to_string(),
            FailureReason::Parse(ParseError::MissingHostHeader) => "MissingHostHeader".to_string(),
            FailureReason::Transport(kind) => kind.to_string(),
        };
        out.push_str(&format!("Type: {}\n", kind));
        out
    }
}

#[derive(Debug, Clone, Default)]
pub enum SendPhase {
    #[default]
    Idle,
    Parsing,
    Sending { generation: u64, spinner_tick: u8 },
    Succeeded(SendSuccess),
    Failed(SendFailure),
}

impl SendPhase {
    pub fn is_sending(&self) -> bool {
        matches!(self, SendPhase::Sending { .. })
    }
}
