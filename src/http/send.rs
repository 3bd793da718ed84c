use std::time::Duration;

use chrono::Utc;

use crate::error::{ParseError, TransportError, TransportErrorKind};
use crate::raw::{format_response, headers::admit, parse};
use crate::state::response_state::{
    CapturedResponse, FailureReason, SendFailure, SendSuccess, StatusClass,
};
use super::transport::OutgoingRequest;

const TRANSPORT_CAUSES: &[&str] = &[
    "Invalid Host header or URL",
    "Network connection issue",
    "TLS handshake failure (try toggling HTTPS)",
    "Server is unreachable",
];

const TIMEOUT_CAUSES: &[&str] = &[
    "Server is slow or unreachable",
    "Request timeout in config.toml is too short",
];

/// Parsed editor text turned into a wire request, plus what was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSend {
    pub request: OutgoingRequest,
    pub dropped_headers: Vec<String>,
}

/// Parsing step of a send: raw text to an admitted, sendable request.
pub fn prepare(raw_text: &str, use_https: bool) -> Result<PreparedSend, ParseError> {
    let parsed = parse(raw_text)?;
    let admitted = admit(&parsed.headers);
    Ok(PreparedSend {
        request: OutgoingRequest {
            method: parsed.method.clone(),
            url: parsed.url(use_https),
            headers: admitted.sent,
            body: parsed.sendable_body().map(str::to_string),
        },
        dropped_headers: admitted.dropped.into_iter().map(|h| h.name).collect(),
    })
}

pub fn succeeded(
    response: CapturedResponse,
    elapsed: Duration,
    dropped_headers: Vec<String>,
) -> SendSuccess {
    SendSuccess {
        raw: format_response(&response),
        class: StatusClass::of(response.status),
        size_bytes: response.body.len(),
        response,
        elapsed,
        dropped_headers,
        received_at: Utc::now(),
    }
}

pub fn parse_failed(err: ParseError) -> SendFailure {
    SendFailure {
        message: err.to_string(),
        reason: FailureReason::Parse(err),
        likely_causes: &[],
        elapsed: Duration::ZERO,
    }
}

pub fn transport_failed(err: TransportError) -> SendFailure {
    let likely_causes: &'static [&'static str] = match err.kind {
        TransportErrorKind::Timeout => TIMEOUT_CAUSES,
        TransportErrorKind::InvalidRequest => &[],
        _ => TRANSPORT_CAUSES,
    };
    SendFailure {
        reason: FailureReason::Transport(err.kind),
        message: err.message,
        likely_causes,
        elapsed: Duration::ZERO,
    }
}
