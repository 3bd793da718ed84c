use crate::state::captured::Header;

/// Names the transport refuses to let a caller set, or sets itself.
pub const FORBIDDEN_HEADERS: &[&str] = &[
    "accept-charset",
    "accept-encoding",
    "access-control-request-headers",
    "access-control-request-method",
    "connection",
    "content-length",
    "cookie",
    "cookie2",
    "date",
    "dnt",
    "expect",
    "host",
    "keep-alive",
    "origin",
    "referer",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "via",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdmittedHeaders {
    pub sent: Vec<Header>,
    pub dropped: Vec<Header>,
}

pub fn is_forbidden(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    FORBIDDEN_HEADERS.contains(&lower.as_str())
        || lower.starts_with("sec-")
        || lower.starts_with("proxy-")
}

/// `^[A-Za-z0-9_-]+$`
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Split parsed headers into those that will be sent and those that won't.
pub fn admit(headers: &[Header]) -> AdmittedHeaders {
    let mut admitted = AdmittedHeaders::default();
    for header in headers {
        if is_forbidden(&header.name) || !is_valid_name(&header.name) {
            tracing::debug!(name = %header.name, "header not sent");
            admitted.dropped.push(header.clone());
        } else {
            admitted.sent.push(header.clone());
        }
    }
    admitted
}
