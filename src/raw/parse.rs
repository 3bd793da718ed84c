use crate::error::ParseError;
use crate::state::captured::Header;

/// Methods that carry a body on the wire.
const BODY_METHODS: &[&str] = &["POST", "PUT", "PATCH"];

/// A request reconstructed from user-edited raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    pub method: String,
    pub path: String,
    pub version: Option<String>,
    /// Value of the `Host` header; never part of `headers`.
    pub host: String,
    pub headers: Vec<Header>,
    pub body: Option<String>,
}

impl ParsedRequest {
    pub fn url(&self, use_https: bool) -> String {
        let scheme = if use_https { "https" } else { "http" };
        format!("{}://{}{}", scheme, self.host, self.path)
    }

    /// The body to transmit: only for POST/PUT/PATCH, and only when non-empty.
    pub fn sendable_body(&self) -> Option<&str> {
        if !BODY_METHODS.contains(&self.method.as_str()) {
            return None;
        }
        self.body.as_deref().filter(|b| !b.is_empty())
    }

    fn insert_header(&mut self, name: &str, value: &str) {
        match self.headers.iter_mut().find(|h| h.name == name) {
            Some(existing) => existing.value = value.to_string(),
            None => self.headers.push(Header::new(name, value)),
        }
    }
}

/// Parse raw HTTP/1.1 request text.
///
/// Header lines that don't look like `Name: Value` and HTTP/2 pseudo-headers
/// are skipped rather than failing the whole parse. Only blank space before
/// the request line is dropped; the body keeps its trailing whitespace.
pub fn parse(text: &str) -> Result<ParsedRequest, ParseError> {
    let mut lines = text.trim_start().split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l));

    let request_line = lines.next().unwrap_or("").trim();
    let mut tokens = request_line.split_whitespace();
    let (Some(method), Some(path)) = (tokens.next(), tokens.next()) else {
        return Err(ParseError::MalformedRequestLine(request_line.to_string()));
    };
    let version: Vec<&str> = tokens.collect();

    let mut req = ParsedRequest {
        method: method.to_uppercase(),
        path: path.to_string(),
        version: if version.is_empty() { None } else { Some(version.join(" ")) },
        host: String::new(),
        headers: Vec::new(),
        body: None,
    };

    for line in lines.by_ref() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        if trimmed.starts_with(':') {
            tracing::trace!(line = trimmed, "skipping HTTP/2 pseudo-header");
            continue;
        }
        let Some(colon) = line.find(':').filter(|&i| i > 0) else {
            tracing::debug!(line, "skipping malformed header line");
            continue;
        };
        let name = line[..colon].trim();
        let value = line[colon + 1..].trim();
        if name.is_empty() || value.is_empty() {
            continue;
        }
        if name.eq_ignore_ascii_case("host") {
            req.host = value.to_string();
        } else {
            req.insert_header(name, value);
        }
    }

    let rest: Vec<&str> = lines.collect();
    if !rest.is_empty() {
        req.body = Some(rest.join("\n"));
    }

    if req.host.is_empty() {
        return Err(ParseError::MissingHostHeader);
    }
    Ok(req)
}
