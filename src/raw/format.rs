use url::Url;

use crate::state::captured::CapturedRequest;
use crate::state::response_state::CapturedResponse;

const DEFAULT_VERSION: &str = "HTTP/1.1";

/// Render a captured request as editable raw HTTP/1.1 text.
///
/// A `Host` line is synthesised from the URL when the capture has none
/// (HTTP/2 captures only carry `:authority`). Never fails: an unparsable URL
/// is used verbatim as the request target.
pub fn format_request(req: &CapturedRequest) -> String {
    let parsed = match Url::parse(&req.url) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::debug!(url = %req.url, error = %e, "URL did not parse, using it verbatim");
            None
        }
    };

    let target = match &parsed {
        Some(url) => match url.query() {
            Some(q) => format!("{}?{}", url.path(), q),
            None => url.path().to_string(),
        },
        None => req.url.clone(),
    };
    let version = if req.http_version.trim().is_empty() {
        DEFAULT_VERSION
    } else {
        req.http_version.as_str()
    };

    let mut lines = vec![format!("{} {} {}", req.method, target, version)];

    let has_host = req.headers.iter().any(|h| h.name.eq_ignore_ascii_case("host"));
    if !has_host {
        if let Some(authority) = parsed.as_ref().and_then(authority_of) {
            lines.push(format!("Host: {}", authority));
        }
    }

    lines.extend(req.headers.iter().map(|h| format!("{}: {}", h.name, h.value)));

    let mut out = lines.join("\n");
    if let Some(body) = req.body_text() {
        out.push_str("\n\n");
        out.push_str(&pretty_body(body));
    }
    out
}

/// Render a response as raw HTTP/1.1 text.
pub fn format_response(resp: &CapturedResponse) -> String {
    let status_line = if resp.status_text.is_empty() {
        format!("HTTP/1.1 {}", resp.status)
    } else {
        format!("HTTP/1.1 {} {}", resp.status, resp.status_text)
    };

    let mut lines = vec![status_line];
    lines.extend(resp.headers.iter().map(|h| format!("{}: {}", h.name, h.value)));

    let mut out = lines.join("\n");
    out.push_str("\n\n");
    out.push_str(&pretty_body(&resp.body));
    out
}

/// Re-indent JSON bodies with two spaces, keeping key order. Anything that
/// is not JSON comes back untouched.
pub fn pretty_body(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(pretty) => pretty,
            Err(_) => body.to_string(),
        },
        Err(_) => body.to_string(),
    }
}

fn authority_of(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}
