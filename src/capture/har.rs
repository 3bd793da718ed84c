use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::captured::{CapturedRequest, Header};

#[derive(Debug, Deserialize)]
struct Har {
    log: HarLog,
}

#[derive(Debug, Deserialize)]
struct HarLog {
    #[serde(default)]
    entries: Vec<HarEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HarEntry {
    started_date_time: Option<String>,
    request: HarRequest,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HarRequest {
    method: String,
    url: String,
    #[serde(default)]
    http_version: String,
    #[serde(default)]
    headers: Vec<HarHeader>,
    post_data: Option<HarPostData>,
}

#[derive(Debug, Deserialize)]
struct HarHeader {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct HarPostData {
    text: Option<String>,
}

impl From<HarEntry> for CapturedRequest {
    fn from(entry: HarEntry) -> Self {
        let captured_at = entry
            .started_date_time
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);
        let req = entry.request;
        CapturedRequest {
            method: req.method,
            url: req.url,
            http_version: normalize_version(&req.http_version),
            headers: req
                .headers
                .into_iter()
                .map(|h| Header::new(h.name, h.value))
                .collect(),
            body: req.post_data.and_then(|p| p.text),
            captured_at,
            starred: false,
        }
    }
}

/// Browsers write `h2`, `http/2.0` or `HTTP/1.1`; keep the textual form
/// consistent for the request line.
fn normalize_version(version: &str) -> String {
    match version.trim().to_ascii_lowercase().as_str() {
        "" => String::from("HTTP/1.1"),
        "h2" | "http/2" | "http/2.0" => String::from("HTTP/2"),
        "h3" | "http/3" | "http/3.0" => String::from("HTTP/3"),
        _ => version.trim().to_ascii_uppercase(),
    }
}

/// Every entry of a HAR document, in file order, before admission.
pub fn parse_har(content: &str) -> Result<Vec<CapturedRequest>, AppError> {
    let har: Har = serde_json::from_str(content)?;
    Ok(har.log.entries.into_iter().map(CapturedRequest::from).collect())
}

pub fn load_har(path: &Path) -> Result<Vec<CapturedRequest>, AppError> {
    let content = std::fs::read_to_string(path)?;
    parse_har(&content)
}
