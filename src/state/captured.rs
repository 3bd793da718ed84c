use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A request observed in the browser's traffic, already split into parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedRequest {
    pub method: String,
    pub url: String,
    pub http_version: String,
    pub headers: Vec<Header>,
    pub body: Option<String>,
    pub captured_at: DateTime<Utc>,
    #[serde(default)]
    pub starred: bool,
}

#[cfg(test)]
impl CapturedRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            http_version: String::from("HTTP/1.1"),
            headers: Vec::new(),
            body: None,
            captured_at: Utc::now(),
            starred: false,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(name, value));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl CapturedRequest {
    /// Path plus query for list display; the raw URL when it does not parse.
    pub fn display_path(&self) -> String {
        match Url::parse(&self.url) {
            Ok(url) => match url.query() {
                Some(q) => format!("{}?{}", url.path(), q),
                None => url.path().to_string(),
            },
            Err(_) => self.url.clone(),
        }
    }

    pub fn is_https(&self) -> bool {
        Url::parse(&self.url)
            .map(|u| u.scheme() == "https")
            .unwrap_or(false)
    }

    /// Body text, treating an empty body the same as no body.
    pub fn body_text(&self) -> Option<&str> {
        self.body.as_deref().filter(|b| !b.is_empty())
    }
}
