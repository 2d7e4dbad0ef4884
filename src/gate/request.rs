//! Framework-free request shape seen by the gate.
//!
//! # Responsibilities
//! - Hold the path (with query string) and cookies of one inbound request
//! - Parse raw `Cookie` header values into a key/value map
//!
//! # Design Decisions
//! - Cookie parsing never fails: malformed pairs are skipped
//! - First occurrence of a cookie name wins
//! - Values are kept verbatim (no unquoting, no decoding)

use std::collections::HashMap;

/// Minimal view of an inbound HTTP request: its path and its cookies.
///
/// Immutable once built. Hosting adapters construct one per request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundRequest {
    path: String,
    cookies: HashMap<String, String>,
}

impl InboundRequest {
    /// Build from an already materialized cookie map.
    pub fn new(path: impl Into<String>, cookies: HashMap<String, String>) -> Self {
        Self {
            path: path.into(),
            cookies,
        }
    }

    /// Build from raw `Cookie` header values.
    pub fn from_cookie_headers<'a, I>(path: impl Into<String>, headers: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut cookies = HashMap::new();
        for header in headers {
            for (name, value) in parse_cookie_header(header) {
                cookies.entry(name.to_string()).or_insert_with(|| value.to_string());
            }
        }
        Self::new(path, cookies)
    }

    /// Path and query string as received.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// All cookies of the request.
    pub fn cookies(&self) -> &HashMap<String, String> {
        &self.cookies
    }

    /// Value of a single cookie.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }
}

/// Split one `Cookie` header value into `(name, value)` pairs.
///
/// Pairs without `=` or with an empty name are dropped.
pub fn parse_cookie_header(header: &str) -> impl Iterator<Item = (&str, &str)> {
    header.split(';').filter_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some((name, value.trim()))
    })
}
