//! Protected path matching.
//!
//! # Responsibilities
//! - Compile configured prefixes into segment lists at startup
//! - Decide whether a request path lies under any protected prefix
//!
//! # Design Decisions
//! - Segment-aware: `/admin` covers `/admin/x` but not `/adminpanel`
//! - Query string and fragment are ignored
//! - Segments are percent-decoded once, the way the upstream reads them;
//!   a decoded `/` or `\` splits the segment
//! - Empty, `.` and `..` segments are normalized before comparing
//! - Case-sensitive, like the upstream router
//! - No regex, O(segments) per prefix

use percent_encoding::percent_decode_str;

/// A single protected prefix, split into path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMatcher {
    prefix: String,
    segments: Vec<String>,
}

impl PrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let segments = normalized_segments(&prefix);
        Self { prefix, segments }
    }

    /// The prefix as configured.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// True if `path` equals the prefix or lies below it.
    pub fn matches(&self, path: &str) -> bool {
        let path_segments = normalized_segments(strip_query(path));
        self.matches_segments(&path_segments)
    }

    fn matches_segments(&self, path_segments: &[String]) -> bool {
        path_segments.len() >= self.segments.len()
            && self
                .segments
                .iter()
                .zip(path_segments)
                .all(|(expected, actual)| expected == actual)
    }
}

/// The set of protected prefixes. Immutable after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectedPrefixes {
    matchers: Vec<PrefixMatcher>,
}

impl ProtectedPrefixes {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            matchers: prefixes.into_iter().map(PrefixMatcher::new).collect(),
        }
    }

    /// Returns true if the path lies under any protected prefix.
    pub fn matches(&self, path: &str) -> bool {
        self.first_match(path).is_some()
    }

    /// Returns the first prefix covering `path`, if any.
    pub fn first_match(&self, path: &str) -> Option<&PrefixMatcher> {
        let path_segments = normalized_segments(strip_query(path));
        self.matchers
            .iter()
            .find(|m| m.matches_segments(&path_segments))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PrefixMatcher> {
        self.matchers.iter()
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

/// Drop everything from the first `?` or `#` on.
fn strip_query(path: &str) -> &str {
    match path.find(['?', '#']) {
        Some(idx) => &path[..idx],
        None => path,
    }
}

/// Split on `/`, percent-decode, skip empty and `.` segments, resolve `..`.
fn normalized_segments(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    for raw in path.split('/') {
        let decoded = percent_decode_str(raw).decode_utf8_lossy();
        for segment in decoded.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other.to_string()),
            }
        }
    }
    segments
}
