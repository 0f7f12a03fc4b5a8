// src/scanner/extract.rs
// =============================================================================
// Pulls endpoint-looking strings out of a response body.
//
// This is a heuristic, not a JavaScript or HTML parser. We look for:
//   a quote (" or '), then a path that starts with '/' and only uses
//   [a-zA-Z0-9_?%&=/-#.()], then the SAME quote character again.
//
// Examples that match:
//   "/api/v1/users?id=1"    '/static/app.js'    "/search#top"
//
// The regex crate has no backreferences, so "the same quote" is written as
// two alternatives, one per quote style.
// =============================================================================

use regex::Regex;

/// The endpoint pattern. Group 1 is the double-quoted path, group 2 the
/// single-quoted one.
pub const ENDPOINT_PATTERN: &str =
    r##"(?i)"(/[a-zA-Z0-9_?%&=/\-#.()]+)"|'(/[a-zA-Z0-9_?%&=/\-#.()]+)'"##;

#[derive(Debug, Clone)]
pub struct Extractor {
    pattern: Regex,
}

impl Extractor {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(ENDPOINT_PATTERN)?,
        })
    }

    /// Returns every matched path in the order it appears in `body`.
    ///
    /// Duplicates inside one body are kept; deduplication happens later
    /// across all bodies.
    pub fn extract(&self, body: &str) -> Vec<String> {
        self.pattern
            .captures_iter(body)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|path| path.as_str().to_string())
            .collect()
    }
}
