//! Code fence info-string parsing.
//!
//! The info string carries the language plus comma-separated display
//! attributes:
//!
//! ```text
//! ```rust,linenos,linenostart=10,hl_lines=2-3 5
//! ```

use std::ops::RangeInclusive;

/// Display settings requested by a fence info string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceSettings {
    /// Language token; `None` for a bare fence.
    pub language: Option<String>,
    /// Emit a line-number gutter.
    pub line_numbers: bool,
    /// First line number shown in the gutter.
    pub line_number_start: usize,
    /// 1-based line ranges to mark as highlighted.
    pub highlight_lines: Vec<RangeInclusive<usize>>,
}

impl Default for FenceSettings {
    fn default() -> Self {
        Self {
            language: None,
            line_numbers: false,
            line_number_start: 1,
            highlight_lines: Vec::new(),
        }
    }
}

impl FenceSettings {
    /// Parse a fence info string. Unrecognized attributes are ignored
    /// rather than failing the build; the language token is positional.
    pub fn parse(info: &str) -> Self {
        let mut settings = Self::default();

        for (i, token) in info.split(',').map(str::trim).enumerate() {
            if token.is_empty() {
                continue;
            }
            if i == 0 {
                settings.language = Some(token.to_string());
            } else if token == "linenos" {
                settings.line_numbers = true;
            } else if let Some(value) = token.strip_prefix("linenostart=") {
                if let Ok(n) = value.parse() {
                    settings.line_number_start = n;
                }
            } else if let Some(value) = token.strip_prefix("hl_lines=") {
                settings.highlight_lines = parse_ranges(value);
            }
        }

        settings
    }

    /// Whether the given 1-based display line number is highlighted.
    pub fn is_highlighted(&self, line: usize) -> bool {
        self.highlight_lines.iter().any(|r| r.contains(&line))
    }
}

/// Parse space-separated `N` / `N-M` range tokens.
fn parse_ranges(value: &str) -> Vec<RangeInclusive<usize>> {
    let mut ranges = Vec::new();
    for token in value.split_whitespace() {
        let range = match token.split_once('-') {
            Some((lo, hi)) => match (lo.parse(), hi.parse()) {
                (Ok(lo), Ok(hi)) if lo <= hi => lo..=hi,
                _ => continue,
            },
            None => match token.parse() {
                Ok(n) => n..=n,
                Err(_) => continue,
            },
        };
        ranges.push(range);
    }
    ranges
}
