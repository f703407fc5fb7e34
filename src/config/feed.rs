//! `[feed]` (RSS/Atom) generation configuration.

use serde::{Deserialize, Serialize};

/// Feed output format.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeedFormat {
    /// RSS 2.0 format (default).
    #[default]
    Rss,
    /// Atom 1.0 format.
    Atom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Enable per-section feed generation.
    pub enable: bool,
    /// Output filename for each section feed.
    pub filename: String,
    /// Feed format (RSS 2.0 or Atom 1.0).
    pub format: FeedFormat,
    /// Maximum number of entries per feed.
    pub max_items: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enable: false,
            filename: "feed.xml".into(),
            format: FeedFormat::Rss,
            max_items: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert!(!config.feed.enable);
        assert_eq!(config.feed.filename, "feed.xml");
        assert_eq!(config.feed.format, FeedFormat::Rss);
        assert_eq!(config.feed.max_items, 20);
    }

    #[test]
    fn test_custom_config() {
        let config = test_parse_config(
            "[site]\nbase_url = \"https://example.com\"\n\n[feed]\nenable = true\nfilename = \"atom.xml\"\nformat = \"atom\"\nmax_items = 5",
        );
        assert!(config.feed.enable);
        assert_eq!(config.feed.filename, "atom.xml");
        assert_eq!(config.feed.format, FeedFormat::Atom);
        assert_eq!(config.feed.max_items, 5);
    }
}
