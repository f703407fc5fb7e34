//! `[sections.<name>]` configuration.

use serde::{Deserialize, Serialize};

/// Which subset of pages a section index shows.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SectionLayout {
    /// All pages, date descending (default).
    #[default]
    List,
    /// Only the most recent pages.
    Recent,
    /// No listing, just the section's own content.
    About,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    /// Listing layout for the section index.
    pub layout: SectionLayout,
    /// Number of pages shown under the `recent` layout.
    pub recent_items: usize,
    /// Default per-page toggle values for pages in this section.
    /// Sits between page-level overrides and site-wide `[extra.post]`.
    pub defaults: toml::Table,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            layout: SectionLayout::List,
            recent_items: 5,
            defaults: toml::Table::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_layout_parsing() {
        let config = test_parse_config(
            "[sections.blog]\nlayout = \"recent\"\nrecent_items = 3\n\n[sections.about]\nlayout = \"about\"",
        );
        let blog = &config.sections["blog"];
        assert_eq!(blog.layout, SectionLayout::Recent);
        assert_eq!(blog.recent_items, 3);
        assert_eq!(config.sections["about"].layout, SectionLayout::About);
    }

    #[test]
    fn test_default_layout() {
        let config = test_parse_config("");
        assert!(config.sections.is_empty());
        assert_eq!(SectionConfig::default().layout, SectionLayout::List);
    }
}
