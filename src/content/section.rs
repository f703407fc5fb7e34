//! Sections: directory-scoped groupings of pages.

use crate::config::SectionConfig;
pub use crate::config::SectionLayout;

/// A named grouping of pages sharing a listing layout.
#[derive(Debug, Clone)]
pub struct Section {
    /// Directory name; empty for the root section.
    pub name: String,
    /// Site-absolute index URL, e.g. `/blog/`.
    pub url: String,
    /// Listing configuration (layout, recent count, toggle defaults).
    pub config: SectionConfig,
    /// Indices into the graph's page arena: non-draft pages only,
    /// date descending, ties broken by source path ascending.
    pub pages: Vec<usize>,
}

impl Section {
    /// The subset of pages the section index lists, per layout.
    pub fn listed(&self) -> &[usize] {
        match self.config.layout {
            SectionLayout::List => &self.pages,
            SectionLayout::Recent => {
                let n = self.pages.len().min(self.config.recent_items);
                &self.pages[..n]
            }
            SectionLayout::About => &[],
        }
    }

    /// Human-facing name (the root section displays as "home").
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "home"
        } else {
            &self.name
        }
    }
}
