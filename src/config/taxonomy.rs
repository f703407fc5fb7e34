//! `[[taxonomies]]` definitions.

use serde::{Deserialize, Serialize};

/// A named classification axis (e.g., "tags", "categories").
///
/// Pages may only declare terms under taxonomies defined here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyDefinition {
    /// Taxonomy name as used in front matter and URLs.
    pub name: String,

    /// Whether term strings are slugified for bucketing and URLs.
    /// Unset falls back to the global `[slugify] taxonomies` switch.
    #[serde(default)]
    pub slugify: Option<bool>,
}

impl TaxonomyDefinition {
    /// Effective slugify switch for this taxonomy.
    pub fn slugify_terms(&self, global: bool) -> bool {
        self.slugify.unwrap_or(global)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_definitions() {
        let config = test_parse_config(
            "[[taxonomies]]\nname = \"tags\"\n\n[[taxonomies]]\nname = \"categories\"\nslugify = false",
        );
        assert_eq!(config.taxonomies.len(), 2);
        assert_eq!(config.taxonomies[0].name, "tags");
        assert!(config.taxonomies[0].slugify_terms(true));
        assert!(!config.taxonomies[1].slugify_terms(true));
    }
}
