//! `[slugify]` configuration.
//!
//! Three independent switches, one per slugification site. A disabled
//! switch makes the corresponding transform the identity.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlugifyConfig {
    /// Slugify page and section URL paths.
    pub paths: bool,
    /// Slugify taxonomy term slugs.
    pub taxonomies: bool,
    /// Slugify heading anchors.
    pub anchors: bool,
}

impl Default for SlugifyConfig {
    fn default() -> Self {
        Self {
            paths: true,
            taxonomies: true,
            anchors: true,
        }
    }
}
