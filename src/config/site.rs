//! `[site]` configuration.
//!
//! Basic site information: title, author, base URL, language, theme.

use serde::{Deserialize, Serialize};

/// Site metadata injected into feeds and template contexts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfoConfig {
    /// Site title.
    pub title: String,

    /// Site description (feed subtitle).
    pub description: String,

    /// Author name.
    pub author: String,

    /// Author email.
    pub email: String,

    /// Site URL, used as link prefix (e.g., "https://example.com").
    pub base_url: Option<String>,

    /// Language code (e.g., "en", "zh-Hans").
    pub language: String,

    /// Theme identifier passed to the template renderer.
    pub theme: String,
}

impl Default for SiteInfoConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            author: String::new(),
            email: String::new(),
            base_url: None,
            language: "en".into(),
            theme: "plain".into(),
        }
    }
}

impl SiteInfoConfig {
    /// Base URL without a trailing slash, empty when unset.
    pub fn base_url_trimmed(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_default()
            .trim_end_matches('/')
    }
}
