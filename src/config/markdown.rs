//! `[markdown]` configuration: rendering feature switches.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Highlight fenced code blocks with syntect.
    pub highlight_code: bool,

    /// Highlight theme for the light color scheme.
    pub highlight_theme_light: String,

    /// Highlight theme for the dark color scheme.
    pub highlight_theme_dark: String,

    /// Convert straight quotes/dashes to typographic variants.
    pub smart_punctuation: bool,

    /// Substitute `:shortcode:` emoji in text.
    pub render_emoji: bool,

    /// Add `target="_blank"` to external links.
    pub external_links_target_blank: bool,

    /// `rel` attribute for external links (empty = none).
    pub external_links_rel: String,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            highlight_code: true,
            highlight_theme_light: "InspiredGitHub".into(),
            highlight_theme_dark: "base16-ocean.dark".into(),
            smart_punctuation: false,
            render_emoji: false,
            external_links_target_blank: false,
            external_links_rel: String::new(),
        }
    }
}
