//! Site configuration management for `kiln.toml`.
//!
//! | Section          | Purpose                                        |
//! |------------------|------------------------------------------------|
//! | `[site]`         | Site metadata (title, author, base_url, theme) |
//! | `[build]`        | Directories, CSS compile/minify toggles        |
//! | `[markdown]`     | Rendering feature switches, highlight themes   |
//! | `[slugify]`      | Per-mode slug switches (paths/taxonomies/anchors) |
//! | `[feed]`         | Per-section feed generation                    |
//! | `[[taxonomies]]` | Classification axes pages may declare          |
//! | `[sections.*]`   | Per-section listing layout                     |
//! | `[extra]`        | Opaque presentation block for templates        |
//!
//! Loaded once before any page exists; read-only for the whole build.

mod build;
mod error;
mod feed;
mod markdown;
mod section;
mod site;
mod slug;
mod taxonomy;

pub use build::BuildConfig;
pub use error::ConfigError;
pub use feed::{FeedConfig, FeedFormat};
pub use markdown::MarkdownConfig;
pub use section::{SectionConfig, SectionLayout};
pub use site::SiteInfoConfig;
pub use slug::SlugifyConfig;
pub use taxonomy::TaxonomyDefinition;

use crate::log;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

/// Default config filename at the site root.
pub const CONFIG_FILENAME: &str = "kiln.toml";

/// Root configuration structure representing kiln.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Site root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Site metadata
    #[serde(default)]
    pub site: SiteInfoConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Markdown rendering switches
    #[serde(default)]
    pub markdown: MarkdownConfig,

    /// Slugify switches
    #[serde(default)]
    pub slugify: SlugifyConfig,

    /// Feed settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Taxonomy definitions
    #[serde(default)]
    pub taxonomies: Vec<TaxonomyDefinition>,

    /// Per-section listing configuration
    #[serde(default)]
    pub sections: BTreeMap<String, SectionConfig>,

    /// Opaque presentation block (navigation, footer, post defaults).
    /// Carried into template contexts without interpretation.
    #[serde(default)]
    pub extra: toml::Table,
}

impl SiteConfig {
    /// Load configuration from `<root>/kiln.toml` (or an explicit file).
    pub fn load(root: &Path, config_file: Option<&Path>) -> Result<Self> {
        let config_path = match config_file {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => root.join(path),
            None => root.join(CONFIG_FILENAME),
        };

        let mut config = Self::from_path(&config_path)?;
        config.config_path = config_path;
        config.root = root.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            let display_path = path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_else(|| path.to_string_lossy());
            log!("warning"; "ignoring unknown fields in {}:", display_path);
            for field in &ignored {
                eprintln!("- {field}");
            }
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Validate cross-field constraints. Collects all problems before
    /// failing so the operator sees everything at once.
    fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if let Some(base_url) = &self.site.base_url
            && url::Url::parse(base_url).is_err()
        {
            problems.push(format!(
                "site.base_url is not a valid URL: `{base_url}` (expected e.g. \"https://example.com\")"
            ));
        }

        if self.feed.enable {
            if self.site.base_url.is_none() {
                problems
                    .push("feed.enable requires site.base_url for absolute entry links".into());
            }
            if self.feed.max_items == 0 {
                problems.push("feed.max_items must be at least 1".into());
            }
            if self.feed.filename.trim().is_empty() {
                problems.push("feed.filename must not be empty".into());
            }
        }

        let mut seen = std::collections::BTreeSet::new();
        for def in &self.taxonomies {
            if def.name.trim().is_empty() {
                problems.push("taxonomy definition with an empty name".into());
            } else if !seen.insert(def.name.as_str()) {
                problems.push(format!("duplicate taxonomy definition `{}`", def.name));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(problems.join("\n")))
        }
    }

    /// Look up a taxonomy definition by name.
    pub fn taxonomy(&self, name: &str) -> Option<&TaxonomyDefinition> {
        self.taxonomies.iter().find(|def| def.name == name)
    }

    /// Listing configuration for a section (defaults when unconfigured).
    pub fn section(&self, name: &str) -> SectionConfig {
        self.sections.get(name).cloned().unwrap_or_default()
    }

    /// Absolute content directory.
    pub fn content_dir(&self) -> PathBuf {
        self.root.join(&self.build.content_dir)
    }

    /// Absolute output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.build.output_dir)
    }

    /// Absolute stylesheet source directory.
    pub fn styles_dir(&self) -> PathBuf {
        self.root.join(&self.build.styles_dir)
    }
}

/// Parse a config string, panicking on unknown fields (catches typos in
/// test fixtures).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {ignored:?}"
    );
    parsed
}
