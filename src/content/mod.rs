//! Content model: pages, sections, and the content graph.

pub mod front_matter;
pub mod graph;
pub mod section;

pub use front_matter::PageMeta;
pub use graph::ContentGraph;
pub use section::{Section, SectionLayout};

use crate::config::SiteConfig;
use crate::error::BuildError;
use crate::markdown::{self, RenderOptions};
use crate::utils::date::DateTimeUtc;
use crate::utils::slug::maybe_slugify;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Per-page presentation toggles, resolved with explicit precedence:
/// page front matter, then section defaults, then site `[extra.post]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Toggles {
    /// Render a table of contents.
    pub toc: bool,
    /// Enable the comment widget.
    pub comment: bool,
    /// Load math rendering.
    pub math: bool,
    /// Load mermaid diagram rendering.
    pub mermaid: bool,
    /// Mark the page as featured in listings.
    pub featured: bool,
    /// Show the outdated-content warning banner.
    pub outdated: bool,
}

impl Toggles {
    const KEYS: [&'static str; 6] = ["toc", "comment", "math", "mermaid", "featured", "outdated"];

    /// Resolve toggles from the three precedence layers.
    pub fn resolve(page: &toml::Table, section: &toml::Table, site: &toml::Table) -> Self {
        let get = |key: &str| {
            page.get(key)
                .or_else(|| section.get(key))
                .or_else(|| site.get(key))
                .and_then(toml::Value::as_bool)
                .unwrap_or(false)
        };
        Self {
            toc: get(Self::KEYS[0]),
            comment: get(Self::KEYS[1]),
            math: get(Self::KEYS[2]),
            mermaid: get(Self::KEYS[3]),
            featured: get(Self::KEYS[4]),
            outdated: get(Self::KEYS[5]),
        }
    }
}

/// A single content page.
///
/// Owned exclusively by the [`ContentGraph`] once built; immutable
/// afterwards. The rendered HTML is produced exactly once, by the worker
/// that parsed the file.
#[derive(Debug, Clone)]
pub struct Page {
    /// Content-relative source path (page identity).
    pub source: PathBuf,
    /// Section name; empty for root-level pages.
    pub section: String,
    /// URL-safe identifier derived from the path or an explicit override.
    pub slug: String,
    /// Site-absolute output URL, e.g. `/blog/hello-world/`.
    pub url: String,
    pub title: String,
    pub date: Option<DateTimeUtc>,
    pub draft: bool,
    /// Taxonomy name -> declared terms (display strings).
    pub taxonomies: BTreeMap<String, Vec<String>>,
    pub toggles: Toggles,
    /// Rendered summary HTML (explicit front-matter summary or the part
    /// of the body above the `<!-- more -->` marker).
    pub summary: Option<String>,
    /// Rendered body HTML.
    pub html: String,
    /// Opaque front-matter extension fields.
    pub extra: toml::Table,
}

impl Page {
    /// Parse and render a single content file into a Page.
    ///
    /// Stateless across files, so the orchestrator fans this out on a
    /// worker pool.
    pub fn from_file(
        source: &Path,
        content: &str,
        config: &SiteConfig,
        opts: &RenderOptions,
    ) -> Result<Self, BuildError> {
        let (meta, body) = front_matter::parse(source, content)?;

        // Every declared taxonomy must be defined in config.
        for name in meta.taxonomies.keys() {
            if config.taxonomy(name).is_none() {
                return Err(BuildError::metadata(
                    source,
                    format!("taxonomy `{name}` is not defined in kiln.toml"),
                ));
            }
        }

        let section = section_of(source);
        let slug = page_slug(source, &meta, config);
        let url = page_url(&section, &slug, config);

        let rendered = markdown::render(body, opts).map_err(|err| BuildError::render(source, err))?;
        let summary = match &meta.summary {
            Some(text) => Some(
                markdown::render(text, opts)
                    .map_err(|err| BuildError::render(source, err))?
                    .html,
            ),
            None => rendered.summary,
        };

        let section_defaults = config.section(&section).defaults;
        let site_defaults = config
            .extra
            .get("post")
            .and_then(|v| v.as_table())
            .cloned()
            .unwrap_or_default();
        let toggles = Toggles::resolve(&meta.extra, &section_defaults, &site_defaults);

        let title = meta.title.clone().unwrap_or_default();
        let date = meta.parsed_date();

        Ok(Self {
            source: source.to_path_buf(),
            section,
            slug,
            url,
            title,
            date,
            draft: meta.draft,
            taxonomies: meta.taxonomies,
            toggles,
            summary,
            html: rendered.html,
            extra: meta.extra,
        })
    }

    /// Absolute permalink (base URL + site-absolute path).
    pub fn permalink(&self, config: &SiteConfig) -> String {
        format!("{}{}", config.site.base_url_trimmed(), self.url)
    }
}

/// Section name for a content-relative path: its first directory
/// component, or empty for root-level files.
fn section_of(source: &Path) -> String {
    let mut components = source.components();
    let first = components.next();
    if components.next().is_none() {
        // Only the filename itself: root section.
        return String::new();
    }
    first
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Compute the page slug: explicit override wins, else the file stem,
/// both passed through the paths-mode slugifier. An empty slugified
/// result falls back to the raw stem so a page never loses its URL.
fn page_slug(source: &Path, meta: &PageMeta, config: &SiteConfig) -> String {
    let raw = match &meta.slug {
        Some(explicit) => explicit.clone(),
        None => source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    let slug = maybe_slugify(&raw, config.slugify.paths);
    if slug.is_empty() { raw } else { slug }
}

/// Output URL for a page: `/<section>/<slug>/`, `/<slug>/` at the root.
fn page_url(section: &str, slug: &str, config: &SiteConfig) -> String {
    if section.is_empty() {
        format!("/{slug}/")
    } else {
        let section_slug = maybe_slugify(section, config.slugify.paths);
        format!("/{section_slug}/{slug}/")
    }
}
