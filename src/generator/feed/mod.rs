//! Syndication feed generation (RSS 2.0, Atom 1.0).
//!
//! Feeds are derived, read-only views over a section's pages: the
//! newest `max_items` dated pages, serialized per the configured
//! format. Generation is pure; the orchestrator writes the documents.

mod atom;
mod rss;

use crate::config::{FeedFormat, SiteConfig};
use crate::content::{ContentGraph, Section};
use crate::log;
use crate::utils::date::DateTimeUtc;
use anyhow::Result;
use rayon::prelude::*;
use std::path::PathBuf;

/// A page validated for feed inclusion (requires a publish date).
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub title: String,
    pub permalink: String,
    pub date: DateTimeUtc,
    /// Summary when the page has one, otherwise the full body HTML.
    pub html: String,
}

/// A rendered feed and its output path relative to the output root.
#[derive(Debug)]
pub struct FeedDocument {
    pub path: PathBuf,
    pub xml: String,
}

/// Generate one feed per section, in parallel. Empty when feeds are
/// disabled.
pub fn generate_all(graph: &ContentGraph, config: &SiteConfig) -> Result<Vec<FeedDocument>> {
    if !config.feed.enable {
        return Ok(Vec::new());
    }

    graph
        .sections
        .par_iter()
        .map(|(_, section)| generate(section, graph, config))
        .collect()
}

/// Generate the feed document for a single section.
pub fn generate(
    section: &Section,
    graph: &ContentGraph,
    config: &SiteConfig,
) -> Result<FeedDocument> {
    let entries = collect(section, graph, config);

    let xml = match config.feed.format {
        FeedFormat::Rss => rss::render(section, &entries, config)?,
        FeedFormat::Atom => atom::render(section, &entries, config),
    };

    let mut path = PathBuf::new();
    if !section.name.is_empty() {
        path.push(section.url.trim_matches('/'));
    }
    path.push(&config.feed.filename);

    log!("feed"; "{} ({} entries)", path.display(), entries.len());
    Ok(FeedDocument { path, xml })
}

/// The newest `max_items` dated pages of a section. Section pages are
/// already date descending with drafts excluded; undated pages are
/// skipped here.
fn collect(section: &Section, graph: &ContentGraph, config: &SiteConfig) -> Vec<FeedEntry> {
    let mut skipped = 0usize;
    let entries: Vec<FeedEntry> = section
        .pages
        .iter()
        .map(|&idx| &graph.pages[idx])
        .filter_map(|page| match page.date {
            Some(date) => Some(FeedEntry {
                title: page.title.clone(),
                permalink: page.permalink(config),
                date,
                html: page.summary.clone().unwrap_or_else(|| page.html.clone()),
            }),
            None => {
                skipped += 1;
                None
            }
        })
        .take(config.feed.max_items)
        .collect();

    if skipped > 0 {
        log!("feed"; "{}: skipped {} undated pages", section.display_name(), skipped);
    }
    entries
}

/// Feed URL for a section, used for `self` links inside documents.
fn feed_url(section: &Section, config: &SiteConfig) -> String {
    format!(
        "{}{}{}",
        config.site.base_url_trimmed(),
        section.url,
        config.feed.filename
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::path::PathBuf;

    fn config(format: &str, max_items: usize) -> SiteConfig {
        test_parse_config(&format!(
            "[site]\ntitle = \"Test Site\"\nbase_url = \"https://example.com\"\n\n\
             [feed]\nenable = true\nformat = \"{format}\"\nmax_items = {max_items}"
        ))
    }

    fn two_page_graph(config: &SiteConfig) -> ContentGraph {
        let files = vec![
            (
                PathBuf::from("blog/older.md"),
                "+++\ntitle = \"Older\"\ndate = \"2024-06-28\"\n+++\nolder body".to_string(),
            ),
            (
                PathBuf::from("blog/newer.md"),
                "+++\ntitle = \"Newer\"\ndate = \"2024-07-11\"\n+++\nnewer body".to_string(),
            ),
        ];
        ContentGraph::build(&files, config).unwrap()
    }

    #[test]
    fn test_max_items_takes_newest() {
        let config = config("rss", 1);
        let graph = two_page_graph(&config);
        let entries = collect(&graph.sections["blog"], &graph, &config);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Newer");
        assert_eq!(entries[0].permalink, "https://example.com/blog/newer/");
    }

    #[test]
    fn test_rss_document() {
        let config = config("rss", 20);
        let graph = two_page_graph(&config);
        let doc = generate(&graph.sections["blog"], &graph, &config).unwrap();
        assert_eq!(doc.path, PathBuf::from("blog/feed.xml"));
        assert!(doc.xml.contains("<rss"));
        assert!(doc.xml.contains("Newer"));
        assert!(doc.xml.contains("https://example.com/blog/newer/"));
        // Newest entry first
        assert!(doc.xml.find("Newer").unwrap() < doc.xml.find("Older").unwrap());
    }

    #[test]
    fn test_atom_document() {
        let config = config("atom", 20);
        let graph = two_page_graph(&config);
        let doc = generate(&graph.sections["blog"], &graph, &config).unwrap();
        assert!(doc.xml.contains("<feed"));
        assert!(doc.xml.contains("2024-07-11"));
    }

    #[test]
    fn test_empty_section_is_valid() {
        let config = config("rss", 20);
        let files = vec![(
            PathBuf::from("blog/wip.md"),
            "+++\ntitle = \"wip\"\ndraft = true\n+++\n".to_string(),
        )];
        let graph = ContentGraph::build(&files, &config).unwrap();
        let doc = generate(&graph.sections["blog"], &graph, &config).unwrap();
        assert!(doc.xml.contains("<rss"));
        assert!(!doc.xml.contains("<item>"));
    }

    #[test]
    fn test_undated_pages_excluded() {
        let config = config("rss", 20);
        let files = vec![(
            PathBuf::from("blog/undated.md"),
            "+++\ntitle = \"Undated\"\n+++\n".to_string(),
        )];
        let graph = ContentGraph::build(&files, &config).unwrap();
        let entries = collect(&graph.sections["blog"], &graph, &config);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_disabled_generates_nothing() {
        let config = test_parse_config("");
        let graph = two_page_graph(&config);
        assert!(generate_all(&graph, &config).unwrap().is_empty());
    }

    #[test]
    fn test_root_section_feed_path() {
        let config = config("rss", 20);
        let files = vec![(
            PathBuf::from("about.md"),
            "+++\ntitle = \"About\"\ndate = \"2024-01-01\"\n+++\n".to_string(),
        )];
        let graph = ContentGraph::build(&files, &config).unwrap();
        let doc = generate(&graph.sections[""], &graph, &config).unwrap();
        assert_eq!(doc.path, PathBuf::from("feed.xml"));
    }

    #[test]
    fn test_summary_preferred_over_body() {
        let config = config("rss", 20);
        let files = vec![(
            PathBuf::from("blog/post.md"),
            "+++\ntitle = \"Post\"\ndate = \"2024-07-11\"\n+++\nIntro.\n\n<!-- more -->\n\nRest."
                .to_string(),
        )];
        let graph = ContentGraph::build(&files, &config).unwrap();
        let entries = collect(&graph.sections["blog"], &graph, &config);
        assert!(entries[0].html.contains("Intro."));
        assert!(!entries[0].html.contains("Rest."));
    }
}
