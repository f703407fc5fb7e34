//! Content graph assembly.
//!
//! Parsing and rendering individual files is embarrassingly parallel;
//! the graph itself is the single synchronization point where
//! cross-page relationships (sections, URL uniqueness) are resolved
//! over the complete page set.

use super::{Page, Section};
use crate::config::SiteConfig;
use crate::error::BuildError;
use crate::log;
use crate::markdown::RenderOptions;
use crate::utils::date::DateTimeUtc;
use crate::utils::slug::maybe_slugify;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Arena of pages plus the section index over them.
///
/// Immutable once built; taxonomy indexing, feeds and templates read
/// from it concurrently.
#[derive(Debug)]
pub struct ContentGraph {
    pub pages: Vec<Page>,
    pub sections: BTreeMap<String, Section>,
}

impl ContentGraph {
    /// Parse, render and assemble all content files.
    ///
    /// The per-file fan-out runs on the rayon pool; each task owns its
    /// input and produces an independent [`Page`]. Fails on the first
    /// error, in file order.
    pub fn build(files: &[(PathBuf, String)], config: &SiteConfig) -> Result<Self, BuildError> {
        let opts = RenderOptions::from_config(config);

        let results: Vec<Result<Page, BuildError>> = files
            .par_iter()
            .map(|(path, content)| Page::from_file(path, content, config, &opts))
            .collect();

        let mut pages = Vec::with_capacity(results.len());
        for result in results {
            pages.push(result?);
        }

        Self::assemble(pages, config)
    }

    /// Build cross-page relationships over the full page set.
    pub(crate) fn assemble(pages: Vec<Page>, config: &SiteConfig) -> Result<Self, BuildError> {
        // Output URLs must be unique across the whole site. Draft
        // collisions fail the same as non-draft ones.
        let mut seen: FxHashMap<&str, usize> = FxHashMap::default();
        for (idx, page) in pages.iter().enumerate() {
            if let Some(&first) = seen.get(page.url.as_str()) {
                return Err(BuildError::DuplicateUrl {
                    url: page.url.clone(),
                    first: pages[first].source.clone(),
                    second: page.source.clone(),
                });
            }
            seen.insert(&page.url, idx);
        }

        // Future-dated pages are tolerated with a warning; sort order
        // stays well-defined either way.
        let now = DateTimeUtc::now();
        for page in &pages {
            if !page.draft
                && let Some(date) = page.date
                && date > now
            {
                log!("warning"; "{}: publish date {} is in the future",
                    page.source.display(), date.to_rfc3339());
            }
        }

        let mut sections: BTreeMap<String, Section> = BTreeMap::new();
        for (idx, page) in pages.iter().enumerate() {
            let entry = sections
                .entry(page.section.clone())
                .or_insert_with(|| Section {
                    name: page.section.clone(),
                    url: section_url(&page.section, config),
                    config: config.section(&page.section),
                    pages: Vec::new(),
                });
            // Drafts exist in the arena but never in listings.
            if !page.draft {
                entry.pages.push(idx);
            }
        }

        for section in sections.values_mut() {
            sort_by_date_desc(&mut section.pages, &pages);
        }

        Ok(Self { pages, sections })
    }

    /// All non-draft page indices in global date-descending order.
    pub fn ordered_non_draft(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .pages
            .iter()
            .enumerate()
            .filter(|(_, page)| !page.draft)
            .map(|(idx, _)| idx)
            .collect();
        sort_by_date_desc(&mut indices, &self.pages);
        indices
    }
}

/// Date descending, ties broken by source path ascending. Pages
/// without a date sort last.
fn sort_by_date_desc(indices: &mut [usize], pages: &[Page]) {
    indices.sort_by(|&a, &b| {
        let (pa, pb) = (&pages[a], &pages[b]);
        pb.date
            .cmp(&pa.date)
            .then_with(|| pa.source.cmp(&pb.source))
    });
}

fn section_url(name: &str, config: &SiteConfig) -> String {
    if name.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", maybe_slugify(name, config.slugify.paths))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    fn file(path: &str, title: &str, date: Option<&str>, draft: bool) -> (PathBuf, String) {
        let mut fm = format!("+++\ntitle = \"{title}\"\n");
        if let Some(d) = date {
            fm.push_str(&format!("date = \"{d}\"\n"));
        }
        if draft {
            fm.push_str("draft = true\n");
        }
        fm.push_str("+++\n\nbody\n");
        (PathBuf::from(path), fm)
    }

    fn config() -> SiteConfig {
        test_parse_config("")
    }

    #[test]
    fn test_sections_and_ordering() {
        let files = vec![
            file("blog/older.md", "Older", Some("2024-06-28"), false),
            file("blog/newer.md", "Newer", Some("2024-07-11"), false),
            file("about.md", "About", None, false),
        ];
        let graph = ContentGraph::build(&files, &config()).unwrap();

        assert_eq!(graph.sections.len(), 2);
        let blog = &graph.sections["blog"];
        assert_eq!(blog.url, "/blog/");
        let titles: Vec<&str> = blog
            .pages
            .iter()
            .map(|&i| graph.pages[i].title.as_str())
            .collect();
        assert_eq!(titles, vec!["Newer", "Older"]);

        let root = &graph.sections[""];
        assert_eq!(root.url, "/");
        assert_eq!(root.pages.len(), 1);
    }

    #[test]
    fn test_date_tie_broken_by_path() {
        let files = vec![
            file("blog/zeta.md", "Z", Some("2024-07-11"), false),
            file("blog/alpha.md", "A", Some("2024-07-11"), false),
        ];
        let graph = ContentGraph::build(&files, &config()).unwrap();
        let blog = &graph.sections["blog"];
        assert_eq!(graph.pages[blog.pages[0]].title, "A");
        assert_eq!(graph.pages[blog.pages[1]].title, "Z");
    }

    #[test]
    fn test_undated_pages_sort_last() {
        let files = vec![
            file("blog/undated.md", "Undated", None, false),
            file("blog/dated.md", "Dated", Some("2024-01-01"), false),
        ];
        let graph = ContentGraph::build(&files, &config()).unwrap();
        let blog = &graph.sections["blog"];
        assert_eq!(graph.pages[blog.pages[0]].title, "Dated");
    }

    #[test]
    fn test_duplicate_url_fails() {
        let files = vec![
            file("blog/post.md", "One", None, false),
            file("blog/Post.md", "Two", None, false), // same slug after slugify
        ];
        let err = ContentGraph::build(&files, &config()).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateUrl { .. }));
    }

    #[test]
    fn test_draft_duplicate_url_also_fails() {
        let files = vec![
            file("blog/post.md", "One", None, false),
            file("blog/Post.md", "Two", None, true),
        ];
        let err = ContentGraph::build(&files, &config()).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateUrl { .. }));
    }

    #[test]
    fn test_distinct_paths_get_distinct_urls() {
        let files = vec![
            file("blog/one.md", "Same Title", None, false),
            file("blog/two.md", "Same Title", None, false),
        ];
        let graph = ContentGraph::build(&files, &config()).unwrap();
        assert_eq!(graph.pages.len(), 2);
        assert_ne!(graph.pages[0].url, graph.pages[1].url);
    }

    #[test]
    fn test_drafts_excluded_from_listings_but_kept() {
        let files = vec![
            file("blog/live.md", "Live", Some("2024-07-11"), false),
            file("blog/wip.md", "WIP", Some("2024-07-12"), true),
        ];
        let graph = ContentGraph::build(&files, &config()).unwrap();
        assert_eq!(graph.pages.len(), 2);
        assert_eq!(graph.sections["blog"].pages.len(), 1);
        assert_eq!(graph.ordered_non_draft().len(), 1);
    }

    #[test]
    fn test_build_is_order_independent() {
        let mut files = vec![
            file("blog/a.md", "A", Some("2024-01-01"), false),
            file("blog/b.md", "B", Some("2024-02-01"), false),
            file("blog/c.md", "C", Some("2024-03-01"), false),
        ];
        let graph1 = ContentGraph::build(&files, &config()).unwrap();
        files.reverse();
        let graph2 = ContentGraph::build(&files, &config()).unwrap();

        let order1: Vec<&str> = graph1.sections["blog"]
            .pages
            .iter()
            .map(|&i| graph1.pages[i].title.as_str())
            .collect();
        let order2: Vec<&str> = graph2.sections["blog"]
            .pages
            .iter()
            .map(|&i| graph2.pages[i].title.as_str())
            .collect();
        assert_eq!(order1, order2);
    }

    #[test]
    fn test_first_error_wins_in_file_order() {
        let files = vec![
            file("blog/fine.md", "Fine", None, false),
            (PathBuf::from("blog/broken.md"), "no front matter".into()),
        ];
        let err = ContentGraph::build(&files, &config()).unwrap_err();
        assert!(err.to_string().contains("broken.md"));
    }
}
