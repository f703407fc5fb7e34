//! Build orchestration.
//!
//! Sequences the whole pipeline: discover content, parse and render in
//! parallel, assemble the graph, index taxonomies, generate feeds,
//! render templates, process assets, write the output tree. The first
//! hard error from any stage aborts the build; a partially valid site
//! is never published.

pub mod state;

use crate::asset::{self, CompiledAsset, minify_html};
use crate::config::SiteConfig;
use crate::content::ContentGraph;
use crate::generator::feed;
use crate::log;
use crate::render::{
    DefaultTheme, PageContext, SectionContext, TemplateRenderer, TermContext, TermListContext,
};
use crate::taxonomy::{self, TaxonomyTerm};
use crate::utils::slug::maybe_slugify;
use anyhow::{Context, Result, bail};
use jwalk::WalkDir;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Summary of a completed build.
#[derive(Debug)]
pub struct BuildStats {
    pub pages: usize,
    pub sections: usize,
    pub terms: usize,
    pub feeds: usize,
    pub assets: usize,
    pub elapsed: std::time::Duration,
}

/// Run a full site build under the configured root.
pub fn build_site(config: &SiteConfig) -> Result<BuildStats> {
    let started = Instant::now();

    let files = discover_content(config)?;
    crate::debug!("build"; "discovered {} content files", files.len());
    ensure_running()?;

    let graph = ContentGraph::build(&files, config)?;
    crate::debug!("build"; "graph: {} pages, {} sections", graph.pages.len(), graph.sections.len());
    ensure_running()?;

    // Independent read-only aggregates over the finished graph.
    let (terms, feeds) = rayon::join(
        || taxonomy::index(&graph, config),
        || feed::generate_all(&graph, config),
    );
    let feeds = feeds?;
    ensure_running()?;

    // Stylesheets are compiled before templates so the theme links
    // exactly the assets the build ships.
    let mut assets = asset::process_styles(config)?;
    let theme = DefaultTheme::new(stylesheet_links(&assets));
    ensure_running()?;

    let documents = render_documents(&graph, &terms, config, &theme)?;
    assets.extend(asset::highlight_styles(config)?);
    ensure_running()?;

    write_output(config, &documents, &feeds, &assets)?;

    let stats = BuildStats {
        pages: graph.pages.len(),
        sections: graph.sections.len(),
        terms: terms.values().map(Vec::len).sum(),
        feeds: feeds.len(),
        assets: assets.len(),
        elapsed: started.elapsed(),
    };
    log!("build"; "{} pages, {} sections, {} terms, {} feeds, {} assets in {:.2?}",
        stats.pages, stats.sections, stats.terms, stats.feeds, stats.assets, stats.elapsed);
    Ok(stats)
}

/// Hrefs for the compiled stylesheets, as served under `/css/`.
fn stylesheet_links(assets: &[CompiledAsset]) -> Vec<String> {
    assets
        .iter()
        .map(|asset| format!("/css/{}", asset.path.display()))
        .collect()
}

fn ensure_running() -> Result<()> {
    if state::is_shutdown() {
        bail!("build aborted by shutdown signal");
    }
    Ok(())
}

/// Collect `(content-relative path, raw content)` pairs for every
/// markdown file, in stable path order.
fn discover_content(config: &SiteConfig) -> Result<Vec<(PathBuf, String)>> {
    let content_dir = config.content_dir();
    if !content_dir.is_dir() {
        bail!("content directory not found: {}", content_dir.display());
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(&content_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "md"))
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let relative = path
                .strip_prefix(&content_dir)
                .unwrap_or(&path)
                .to_path_buf();
            Ok((relative, content))
        })
        .collect()
}

/// Render every HTML document of the site: one per page (drafts render
/// standalone too), one index per section, one per taxonomy term plus
/// the per-taxonomy term list.
fn render_documents(
    graph: &ContentGraph,
    terms: &BTreeMap<String, Vec<TaxonomyTerm>>,
    config: &SiteConfig,
    theme: &dyn TemplateRenderer,
) -> Result<Vec<(PathBuf, String)>> {
    let mut documents: Vec<(PathBuf, String)> = graph
        .pages
        .par_iter()
        .map(|page| {
            let html = theme.render_page(&PageContext { page, config })?;
            Ok((url_to_output_path(&page.url), html))
        })
        .collect::<Result<_>>()?;

    for section in graph.sections.values() {
        let pages = section
            .listed()
            .iter()
            .map(|&idx| &graph.pages[idx])
            .collect();
        let html = theme.render_section(&SectionContext {
            section,
            pages,
            config,
        })?;
        documents.push((url_to_output_path(&section.url), html));
    }

    for (taxonomy, buckets) in terms {
        let taxonomy_slug = maybe_slugify(taxonomy, config.slugify.paths);
        for term in buckets {
            let pages = term.pages.iter().map(|&idx| &graph.pages[idx]).collect();
            let html = theme.render_term(&TermContext {
                taxonomy,
                term,
                pages,
                config,
            })?;
            documents.push((url_to_output_path(&term.url(taxonomy, config)), html));
        }
        let html = theme.render_term_list(&TermListContext {
            taxonomy,
            terms: buckets,
            config,
        })?;
        documents.push((url_to_output_path(&format!("/{taxonomy_slug}/")), html));
    }

    if config.build.minify {
        documents = documents
            .into_par_iter()
            .map(|(path, html)| Ok((path.clone(), minify_html(&path, &html)?)))
            .collect::<Result<_>>()?;
    }

    Ok(documents)
}

/// `/blog/hello/` -> `blog/hello/index.html`; `/` -> `index.html`.
fn url_to_output_path(url: &str) -> PathBuf {
    let trimmed = url.trim_matches('/');
    if trimmed.is_empty() {
        PathBuf::from("index.html")
    } else {
        Path::new(trimmed).join("index.html")
    }
}

/// Write the final artifact tree. The output directory is replaced
/// wholesale so stale artifacts never survive.
fn write_output(
    config: &SiteConfig,
    documents: &[(PathBuf, String)],
    feeds: &[feed::FeedDocument],
    assets: &[CompiledAsset],
) -> Result<()> {
    let output_dir = config.output_dir();
    if output_dir.exists() {
        fs::remove_dir_all(&output_dir)
            .with_context(|| format!("clearing {}", output_dir.display()))?;
    }
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    for (path, html) in documents {
        write_file(&output_dir.join(path), html)?;
    }
    for doc in feeds {
        write_file(&output_dir.join(&doc.path), &doc.xml)?;
    }
    for asset in assets {
        write_file(&output_dir.join("css").join(&asset.path), &asset.content)?;
    }
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn site() -> (tempfile::TempDir, SiteConfig) {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "content/blog/hello-world.md",
            "+++\ntitle = \"Hello World\"\ndate = \"2024-07-11\"\n[taxonomies]\ncategories = [\"posts\"]\n+++\nFirst post.",
        );
        write(
            dir.path(),
            "content/blog/second.md",
            "+++\ntitle = \"Second\"\ndate = \"2024-06-28\"\n[taxonomies]\ncategories = [\"posts\"]\n+++\nSecond post.",
        );
        write(dir.path(), "content/about.md", "+++\ntitle = \"About\"\n+++\nAbout me.");
        write(dir.path(), "styles/main.css", "body { color: #333; }");

        let mut config = test_parse_config(
            "[site]\ntitle = \"Test\"\nbase_url = \"https://example.com\"\n\n\
             [feed]\nenable = true\n\n\
             [[taxonomies]]\nname = \"categories\"",
        );
        config.root = dir.path().to_path_buf();
        (dir, config)
    }

    #[test]
    fn test_full_build() {
        let (dir, config) = site();
        let stats = build_site(&config).unwrap();

        assert_eq!(stats.pages, 3);
        assert_eq!(stats.sections, 2);
        assert_eq!(stats.terms, 1);
        assert_eq!(stats.feeds, 2);

        let public = dir.path().join("public");
        assert!(public.join("blog/hello-world/index.html").is_file());
        assert!(public.join("blog/second/index.html").is_file());
        assert!(public.join("about/index.html").is_file());
        assert!(public.join("blog/index.html").is_file());
        assert!(public.join("categories/posts/index.html").is_file());
        assert!(public.join("categories/index.html").is_file());
        assert!(public.join("blog/feed.xml").is_file());
        assert!(public.join("css/main.css").is_file());
        assert!(public.join("css/highlight-light.css").is_file());
        assert!(public.join("css/highlight-dark.css").is_file());

        let section_index = fs::read_to_string(public.join("blog/index.html")).unwrap();
        // Newest first in the section listing
        assert!(
            section_index.find("Hello World").unwrap() < section_index.find("Second").unwrap()
        );
    }

    #[test]
    fn test_stylesheet_links_follow_styles_dir() {
        let (dir, config) = site();
        build_site(&config).unwrap();
        let html = fs::read_to_string(dir.path().join("public/about/index.html")).unwrap();
        assert!(html.contains("href=\"/css/main.css\""));

        // Without a styles directory no stylesheet link is emitted.
        fs::remove_dir_all(dir.path().join("styles")).unwrap();
        build_site(&config).unwrap();
        let html = fs::read_to_string(dir.path().join("public/about/index.html")).unwrap();
        assert!(!html.contains("main.css"));
    }

    #[test]
    fn test_stale_output_removed() {
        let (dir, config) = site();
        let stale = dir.path().join("public/old/index.html");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "stale").unwrap();

        build_site(&config).unwrap();
        assert!(!stale.exists());
    }

    #[test]
    fn test_duplicate_url_aborts_without_output() {
        let (dir, config) = site();
        write(
            dir.path(),
            "content/blog/Hello World.md",
            "+++\ntitle = \"Clash\"\n+++\n",
        );

        assert!(build_site(&config).is_err());
        assert!(!dir.path().join("public").exists());
    }

    #[test]
    fn test_draft_rendered_but_unlisted() {
        let (dir, config) = site();
        write(
            dir.path(),
            "content/blog/wip.md",
            "+++\ntitle = \"Work In Progress\"\ndraft = true\n+++\nNot done.",
        );

        build_site(&config).unwrap();
        let public = dir.path().join("public");
        assert!(public.join("blog/wip/index.html").is_file());
        let listing = fs::read_to_string(public.join("blog/index.html")).unwrap();
        assert!(!listing.contains("Work In Progress"));
        let feed = fs::read_to_string(public.join("blog/feed.xml")).unwrap();
        assert!(!feed.contains("Work In Progress"));
    }

    #[test]
    fn test_minified_build() {
        let (dir, mut config) = site();
        config.build.minify = true;

        build_site(&config).unwrap();
        let html = fs::read_to_string(dir.path().join("public/blog/hello-world/index.html"))
            .unwrap();
        assert!(html.contains("First post."));
        assert!(!html.contains("\n<p>"));
    }

    #[test]
    fn test_missing_content_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_parse_config("");
        config.root = dir.path().to_path_buf();
        assert!(build_site(&config).is_err());
    }

    #[test]
    fn test_url_to_output_path() {
        assert_eq!(url_to_output_path("/"), PathBuf::from("index.html"));
        assert_eq!(
            url_to_output_path("/blog/hello/"),
            PathBuf::from("blog/hello/index.html")
        );
    }
}
