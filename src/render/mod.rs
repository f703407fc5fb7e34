//! Template rendering.
//!
//! Templates are an external collaborator behind [`TemplateRenderer`]:
//! each hook receives a read-only context (the entity plus site-wide
//! config) and returns a markup string or a `TemplateError` naming the
//! missing piece. [`DefaultTheme`] is the built-in implementation so
//! the binary is self-contained.

use crate::config::SiteConfig;
use crate::content::{Page, Section};
use crate::error::BuildError;
use crate::taxonomy::TaxonomyTerm;
use crate::utils::html::{escape_attr, escape_text};
use std::fmt::Write;

/// Read context for a single page.
pub struct PageContext<'a> {
    pub page: &'a Page,
    pub config: &'a SiteConfig,
}

/// Read context for a section index. `pages` is the listed subset in
/// display order.
pub struct SectionContext<'a> {
    pub section: &'a Section,
    pub pages: Vec<&'a Page>,
    pub config: &'a SiteConfig,
}

/// Read context for one taxonomy term index.
pub struct TermContext<'a> {
    pub taxonomy: &'a str,
    pub term: &'a TaxonomyTerm,
    pub pages: Vec<&'a Page>,
    pub config: &'a SiteConfig,
}

/// Read context for a taxonomy's term list page.
pub struct TermListContext<'a> {
    pub taxonomy: &'a str,
    pub terms: &'a [TaxonomyTerm],
    pub config: &'a SiteConfig,
}

/// The external theme seam. Implementations must not mutate anything;
/// contexts expose the graph read-only.
pub trait TemplateRenderer: Sync {
    fn render_page(&self, ctx: &PageContext) -> Result<String, BuildError>;
    fn render_section(&self, ctx: &SectionContext) -> Result<String, BuildError>;
    fn render_term(&self, ctx: &TermContext) -> Result<String, BuildError>;
    fn render_term_list(&self, ctx: &TermListContext) -> Result<String, BuildError>;
}

/// Built-in minimal theme. Presentation knobs come from the opaque
/// `[extra]` block: `nav` (array of `{ name, url }`), `footer`.
#[derive(Debug, Default)]
pub struct DefaultTheme {
    /// Hrefs of the compiled stylesheets to link in `<head>`. Only
    /// stylesheets the build actually ships are linked.
    stylesheets: Vec<String>,
}

impl DefaultTheme {
    pub fn new(stylesheets: Vec<String>) -> Self {
        Self { stylesheets }
    }
}

impl TemplateRenderer for DefaultTheme {
    fn render_page(&self, ctx: &PageContext) -> Result<String, BuildError> {
        let page = ctx.page;
        let mut body = String::new();
        body.push_str("<article>\n");
        let _ = writeln!(body, "<h1>{}</h1>", escape_text(&page.title));
        if let Some(date) = page.date {
            let _ = writeln!(
                body,
                "<time datetime=\"{0}\">{0}</time>",
                date.to_rfc3339()
            );
        }
        if page.toggles.outdated {
            body.push_str("<aside class=\"outdated\">This post may be outdated.</aside>\n");
        }
        body.push_str(&page.html);
        body.push_str("</article>\n");
        layout(&page.title, &body, ctx.config, &self.stylesheets)
    }

    fn render_section(&self, ctx: &SectionContext) -> Result<String, BuildError> {
        let name = ctx.section.display_name();
        let mut body = String::new();
        let _ = writeln!(body, "<h1>{}</h1>", escape_text(name));
        push_page_list(&mut body, &ctx.pages);
        layout(name, &body, ctx.config, &self.stylesheets)
    }

    fn render_term(&self, ctx: &TermContext) -> Result<String, BuildError> {
        let title = format!("{}: {}", ctx.taxonomy, ctx.term.name);
        let mut body = String::new();
        let _ = writeln!(body, "<h1>{}</h1>", escape_text(&title));
        push_page_list(&mut body, &ctx.pages);
        layout(&title, &body, ctx.config, &self.stylesheets)
    }

    fn render_term_list(&self, ctx: &TermListContext) -> Result<String, BuildError> {
        let mut body = String::new();
        let _ = writeln!(body, "<h1>{}</h1>", escape_text(ctx.taxonomy));
        body.push_str("<ul class=\"terms\">\n");
        for term in ctx.terms {
            let _ = writeln!(
                body,
                "<li><a href=\"{}\">{}</a> ({})</li>",
                escape_attr(&term.url(ctx.taxonomy, ctx.config)),
                escape_text(&term.name),
                term.pages.len()
            );
        }
        body.push_str("</ul>\n");
        layout(ctx.taxonomy, &body, ctx.config, &self.stylesheets)
    }
}

fn push_page_list(body: &mut String, pages: &[&Page]) {
    body.push_str("<ul class=\"pages\">\n");
    for page in pages {
        let date = page
            .date
            .map(|d| format!("<time>{}</time> ", d.to_rfc3339()))
            .unwrap_or_default();
        let _ = writeln!(
            body,
            "<li>{date}<a href=\"{}\">{}</a></li>",
            escape_attr(&page.url),
            escape_text(&page.title)
        );
    }
    body.push_str("</ul>\n");
}

/// Shared document shell: head, stylesheet links, nav, footer.
fn layout(
    title: &str,
    body: &str,
    config: &SiteConfig,
    stylesheets: &[String],
) -> Result<String, BuildError> {
    let site_title = &config.site.title;
    let full_title = if site_title.is_empty() || title == site_title.as_str() {
        title.to_string()
    } else {
        format!("{title} | {site_title}")
    };

    let mut out = String::with_capacity(body.len() + 512);
    out.push_str("<!doctype html>\n");
    let _ = writeln!(out, "<html lang=\"{}\">", escape_attr(&config.site.language));
    out.push_str("<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape_text(&full_title));
    for href in stylesheets {
        let _ = writeln!(out, "<link rel=\"stylesheet\" href=\"{}\">", escape_attr(href));
    }
    if config.markdown.highlight_code {
        out.push_str(
            "<link rel=\"stylesheet\" href=\"/css/highlight-light.css\" media=\"(prefers-color-scheme: light)\">\n\
             <link rel=\"stylesheet\" href=\"/css/highlight-dark.css\" media=\"(prefers-color-scheme: dark)\">\n",
        );
    }
    out.push_str("</head>\n<body>\n");

    out.push_str(&render_nav(config)?);
    out.push_str(body);

    if let Some(footer) = config.extra.get("footer").and_then(|v| v.as_str()) {
        let _ = writeln!(out, "<footer>{}</footer>", escape_text(footer));
    }
    out.push_str("</body>\n</html>\n");
    Ok(out)
}

/// Navigation from `[extra] nav = [{ name, url }]`. A nav entry missing
/// either key is a template error, not a silently dropped item.
fn render_nav(config: &SiteConfig) -> Result<String, BuildError> {
    let Some(entries) = config.extra.get("nav").and_then(|v| v.as_array()) else {
        return Ok(String::new());
    };

    let mut out = String::from("<nav><ul>\n");
    for entry in entries {
        let name = entry
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| BuildError::Template {
                template: "nav".to_string(),
                missing: "variable `name` in a nav entry".to_string(),
            })?;
        let url = entry
            .get("url")
            .and_then(|v| v.as_str())
            .ok_or_else(|| BuildError::Template {
                template: "nav".to_string(),
                missing: format!("variable `url` in nav entry `{name}`"),
            })?;
        let _ = writeln!(
            out,
            "<li><a href=\"{}\">{}</a></li>",
            escape_attr(url),
            escape_text(name)
        );
    }
    out.push_str("</ul></nav>\n");
    Ok(out)
}
