//! Markdown rendering.
//!
//! `render` is a pure function of the body and the feature switches:
//! it never touches the filesystem or the content graph, so the
//! orchestrator can fan page rendering out across threads freely.
//!
//! Pipeline: shortcode expansion, commonmark parse, code fence
//! highlighting, heading anchors, external-link attributes, emoji.

pub mod fence;
pub mod highlight;
pub mod shortcode;

pub use fence::FenceSettings;
pub use highlight::{Highlighter, theme_css};

use crate::config::SiteConfig;
use crate::error::RenderError;
use crate::utils::slug::{AnchorSet, maybe_slugify};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};
use regex::Regex;
use std::sync::LazyLock;

/// Marks the end of the page summary within a body.
pub const MORE_MARKER: &str = "<!-- more -->";

static EMOJI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([a-zA-Z0-9_+-]+):").unwrap());

/// Feature switches plus the shared highlighter. Built once per run
/// from config and borrowed by every render worker.
#[derive(Debug)]
pub struct RenderOptions {
    pub highlight_code: bool,
    pub smart_punctuation: bool,
    pub render_emoji: bool,
    pub external_links_target_blank: bool,
    pub external_links_rel: String,
    pub slugify_anchors: bool,
    /// Links under the site's own base URL are not external.
    pub base_url: String,
    highlighter: Highlighter,
}

impl RenderOptions {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            highlight_code: config.markdown.highlight_code,
            smart_punctuation: config.markdown.smart_punctuation,
            render_emoji: config.markdown.render_emoji,
            external_links_target_blank: config.markdown.external_links_target_blank,
            external_links_rel: config.markdown.external_links_rel.clone(),
            slugify_anchors: config.slugify.anchors,
            base_url: config.site.base_url_trimmed().to_string(),
            highlighter: Highlighter::new(),
        }
    }
}

/// A rendered body plus the summary above its `<!-- more -->` marker,
/// if the body has one.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub html: String,
    pub summary: Option<String>,
}

/// Render a markdown body to HTML.
pub fn render(body: &str, opts: &RenderOptions) -> Result<Rendered, RenderError> {
    let expanded = shortcode::expand(body)?;

    let summary = match expanded.find(MORE_MARKER) {
        Some(idx) => Some(render_html(&expanded[..idx], opts)?),
        None => None,
    };
    let html = render_html(&expanded, opts)?;

    Ok(Rendered { html, summary })
}

fn render_html(markdown: &str, opts: &RenderOptions) -> Result<String, RenderError> {
    let mut options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES;
    if opts.smart_punctuation {
        options |= Options::ENABLE_SMART_PUNCTUATION;
    }

    let mut events = Vec::new();
    // (settings, accumulated code) while inside a fence
    let mut code_block: Option<(FenceSettings, String)> = None;

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let settings = match &kind {
                    CodeBlockKind::Fenced(info) => FenceSettings::parse(info),
                    CodeBlockKind::Indented => FenceSettings::default(),
                };
                code_block = Some((settings, String::new()));
            }
            Event::Text(text) if code_block.is_some() => {
                if let Some((_, buf)) = code_block.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((settings, code)) = code_block.take() {
                    let rendered = if opts.highlight_code {
                        opts.highlighter.render(&code, &settings)?
                    } else {
                        opts.highlighter
                            .render(&code, &FenceSettings { language: None, ..settings })?
                    };
                    events.push(Event::Html(CowStr::from(rendered)));
                }
            }
            Event::Text(text) if opts.render_emoji => {
                events.push(Event::Text(CowStr::from(replace_emoji(&text))));
            }
            other => events.push(other),
        }
    }

    assign_heading_anchors(&mut events, opts.slugify_anchors);
    if opts.external_links_target_blank || !opts.external_links_rel.is_empty() {
        rewrite_external_links(&mut events, opts);
    }

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    Ok(out)
}

/// Give every heading a document-unique `id`. Explicit `{#id}`
/// attributes are registered too so generated anchors never collide
/// with them.
fn assign_heading_anchors(events: &mut [Event], slugify: bool) {
    let mut anchors = AnchorSet::new();
    let mut i = 0;
    while i < events.len() {
        if let Event::Start(Tag::Heading { id, .. }) = &events[i] {
            if let Some(explicit) = id {
                let explicit = explicit.to_string();
                anchors.insert(&explicit);
                i += 1;
                continue;
            }

            let mut text = String::new();
            for event in events[i + 1..].iter() {
                match event {
                    Event::End(TagEnd::Heading(_)) => break,
                    Event::Text(t) | Event::Code(t) => text.push_str(t),
                    _ => {}
                }
            }
            let anchor = anchors.insert(&maybe_slugify(&text, slugify));
            if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
                *id = Some(CowStr::from(anchor));
            }
        }
        i += 1;
    }
}

/// Replace external link tags with raw anchors carrying the configured
/// `target` and `rel` attributes. Internal (site-relative) links are
/// left alone.
fn rewrite_external_links(events: &mut Vec<Event>, opts: &RenderOptions) {
    let mut depth = 0usize;
    for event in events.iter_mut() {
        match event {
            Event::Start(Tag::Link {
                dest_url, title, ..
            }) if is_external(dest_url, &opts.base_url) => {
                let mut anchor = format!(
                    "<a href=\"{}\"",
                    crate::utils::html::escape_attr(dest_url)
                );
                if !title.is_empty() {
                    anchor.push_str(&format!(
                        " title=\"{}\"",
                        crate::utils::html::escape_attr(title)
                    ));
                }
                if opts.external_links_target_blank {
                    anchor.push_str(" target=\"_blank\"");
                }
                if !opts.external_links_rel.is_empty() {
                    anchor.push_str(&format!(
                        " rel=\"{}\"",
                        crate::utils::html::escape_attr(&opts.external_links_rel)
                    ));
                }
                anchor.push('>');
                *event = Event::Html(CowStr::from(anchor));
                depth += 1;
            }
            Event::End(TagEnd::Link) if depth > 0 => {
                *event = Event::Html(CowStr::from("</a>".to_string()));
                depth -= 1;
            }
            _ => {}
        }
    }
}

fn is_external(url: &str, base_url: &str) -> bool {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return false;
    }
    base_url.is_empty() || !url.starts_with(base_url)
}

fn replace_emoji(text: &str) -> String {
    EMOJI
        .replace_all(text, |caps: &regex::Captures| {
            match emojis::get_by_shortcode(&caps[1]) {
                Some(emoji) => emoji.as_str().to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    fn opts() -> RenderOptions {
        RenderOptions::from_config(&test_parse_config(""))
    }

    fn opts_with(config: &str) -> RenderOptions {
        RenderOptions::from_config(&test_parse_config(config))
    }

    #[test]
    fn test_basic_paragraph() {
        let out = render("Hello *world*.", &opts()).unwrap();
        assert_eq!(out.html.trim(), "<p>Hello <em>world</em>.</p>");
        assert!(out.summary.is_none());
    }

    #[test]
    fn test_heading_anchors() {
        let out = render("# It's All About Memory\n\n## Intro\n\n## Intro", &opts()).unwrap();
        assert!(out.html.contains("id=\"its-all-about-memory\""));
        assert!(out.html.contains("id=\"intro\""));
        assert!(out.html.contains("id=\"intro-2\""));
    }

    #[test]
    fn test_anchor_slugify_disabled() {
        let out = render("# Hello World", &opts_with("[slugify]\nanchors = false")).unwrap();
        assert!(out.html.contains("id=\"Hello World\""));
    }

    #[test]
    fn test_code_fence_highlighted() {
        let out = render("```rust\nfn main() {}\n```", &opts()).unwrap();
        assert!(out.html.contains("data-lang=\"rust\""));
        assert!(out.html.contains("<span class=\"line\">"));
    }

    #[test]
    fn test_unsupported_language_fails() {
        let err = render("```klingon_xyz\nx\n```", &opts()).unwrap_err();
        assert_eq!(err, RenderError::UnsupportedLanguage("klingon_xyz".into()));
    }

    #[test]
    fn test_highlight_disabled_escapes_only() {
        let out = render(
            "```klingon_xyz\n<x>\n```",
            &opts_with("[markdown]\nhighlight_code = false"),
        )
        .unwrap();
        assert!(out.html.contains("&lt;x&gt;"));
    }

    #[test]
    fn test_summary_split() {
        let out = render("Intro.\n\n<!-- more -->\n\nRest.", &opts()).unwrap();
        let summary = out.summary.unwrap();
        assert!(summary.contains("Intro."));
        assert!(!summary.contains("Rest."));
        assert!(out.html.contains("Rest."));
    }

    #[test]
    fn test_smart_punctuation_switch() {
        let body = "\"quoted\" -- dash";
        let plain = render(body, &opts()).unwrap();
        assert!(plain.html.contains("&quot;quoted&quot;"));

        let smart = render(body, &opts_with("[markdown]\nsmart_punctuation = true")).unwrap();
        assert!(smart.html.contains("\u{201c}quoted\u{201d}"));
        assert!(smart.html.contains("\u{2013}"));
    }

    #[test]
    fn test_emoji_switch() {
        let body = "ship it :rocket:";
        let plain = render(body, &opts()).unwrap();
        assert!(plain.html.contains(":rocket:"));

        let emoji = render(body, &opts_with("[markdown]\nrender_emoji = true")).unwrap();
        assert!(emoji.html.contains("\u{1f680}"));
    }

    #[test]
    fn test_unknown_emoji_left_alone() {
        let out = render(
            ":definitely_not_an_emoji_xyz:",
            &opts_with("[markdown]\nrender_emoji = true"),
        )
        .unwrap();
        assert!(out.html.contains(":definitely_not_an_emoji_xyz:"));
    }

    #[test]
    fn test_external_link_attributes() {
        let body = "[out](https://example.com) and [in](/about/)";
        let out = render(
            body,
            &opts_with(
                "[markdown]\nexternal_links_target_blank = true\nexternal_links_rel = \"noopener\"",
            ),
        )
        .unwrap();
        assert!(out.html.contains("target=\"_blank\""));
        assert!(out.html.contains("rel=\"noopener\""));
        // Internal link untouched
        assert!(out.html.contains("<a href=\"/about/\">in</a>"));
    }

    #[test]
    fn test_own_base_url_not_external() {
        let out = render(
            "[self](https://example.com/about/) [other](https://other.org/)",
            &opts_with(
                "[site]\nbase_url = \"https://example.com\"\n\n\
                 [markdown]\nexternal_links_target_blank = true",
            ),
        )
        .unwrap();
        assert!(out.html.contains("<a href=\"https://example.com/about/\">self</a>"));
        assert!(out.html.contains("https://other.org/\" target=\"_blank\""));
    }

    #[test]
    fn test_external_links_off_by_default() {
        let out = render("[out](https://example.com)", &opts()).unwrap();
        assert!(!out.html.contains("target="));
    }

    #[test]
    fn test_quote_shortcode_end_to_end() {
        let body = "{% quote(author=\"Hoare\") %}\nA *billion* dollars.\n{% end %}";
        let out = render(body, &opts()).unwrap();
        assert!(out.html.contains("<blockquote class=\"quote\">"));
        assert!(out.html.contains("<em>billion</em>"));
        assert!(out.html.contains("<cite>Hoare</cite>"));
    }

    #[test]
    fn test_unknown_shortcode_propagates() {
        let err = render("{% nope %}x{% end %}", &opts()).unwrap_err();
        assert_eq!(err, RenderError::UnknownShortcode("nope".into()));
    }
}
