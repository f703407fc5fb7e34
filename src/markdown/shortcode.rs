//! Block shortcode expansion.
//!
//! Shortcodes are expanded textually before markdown parsing, so their
//! bodies remain ordinary markdown:
//!
//! ```text
//! {% quote(author="Tony Hoare") %}
//! I call it my billion-dollar mistake.
//! {% end %}
//! ```
//!
//! Unknown shortcodes and unbalanced tags are hard errors; content is
//! never dropped silently. A literal `{%` is written `{%/**/`, so
//! shortcode syntax itself can be shown in prose or fenced code without
//! opening a block.

use crate::error::RenderError;
use crate::utils::html::escape_text;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

// Explicit ASCII classes; the regex build has no unicode tables.
static BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)\{%[ \t]*([A-Za-z0-9_]+)[ \t]*(?:\(([^)]*)\))?[ \t]*%\}(.*?)\{%[ \t]*end[ \t]*%\}",
    )
    .unwrap()
});

static ARG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([A-Za-z0-9_]+)[ \t]*=[ \t]*"([^"]*)""#).unwrap());

/// Escape form for a literal `{%`.
const ESCAPED_OPEN: &str = "{%/**/";

/// Expand all shortcode blocks in a markdown body.
pub fn expand(body: &str) -> Result<String, RenderError> {
    let mut out = String::with_capacity(body.len());
    let mut last_end = 0;

    for caps in BLOCK.captures_iter(body) {
        let whole = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or((0, 0));
        let name = &caps[1];
        let args = parse_args(caps.get(2).map_or("", |m| m.as_str()))?;
        let inner = caps[3].trim();

        out.push_str(&body[last_end..whole.0]);
        out.push_str(&render(name, &args, inner)?);
        last_end = whole.1;
    }
    out.push_str(&body[last_end..]);

    // Anything left that looks like a shortcode open tag had no
    // matching `{% end %}`. The escape form is exempt.
    let mut scan = 0;
    while let Some(found) = out[scan..].find("{%") {
        let pos = scan + found;
        if out[pos..].starts_with(ESCAPED_OPEN) {
            scan = pos + ESCAPED_OPEN.len();
            continue;
        }
        let fragment: String = out[pos..].chars().take(40).collect();
        return Err(RenderError::MalformedShortcode(format!(
            "unclosed shortcode near `{}`",
            fragment.trim()
        )));
    }

    Ok(out.replace(ESCAPED_OPEN, "{%"))
}

/// Parse `key="value"` argument pairs.
fn parse_args(raw: &str) -> Result<BTreeMap<String, String>, RenderError> {
    let mut args = BTreeMap::new();
    let mut rest = raw.to_string();
    for caps in ARG.captures_iter(raw) {
        args.insert(caps[1].to_string(), caps[2].to_string());
        rest = rest.replace(&caps[0], "");
    }
    // Only commas and whitespace may remain between pairs.
    if rest.chars().any(|c| c != ',' && !c.is_whitespace()) {
        return Err(RenderError::MalformedShortcode(format!(
            "unparseable shortcode arguments `{}`",
            raw.trim()
        )));
    }
    Ok(args)
}

/// Render one shortcode to its HTML wrapper. The body is emitted
/// between blank lines so it stays markdown to the downstream parser.
fn render(
    name: &str,
    args: &BTreeMap<String, String>,
    body: &str,
) -> Result<String, RenderError> {
    match name {
        "quote" => {
            let mut html = String::from("<blockquote class=\"quote\">\n\n");
            html.push_str(body);
            html.push('\n');
            if let Some(author) = args.get("author") {
                html.push_str(&format!("<cite>{}</cite>\n", escape_text(author)));
            }
            html.push_str("\n</blockquote>\n");
            Ok(html)
        }
        other => Err(RenderError::UnknownShortcode(other.to_string())),
    }
}
