//! Syntax highlighting for fenced code blocks.
//!
//! Highlighting emits class-annotated spans rather than inline styles,
//! so one highlighted body works under both the light and dark theme
//! stylesheets (emitted by [`theme_css`]). Each source line becomes a
//! self-contained `<span class="line">`, which keeps line numbers and
//! highlighted-line marks pure CSS concerns.

use super::fence::FenceSettings;
use crate::error::RenderError;
use crate::utils::html::escape_text;
use std::fmt::Write;
use syntect::html::{ClassStyle, css_for_theme_with_class_style, line_tokens_to_classed_spans};
use syntect::parsing::{ParseState, ScopeStack, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Code block highlighter. Built once per run; the syntax set load is
/// the expensive part.
#[derive(Debug)]
pub struct Highlighter {
    syntaxes: SyntaxSet,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
        }
    }

    /// Render one fenced code block to HTML.
    ///
    /// A bare fence is escaped verbatim; a language token must resolve
    /// to a known syntax or the block fails the build.
    pub fn render(&self, code: &str, settings: &FenceSettings) -> Result<String, RenderError> {
        let Some(language) = settings.language.as_deref() else {
            return Ok(self.render_plain(code, settings));
        };

        let syntax = self
            .syntaxes
            .find_syntax_by_token(language)
            .ok_or_else(|| RenderError::UnsupportedLanguage(language.to_string()))?;

        let mut html = block_open(Some(language), settings);
        let mut parse_state = ParseState::new(syntax);
        let mut scope_stack = ScopeStack::new();

        for (i, line) in LinesWithEndings::from(code).enumerate() {
            let line_no = settings.line_number_start + i;

            // Scopes still open from previous lines get reopened so
            // every line span is self-contained.
            let carried: Vec<String> = scope_stack
                .bottom_n(scope_stack.len())
                .iter()
                .map(|scope| scope.build_string().replace('.', " "))
                .collect();

            let ops = parse_state
                .parse_line(line, &self.syntaxes)
                .map_err(|err| RenderError::Highlight(err.to_string()))?;
            let (spans, delta) =
                line_tokens_to_classed_spans(line, &ops, ClassStyle::Spaced, &mut scope_stack)
                    .map_err(|err| RenderError::Highlight(err.to_string()))?;

            html.push_str(&line_open(line_no, settings));
            for class in &carried {
                let _ = write!(html, "<span class=\"{class}\">");
            }
            html.push_str(&spans);
            let open = carried.len() as isize + delta;
            for _ in 0..open.max(0) {
                html.push_str("</span>");
            }
            html.push_str("</span>");
        }

        html.push_str("</code></pre>\n");
        Ok(html)
    }

    /// Escape-only rendering for fences without a language token. Keeps
    /// the same per-line structure so gutters still work.
    fn render_plain(&self, code: &str, settings: &FenceSettings) -> String {
        let mut html = block_open(None, settings);
        for (i, line) in LinesWithEndings::from(code).enumerate() {
            let line_no = settings.line_number_start + i;
            html.push_str(&line_open(line_no, settings));
            html.push_str(&escape_text(line));
            html.push_str("</span>");
        }
        html.push_str("</code></pre>\n");
        html
    }
}

fn block_open(language: Option<&str>, settings: &FenceSettings) -> String {
    let mut classes = String::from("code");
    if settings.line_numbers {
        classes.push_str(" linenos");
    }
    match language {
        Some(lang) => format!(
            "<pre class=\"{classes}\" data-lang=\"{lang}\"><code class=\"language-{lang}\">"
        ),
        None => format!("<pre class=\"{classes}\"><code>"),
    }
}

fn line_open(line_no: usize, settings: &FenceSettings) -> String {
    let hl = if settings.is_highlighted(line_no) {
        " hl"
    } else {
        ""
    };
    if settings.line_numbers {
        format!("<span class=\"line{hl}\" data-line=\"{line_no}\">")
    } else {
        format!("<span class=\"line{hl}\">")
    }
}

/// CSS for one highlight theme, scoped to the classed spans emitted by
/// [`Highlighter::render`].
pub fn theme_css(theme_name: &str) -> Result<String, RenderError> {
    let themes = syntect::highlighting::ThemeSet::load_defaults();
    let theme = themes
        .themes
        .get(theme_name)
        .ok_or_else(|| RenderError::Highlight(format!("unknown highlight theme `{theme_name}`")))?;
    css_for_theme_with_class_style(theme, ClassStyle::Spaced)
        .map_err(|err| RenderError::Highlight(err.to_string()))
}
