//! HTML minification.
//!
//! The transform must be semantically invariant: tag structure and
//! visible text parse identically before and after, so the config keeps
//! closing tags and the doctype in place.

use crate::error::BuildError;
use std::path::Path;

/// Minify a rendered HTML document.
pub fn minify_html(path: &Path, html: &str) -> Result<String, BuildError> {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.remove_bangs = true;
    cfg.remove_processing_instructions = true;

    let minified = minify_html::minify(html.as_bytes(), &cfg);
    String::from_utf8(minified).map_err(|err| BuildError::Minify {
        path: path.to_path_buf(),
        reason: format!("minified output is not valid UTF-8: {err}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn path() -> PathBuf {
        PathBuf::from("public/index.html")
    }

    /// Strips inter-tag whitespace so pre- and post-minify markup can
    /// be compared structurally.
    fn structure(html: &str) -> String {
        let mut out = String::new();
        let mut last_was_tag_end = false;
        for ch in html.chars() {
            match ch {
                '>' => {
                    out.push(ch);
                    last_was_tag_end = true;
                }
                c if c.is_whitespace() && last_was_tag_end => {}
                c => {
                    out.push(c);
                    last_was_tag_end = false;
                }
            }
        }
        out
    }

    #[test]
    fn test_minify_reduces_bytes() {
        let html = "<html>\n  <head>\n    <title>t</title>\n  </head>\n  <body>\n    <p>hello</p>\n  </body>\n</html>\n";
        let minified = minify_html(&path(), html).unwrap();
        assert!(minified.len() < html.len());
    }

    #[test]
    fn test_structure_preserved() {
        let html = "<!doctype html><html><head><title>t</title></head><body>\n  <h1 id=\"a\">Title</h1>\n  <p>visible <em>text</em> stays</p>\n</body></html>";
        let minified = minify_html(&path(), html).unwrap();
        assert_eq!(structure(&minified), structure(html));
    }

    #[test]
    fn test_closing_tags_kept() {
        let html = "<html><body><p>one</p><p>two</p></body></html>";
        let minified = minify_html(&path(), html).unwrap();
        assert!(minified.contains("</p>"));
    }

    #[test]
    fn test_comments_removed() {
        let html = "<html><body><!-- gone --><p>kept</p></body></html>";
        let minified = minify_html(&path(), html).unwrap();
        assert!(!minified.contains("gone"));
        assert!(minified.contains("kept"));
    }
}
