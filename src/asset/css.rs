//! Stylesheet compilation and minification with lightningcss.
//!
//! Compilation is a pure parse-and-reprint transform: it validates the
//! source, lowers modern syntax (nesting) and normalizes the output.
//! Minification is a separate stage over the compiled output.

use crate::error::BuildError;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use std::path::Path;

/// Compile a stylesheet source to normalized CSS.
pub fn compile_css(path: &Path, source: &str) -> Result<String, BuildError> {
    let mut stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|err| parse_error(path, &err))?;
    stylesheet
        .minify(MinifyOptions::default())
        .map_err(|err| minify_error(path, &err))?;
    let result = stylesheet
        .to_css(PrinterOptions::default())
        .map_err(|err| print_error(path, &err))?;
    Ok(result.code)
}

/// Minify already-compiled CSS.
pub fn minify_css(path: &Path, css: &str) -> Result<String, BuildError> {
    let stylesheet =
        StyleSheet::parse(css, ParserOptions::default()).map_err(|err| parse_error(path, &err))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|err| print_error(path, &err))?;
    Ok(result.code)
}

fn parse_error(
    path: &Path,
    err: &lightningcss::error::Error<lightningcss::error::ParserError<'_>>,
) -> BuildError {
    let (line, column) = err
        .loc
        .as_ref()
        // lightningcss lines are zero-based
        .map(|loc| (loc.line + 1, loc.column))
        .unwrap_or((0, 0));
    BuildError::Compile {
        path: path.to_path_buf(),
        line,
        column,
        reason: err.kind.to_string(),
    }
}

fn print_error(
    path: &Path,
    err: &lightningcss::error::Error<lightningcss::error::PrinterErrorKind>,
) -> BuildError {
    let (line, column) = err
        .loc
        .as_ref()
        .map(|loc| (loc.line + 1, loc.column))
        .unwrap_or((0, 0));
    BuildError::Compile {
        path: path.to_path_buf(),
        line,
        column,
        reason: err.kind.to_string(),
    }
}

fn minify_error(
    path: &Path,
    err: &lightningcss::error::Error<lightningcss::error::MinifyErrorKind>,
) -> BuildError {
    let (line, column) = err
        .loc
        .as_ref()
        .map(|loc| (loc.line + 1, loc.column))
        .unwrap_or((0, 0));
    BuildError::Compile {
        path: path.to_path_buf(),
        line,
        column,
        reason: err.kind.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn path() -> PathBuf {
        PathBuf::from("styles/main.css")
    }

    #[test]
    fn test_compile_valid_css() {
        let out = compile_css(&path(), "body { color: #ff0000; }").unwrap();
        assert!(out.contains("body"));
        assert!(out.contains("color"));
    }

    #[test]
    fn test_compile_error_carries_location() {
        let err = compile_css(&path(), "body {\n  color: }\n").unwrap_err();
        match err {
            BuildError::Compile { path, line, .. } => {
                assert_eq!(path, PathBuf::from("styles/main.css"));
                assert!(line >= 1);
            }
            other => panic!("expected Compile error, got {other}"),
        }
    }

    #[test]
    fn test_minify_reduces_bytes() {
        let css = "body {\n    color: #ff0000;\n    margin: 0px;\n}\n";
        let minified = minify_css(&path(), css).unwrap();
        assert!(minified.len() < css.len());
        assert!(!minified.contains('\n'));
    }

    #[test]
    fn test_compile_then_minify() {
        let compiled = compile_css(&path(), ".a { .b { color: red; } }").unwrap();
        let minified = minify_css(&path(), &compiled).unwrap();
        assert!(minified.contains(".a"));
        assert!(minified.contains(".b"));
    }
}
