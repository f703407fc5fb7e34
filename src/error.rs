//! Build error taxonomy.
//!
//! Content-level errors carry the offending source path so diagnostics
//! point the operator at a file. All errors are hard failures: a build
//! never publishes a partially valid site.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced while rendering a markdown body to HTML.
///
/// These are attributed to their source file by [`BuildError::Render`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// A shortcode block names a shortcode kiln does not know.
    /// Content is never dropped silently.
    #[error("unknown shortcode `{0}`")]
    UnknownShortcode(String),

    /// A shortcode opening tag without a matching `{% end %}`, or
    /// unparseable shortcode arguments.
    #[error("malformed shortcode: {0}")]
    MalformedShortcode(String),

    /// A fenced code block requests a language the highlighter has no
    /// syntax definition for (only when highlighting is enabled).
    #[error("unsupported highlighting language `{0}`")]
    UnsupportedLanguage(String),

    /// Syntax highlighting itself failed.
    #[error("syntax highlighting failed: {0}")]
    Highlight(String),
}

/// Hard build failures.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Front matter is missing, not valid TOML, lacks a title, or
    /// declares an unparseable date.
    #[error("{path}: malformed front matter: {reason}")]
    MalformedMetadata { path: PathBuf, reason: String },

    /// A markdown body failed to render, attributed to its file.
    #[error("{path}: {source}")]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },

    /// Two pages computed the same output URL.
    #[error("duplicate URL `{url}`: `{first}` and `{second}` resolve to the same output path")]
    DuplicateUrl {
        url: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// A stylesheet failed to compile, with source location.
    #[error("{path}:{line}:{column}: CSS compile error: {reason}")]
    Compile {
        path: PathBuf,
        line: u32,
        column: u32,
        reason: String,
    },

    /// A minification stage failed.
    #[error("{path}: minify error: {reason}")]
    Minify { path: PathBuf, reason: String },

    /// The template renderer could not resolve a variable or template.
    #[error("template `{template}`: missing {missing}")]
    Template { template: String, missing: String },
}

impl BuildError {
    /// Attach a source path to a render error.
    pub fn render(path: impl Into<PathBuf>, source: RenderError) -> Self {
        Self::Render {
            path: path.into(),
            source,
        }
    }

    /// Front matter failure for a file, with a human-readable reason.
    pub fn metadata(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedMetadata {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
