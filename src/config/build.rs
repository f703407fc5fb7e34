//! `[build]` configuration: directories and asset pipeline toggles.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory holding markdown content, relative to the site root.
    pub content_dir: PathBuf,

    /// Output directory for the generated site.
    pub output_dir: PathBuf,

    /// Directory holding stylesheet sources.
    pub styles_dir: PathBuf,

    /// Compile stylesheets (parse, normalize, lower modern CSS).
    pub compile_css: bool,

    /// Minify emitted HTML and CSS. Runs after compilation.
    pub minify: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: "content".into(),
            output_dir: "public".into(),
            styles_dir: "styles".into(),
            compile_css: true,
            minify: false,
        }
    }
}
