//! Asset pipeline: stylesheet compilation and output minification.
//!
//! Two independently togglable stages with a fixed order: compile,
//! then minify. The pipeline is pure over file contents; the
//! orchestrator does the writing.

pub mod css;
pub mod minify;

pub use css::{compile_css, minify_css};
pub use minify::minify_html;

use crate::config::SiteConfig;
use crate::error::BuildError;
use crate::log;
use crate::markdown::theme_css;
use anyhow::{Context, Result};
use jwalk::WalkDir;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// A processed asset ready to be written under the output root.
#[derive(Debug)]
pub struct CompiledAsset {
    /// Output path relative to the output root.
    pub path: PathBuf,
    pub content: String,
}

/// Process every stylesheet under the styles directory. A missing
/// directory is an empty site, not an error.
pub fn process_styles(config: &SiteConfig) -> Result<Vec<CompiledAsset>> {
    let styles_dir = config.styles_dir();
    if !styles_dir.is_dir() {
        return Ok(Vec::new());
    }

    let sources = collect_css_files(&styles_dir);
    let assets: Vec<CompiledAsset> = sources
        .par_iter()
        .map(|source| process_one(source, &styles_dir, config))
        .collect::<Result<_>>()?;

    log!("css"; "processed {} stylesheets", assets.len());
    Ok(assets)
}

fn process_one(source: &Path, styles_dir: &Path, config: &SiteConfig) -> Result<CompiledAsset> {
    let raw = fs::read_to_string(source)
        .with_context(|| format!("reading stylesheet {}", source.display()))?;

    let compiled = if config.build.compile_css {
        compile_css(source, &raw)?
    } else {
        raw
    };
    let content = if config.build.minify {
        minify_css(source, &compiled)?
    } else {
        compiled
    };

    let path = source
        .strip_prefix(styles_dir)
        .unwrap_or(source)
        .to_path_buf();
    Ok(CompiledAsset { path, content })
}

/// The precompiled light/dark syntax-highlighting stylesheets, when
/// highlighting is enabled.
pub fn highlight_styles(config: &SiteConfig) -> Result<Vec<CompiledAsset>, BuildError> {
    if !config.markdown.highlight_code {
        return Ok(Vec::new());
    }

    let pairs = [
        ("highlight-light.css", &config.markdown.highlight_theme_light),
        ("highlight-dark.css", &config.markdown.highlight_theme_dark),
    ];

    let mut assets = Vec::with_capacity(pairs.len());
    for (filename, theme) in pairs {
        let path = PathBuf::from(filename);
        let css = theme_css(theme).map_err(|err| BuildError::render(&path, err))?;
        let content = if config.build.minify {
            minify_css(&path, &css)?
        } else {
            css
        };
        assets.push(CompiledAsset { path, content });
    }
    Ok(assets)
}

fn collect_css_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "css"))
        .collect();
    files.sort();
    files
}
