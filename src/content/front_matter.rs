//! Front-matter extraction and page metadata.
//!
//! Content files start with a TOML metadata block between `+++` fences,
//! followed by the markdown body:
//!
//! ```text
//! +++
//! title = "Hello"
//! date = "2024-07-11"
//! [taxonomies]
//! tags = ["rust"]
//! +++
//!
//! Body text...
//! ```

use crate::error::BuildError;
use crate::utils::date::DateTimeUtc;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::Path;

/// Page metadata from TOML front matter.
///
/// # Standard fields
///
/// | Field        | Type                      | Description                      |
/// |--------------|---------------------------|----------------------------------|
/// | `title`      | `String`                  | Page title (required)            |
/// | `date`       | string or TOML date       | Publish date (`YYYY-MM-DD` or RFC 3339) |
/// | `draft`      | `bool`                    | Excluded from aggregates         |
/// | `slug`       | `String`                  | Explicit slug override           |
/// | `summary`    | `String`                  | Explicit summary text            |
/// | `taxonomies` | table of `name = [terms]` | Taxonomy term assignments        |
///
/// Any other key is captured opaquely in `extra` so forward-compatible
/// additions never fail the parse.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PageMeta {
    pub title: Option<String>,
    #[serde(deserialize_with = "date_field")]
    pub date: Option<String>,
    pub draft: bool,
    /// Explicit slug override (skips path-derived slugging).
    pub slug: Option<String>,
    pub summary: Option<String>,
    /// Taxonomy name -> declared terms.
    pub taxonomies: BTreeMap<String, Vec<String>>,
    /// Additional user-defined fields, preserved as raw TOML values.
    #[serde(flatten)]
    pub extra: toml::Table,
}

/// `date` accepts both the quoted form (`date = "2024-07-11"`) and the
/// TOML-native datetime (`date = 2024-07-11`), normalized to a string
/// for [`DateTimeUtc::parse`].
fn date_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<toml::Value>::deserialize(deserializer)? {
        None => Ok(None),
        Some(toml::Value::String(s)) => Ok(Some(s)),
        Some(toml::Value::Datetime(dt)) => Ok(Some(dt.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "`date` must be a date string or a TOML date, got {}",
            other.type_str()
        ))),
    }
}

impl PageMeta {
    /// Parsed publish date. Always succeeds after [`parse`] validated it.
    pub fn parsed_date(&self) -> Option<DateTimeUtc> {
        self.date.as_deref().and_then(DateTimeUtc::parse)
    }
}

/// Split raw file content into validated metadata and the body.
///
/// Pure parse, no I/O; `path` is only used to attribute errors.
pub fn parse<'a>(path: &Path, content: &'a str) -> Result<(PageMeta, &'a str), BuildError> {
    let (raw_meta, body) = detect(path, content)?;

    let meta: PageMeta = toml::from_str(raw_meta)
        .map_err(|err| BuildError::metadata(path, format!("invalid TOML: {err}")))?;

    match &meta.title {
        Some(title) if !title.trim().is_empty() => {}
        _ => {
            return Err(BuildError::metadata(path, "missing required field `title`"));
        }
    }

    if let Some(date) = &meta.date
        && DateTimeUtc::parse(date).is_none()
    {
        return Err(BuildError::metadata(
            path,
            format!("date `{date}` is not a valid calendar date (expected YYYY-MM-DD or RFC 3339)"),
        ));
    }

    Ok((meta, body))
}

/// Locate the `+++` fenced metadata block.
fn detect<'a>(path: &Path, content: &'a str) -> Result<(&'a str, &'a str), BuildError> {
    let trimmed = content.trim_start();

    if trimmed.starts_with("---") {
        return Err(BuildError::metadata(
            path,
            "YAML front matter is not supported; use TOML between `+++` fences",
        ));
    }

    if let Some(rest) = trimmed.strip_prefix("+++") {
        if let Some(end) = rest.find("\n+++") {
            let raw = rest[..end].trim();
            let body = rest[end + 4..].trim_start_matches('\n');
            return Ok((raw, body));
        }
        return Err(BuildError::metadata(path, "unterminated `+++` fence"));
    }

    Err(BuildError::metadata(
        path,
        "missing front matter (`+++` block expected at the top of the file)",
    ))
}
