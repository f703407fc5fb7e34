//! URL slugification.
//!
//! `slugify` is the single normalization primitive behind page paths,
//! taxonomy terms and heading anchors. It is pure and total: the same
//! input always yields the same slug, and no input makes it fail.

use deunicode::deunicode;
use rustc_hash::FxHashSet;

/// Slugify a raw string: transliterate Unicode to ASCII, lowercase,
/// collapse runs of non-alphanumeric characters into a single `-`, and
/// trim leading/trailing separators. Apostrophes are removed outright
/// so "it's" becomes "its", not "it-s".
///
/// Empty input yields an empty string; callers fall back to an index
/// name in that case.
pub fn slugify(raw: &str) -> String {
    let transliterated = deunicode(raw);
    let mut slug = String::with_capacity(transliterated.len());
    let mut pending_sep = false;

    for ch in transliterated.chars() {
        if ch == '\'' {
            continue;
        }
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }

    slug
}

/// Slugify under a config switch. A disabled switch is the identity
/// transform.
pub fn maybe_slugify(raw: &str, enabled: bool) -> String {
    if enabled {
        slugify(raw)
    } else {
        raw.to_string()
    }
}

/// Per-document anchor registry.
///
/// Guarantees unique heading anchors within one rendered document:
/// the first occurrence keeps its slug, later collisions get `-2`,
/// `-3`, ... suffixes in first-seen order.
#[derive(Debug, Default)]
pub struct AnchorSet {
    seen: FxHashSet<String>,
}

impl AnchorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an anchor, returning the unique form to emit.
    pub fn insert(&mut self, anchor: &str) -> String {
        if self.seen.insert(anchor.to_string()) {
            return anchor.to_string();
        }
        let mut n = 2;
        loop {
            let candidate = format!("{anchor}-{n}");
            if self.seen.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  spaced  out  "), "spaced-out");
    }

    #[test]
    fn test_slugify_apostrophe() {
        assert_eq!(slugify("It's all about memory"), "its-all-about-memory");
    }

    #[test]
    fn test_slugify_unicode() {
        assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("a --- b"), "a-b");
        assert_eq!(slugify("!!leading and trailing!!"), "leading-and-trailing");
    }

    #[test]
    fn test_slugify_empty_and_symbols() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_idempotent() {
        for input in ["Hello World", "It's all about memory", "a --- b", "日本語"] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_maybe_slugify_disabled_is_identity() {
        assert_eq!(maybe_slugify("Hello World", false), "Hello World");
        assert_eq!(maybe_slugify("Hello World", true), "hello-world");
    }

    #[test]
    fn test_anchor_dedup() {
        let mut anchors = AnchorSet::new();
        assert_eq!(anchors.insert("intro"), "intro");
        assert_eq!(anchors.insert("intro"), "intro-2");
        assert_eq!(anchors.insert("intro"), "intro-3");
        assert_eq!(anchors.insert("other"), "other");
    }

    #[test]
    fn test_anchor_dedup_explicit_collision() {
        let mut anchors = AnchorSet::new();
        assert_eq!(anchors.insert("intro-2"), "intro-2");
        assert_eq!(anchors.insert("intro"), "intro");
        // "intro-2" is taken, skip to -3
        assert_eq!(anchors.insert("intro"), "intro-3");
    }
}
