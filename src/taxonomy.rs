//! Taxonomy indexing.
//!
//! A single pass over the finished content graph buckets every
//! non-draft page under the terms it declares. Term strings are
//! slugified before bucketing so case and formatting variants of the
//! same term merge; the first-seen display string is kept for
//! presentation. A term exists only because at least one page
//! references it.

use crate::config::SiteConfig;
use crate::content::ContentGraph;
use crate::utils::slug::maybe_slugify;
use std::collections::BTreeMap;

/// One (taxonomy, term) bucket and the pages in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyTerm {
    /// Display string, from the first page that declared the term.
    pub name: String,
    /// Slugified form; bucket identity and URL segment.
    pub slug: String,
    /// Indices into the graph's page arena, date descending.
    pub pages: Vec<usize>,
}

impl TaxonomyTerm {
    /// Site-absolute index URL for this term.
    pub fn url(&self, taxonomy: &str, config: &SiteConfig) -> String {
        let taxonomy_slug = maybe_slugify(taxonomy, config.slugify.paths);
        format!("/{taxonomy_slug}/{}/", self.slug)
    }
}

/// Index every defined taxonomy over the graph.
///
/// Returns taxonomy name -> terms ordered lexicographically by slug.
/// Linear in pages times terms-per-page; the graph is scanned once.
pub fn index(
    graph: &ContentGraph,
    config: &SiteConfig,
) -> BTreeMap<String, Vec<TaxonomyTerm>> {
    // BTreeMap keyed by slug gives the lexicographic term order.
    let mut buckets: BTreeMap<&str, BTreeMap<String, TaxonomyTerm>> = config
        .taxonomies
        .iter()
        .map(|def| (def.name.as_str(), BTreeMap::new()))
        .collect();

    // Global date-descending order here makes every bucket come out
    // date descending without per-bucket sorts.
    for idx in graph.ordered_non_draft() {
        let page = &graph.pages[idx];
        for (taxonomy, terms) in &page.taxonomies {
            let Some(def) = config.taxonomy(taxonomy) else {
                // Pages with undeclared taxonomies never reach the
                // graph; parsing rejects them.
                continue;
            };
            let slugify = def.slugify_terms(config.slugify.taxonomies);
            let Some(bucket) = buckets.get_mut(taxonomy.as_str()) else {
                continue;
            };
            for term in terms {
                let slug = maybe_slugify(term, slugify);
                bucket
                    .entry(slug.clone())
                    .or_insert_with(|| TaxonomyTerm {
                        name: term.clone(),
                        slug,
                        pages: Vec::new(),
                    })
                    .pages
                    .push(idx);
            }
        }
    }

    buckets
        .into_iter()
        .map(|(name, terms)| (name.to_string(), terms.into_values().collect()))
        .collect()
}
