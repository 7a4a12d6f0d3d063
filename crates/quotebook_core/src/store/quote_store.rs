//! Catalog-backed quote store.
//!
//! # Invariants
//! - Catalog order is fixed at construction; search preserves it.
//! - Queries never fail: an empty catalog yields empty results.
//! - Selection is pure; recording a view is the caller's decision.

use crate::model::quote::Quote;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;

/// Read-only quote catalog with derived tag index.
#[derive(Debug, Clone, Default)]
pub struct QuoteStore {
    quotes: Vec<Quote>,
    tags: Vec<String>,
}

impl QuoteStore {
    pub fn new(quotes: Vec<Quote>) -> Self {
        let tags = quotes
            .iter()
            .map(|quote| quote.tag.to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        Self { quotes, tags }
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Sorted, deduplicated, lowercase tags.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn contains(&self, quote: &Quote) -> bool {
        self.quotes.contains(quote)
    }

    /// Picks one quote uniformly from the whole catalog.
    pub fn random_quote<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Quote> {
        self.quotes.choose(rng)
    }

    /// Picks one quote uniformly among those tagged `tag`.
    ///
    /// A blank tag means no filter. Tag comparison is case-insensitive.
    pub fn random_quote_tagged<R: Rng + ?Sized>(&self, tag: &str, rng: &mut R) -> Option<&Quote> {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() {
            return self.random_quote(rng);
        }
        let matching = self
            .quotes
            .iter()
            .filter(|quote| quote.tag.to_lowercase() == tag)
            .collect::<Vec<_>>();
        matching.choose(rng).copied()
    }

    /// Case-insensitive substring search over text, author and tag.
    ///
    /// Returns matches in catalog order. A blank query returns everything.
    pub fn search(&self, query: &str) -> Vec<&Quote> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.quotes.iter().collect();
        }
        self.quotes
            .iter()
            .filter(|quote| quote.matches_lowercase(&needle))
            .collect()
    }
}
