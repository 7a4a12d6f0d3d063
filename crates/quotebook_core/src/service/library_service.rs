//! Favorites and history use-case service.
//!
//! # Responsibility
//! - Own the in-memory favorites and history for one session.
//! - Persist every mutation immediately through a [`CollectionStore`].
//!
//! # Invariants
//! - Favorites never contain two quotes equal by `(text, author)`.
//! - History keeps at most `history_limit` entries, dropping the oldest.
//! - In-memory state is authoritative: a failed write is returned as a
//!   warning and never rolls the mutation back.

use crate::model::quote::{HistoryEntry, Quote};
use crate::repo::json_store::{Collection, CollectionStore, RepoError, RepoResult};
use crate::store::quote_store::QuoteStore;
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Default number of history entries kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 500;

/// Per-collection result of [`UserLibrary::load`].
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Set when the favorites file existed but could not be read or decoded.
    pub favorites_error: Option<RepoError>,
    /// Set when the history file existed but could not be read or decoded.
    pub history_error: Option<RepoError>,
    /// Duplicate favorites dropped while loading.
    pub duplicate_favorites: usize,
    /// Oldest history entries dropped to honor the limit.
    pub trimmed_history: usize,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.favorites_error.is_none() && self.history_error.is_none()
    }

    /// Returns `(collection, error)` pairs for every failed collection.
    pub fn errors(&self) -> Vec<(Collection, &RepoError)> {
        let mut errors = Vec::new();
        if let Some(err) = &self.favorites_error {
            errors.push((Collection::Favorites, err));
        }
        if let Some(err) = &self.history_error {
            errors.push((Collection::History, err));
        }
        errors
    }
}

/// Result of a mutating call.
#[derive(Debug)]
#[must_use]
pub struct WriteOutcome {
    /// Whether the in-memory collection changed.
    pub changed: bool,
    /// Non-fatal persistence failure, if the write was attempted and failed.
    pub warning: Option<RepoError>,
}

impl WriteOutcome {
    fn unchanged() -> Self {
        Self {
            changed: false,
            warning: None,
        }
    }

    fn persisted(result: RepoResult<()>) -> Self {
        Self {
            changed: true,
            warning: result.err(),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.warning.is_none()
    }
}

/// Session-scoped favorites and history backed by a collection store.
pub struct UserLibrary<S: CollectionStore> {
    store: S,
    favorites: Vec<Quote>,
    history: Vec<HistoryEntry>,
    history_limit: usize,
}

impl<S: CollectionStore> UserLibrary<S> {
    /// Creates an empty library without touching storage.
    pub fn empty(store: S, history_limit: usize) -> Self {
        Self {
            store,
            favorites: Vec::new(),
            history: Vec::new(),
            history_limit: history_limit.max(1),
        }
    }

    /// Loads both collections independently.
    ///
    /// A collection that cannot be read or decoded starts empty; the failure
    /// is logged and recorded in the returned report.
    pub fn load(store: S, history_limit: usize) -> (Self, LoadReport) {
        let mut library = Self::empty(store, history_limit);
        let mut report = LoadReport::default();

        match library.store.read_favorites() {
            Ok(favorites) => {
                let loaded = favorites.len();
                library.favorites = dedup_preserving_order(favorites);
                report.duplicate_favorites = loaded - library.favorites.len();
            }
            Err(err) => {
                warn!("event=library_load module=service status=degraded collection=favorites error={err}");
                report.favorites_error = Some(err);
            }
        }

        match library.store.read_history() {
            Ok(history) => {
                library.history = history;
                report.trimmed_history = library.enforce_history_limit();
            }
            Err(err) => {
                warn!("event=library_load module=service status=degraded collection=history error={err}");
                report.history_error = Some(err);
            }
        }

        info!(
            "event=library_load module=service status=ok favorites={} history={}",
            library.favorites.len(),
            library.history.len()
        );
        (library, report)
    }

    pub fn favorites(&self) -> &[Quote] {
        &self.favorites
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub fn is_favorite(&self, quote: &Quote) -> bool {
        self.favorites.contains(quote)
    }

    /// Adds `quote` unless an equal quote is already a favorite.
    pub fn add_favorite(&mut self, quote: &Quote) -> WriteOutcome {
        if self.is_favorite(quote) {
            return WriteOutcome::unchanged();
        }
        self.favorites.push(quote.clone());
        WriteOutcome::persisted(self.store.write_favorites(&self.favorites))
    }

    /// Removes `quote` by value-equality. Absent quotes are a no-op.
    pub fn remove_favorite(&mut self, quote: &Quote) -> WriteOutcome {
        let before = self.favorites.len();
        self.favorites.retain(|favorite| favorite != quote);
        if self.favorites.len() == before {
            return WriteOutcome::unchanged();
        }
        WriteOutcome::persisted(self.store.write_favorites(&self.favorites))
    }

    /// Records a view of `quote` stamped with the current time.
    pub fn append_history(&mut self, quote: &Quote) -> WriteOutcome {
        self.append_history_at(quote, Some(Utc::now()))
    }

    /// Records a view of `quote` with an explicit timestamp.
    pub fn append_history_at(
        &mut self,
        quote: &Quote,
        viewed_at: Option<DateTime<Utc>>,
    ) -> WriteOutcome {
        self.history.push(HistoryEntry::new(quote.clone(), viewed_at));
        self.enforce_history_limit();
        WriteOutcome::persisted(self.store.write_history(&self.history))
    }

    pub fn clear_history(&mut self) -> WriteOutcome {
        if self.history.is_empty() {
            return WriteOutcome::unchanged();
        }
        self.history.clear();
        WriteOutcome::persisted(self.store.write_history(&self.history))
    }

    /// Drops favorites and history entries whose quote is not in `catalog`.
    ///
    /// Only the in-memory lists change; files are rewritten on the next
    /// mutation. Returns the number of entries dropped.
    pub fn prune_orphans(&mut self, catalog: &QuoteStore) -> usize {
        let known = catalog.quotes().iter().collect::<HashSet<_>>();
        let before = self.favorites.len() + self.history.len();
        self.favorites.retain(|quote| known.contains(quote));
        self.history.retain(|entry| known.contains(&entry.quote));
        let dropped = before - (self.favorites.len() + self.history.len());
        if dropped > 0 {
            warn!("event=orphans_pruned module=service status=ok dropped={dropped}");
        }
        dropped
    }

    /// Writes favorites as `"text" - author` lines. Returns the line count.
    pub fn export_favorites(&self, path: impl AsRef<Path>) -> RepoResult<usize> {
        let path = path.as_ref();
        let mut content = String::new();
        for quote in &self.favorites {
            content.push_str(&quote.attributed());
            content.push('\n');
        }
        fs::write(path, content).map_err(|source| RepoError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            "event=favorites_export module=service status=ok count={}",
            self.favorites.len()
        );
        Ok(self.favorites.len())
    }

    fn enforce_history_limit(&mut self) -> usize {
        let excess = self.history.len().saturating_sub(self.history_limit);
        if excess > 0 {
            self.history.drain(..excess);
        }
        excess
    }
}

fn dedup_preserving_order(quotes: Vec<Quote>) -> Vec<Quote> {
    let mut seen = HashSet::new();
    quotes
        .into_iter()
        .filter(|quote| seen.insert(quote.clone()))
        .collect()
}
