//! Collection storage contract and JSON file implementation.
//!
//! # Responsibility
//! - Read and write the favorites and history lists as JSON arrays.
//! - Report transport and decoding failures with the offending path.
//!
//! # Invariants
//! - A missing file reads as an empty collection.
//! - A file that is not a JSON array is a decode error; a single bad record
//!   inside the array is skipped and logged.
//! - Writes go through a temporary sibling and a rename, so a failed write
//!   leaves the previous file intact.

use crate::model::quote::{HistoryEntry, Quote};
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const FAVORITES_FILE_NAME: &str = "favorites.json";
pub const HISTORY_FILE_NAME: &str = "history.json";

pub type RepoResult<T> = Result<T, RepoError>;

/// The two persisted user collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Favorites,
    History,
}

impl Collection {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Favorites => FAVORITES_FILE_NAME,
            Self::History => HISTORY_FILE_NAME,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::History => "history",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage error for collection reads and writes.
#[derive(Debug)]
pub enum RepoError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
    Encode(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::Decode { path, source } => {
                write!(f, "cannot decode `{}`: {source}", path.display())
            }
            Self::Encode(err) => write!(f, "cannot encode collection: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Storage interface for the user collections.
pub trait CollectionStore {
    fn read_favorites(&self) -> RepoResult<Vec<Quote>>;
    fn write_favorites(&self, favorites: &[Quote]) -> RepoResult<()>;
    fn read_history(&self) -> RepoResult<Vec<HistoryEntry>>;
    fn write_history(&self, history: &[HistoryEntry]) -> RepoResult<()>;
}

impl<S: CollectionStore + ?Sized> CollectionStore for &S {
    fn read_favorites(&self) -> RepoResult<Vec<Quote>> {
        (**self).read_favorites()
    }

    fn write_favorites(&self, favorites: &[Quote]) -> RepoResult<()> {
        (**self).write_favorites(favorites)
    }

    fn read_history(&self) -> RepoResult<Vec<HistoryEntry>> {
        (**self).read_history()
    }

    fn write_history(&self, history: &[HistoryEntry]) -> RepoResult<()> {
        (**self).write_history(history)
    }
}

/// JSON-file-backed collection store rooted at one data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Creates a store for `dir`. The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, collection: Collection) -> PathBuf {
        self.dir.join(collection.file_name())
    }

    fn read_list<T: DeserializeOwned>(&self, collection: Collection) -> RepoResult<Vec<T>> {
        let path = self.path_of(collection);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("event=collection_read module=repo status=missing collection={collection}");
                return Ok(Vec::new());
            }
            Err(source) => return Err(RepoError::Io { path, source }),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<serde_json::Value> = serde_json::from_str(&content)
            .map_err(|source| RepoError::Decode { path, source })?;
        let items = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value(record) {
                Ok(item) => Some(item),
                Err(err) => {
                    warn!(
                        "event=collection_read module=repo status=skip collection={} index={} error={}",
                        collection, index, err
                    );
                    None
                }
            })
            .collect();
        Ok(items)
    }

    fn write_list<T: Serialize>(&self, collection: Collection, items: &[T]) -> RepoResult<()> {
        let path = self.path_of(collection);
        let result = self.write_atomically(&path, items);
        match &result {
            Ok(()) => debug!(
                "event=collection_write module=repo status=ok collection={} items={}",
                collection,
                items.len()
            ),
            Err(err) => error!(
                "event=collection_write module=repo status=error collection={} error={}",
                collection, err
            ),
        }
        result
    }

    fn write_atomically<T: Serialize>(&self, path: &Path, items: &[T]) -> RepoResult<()> {
        fs::create_dir_all(&self.dir).map_err(|source| RepoError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let content = serde_json::to_string_pretty(items)?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, content).map_err(|source| RepoError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, path).map_err(|source| {
            let _ = fs::remove_file(&tmp_path);
            RepoError::Io {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}

impl CollectionStore for JsonFileStore {
    fn read_favorites(&self) -> RepoResult<Vec<Quote>> {
        self.read_list(Collection::Favorites)
    }

    fn write_favorites(&self, favorites: &[Quote]) -> RepoResult<()> {
        self.write_list(Collection::Favorites, favorites)
    }

    fn read_history(&self) -> RepoResult<Vec<HistoryEntry>> {
        self.read_list(Collection::History)
    }

    fn write_history(&self, history: &[HistoryEntry]) -> RepoResult<()> {
        self.write_list(Collection::History, history)
    }
}
