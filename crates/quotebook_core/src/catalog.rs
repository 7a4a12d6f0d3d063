//! Static quote catalog sources.
//!
//! # Responsibility
//! - Provide the built-in catalog embedded at compile time.
//! - Load an override catalog from a JSON file.
//!
//! # Invariants
//! - A catalog handed to callers is never empty.
//! - Invalid records are skipped and logged, not fatal.
//! - Duplicate `(text, author)` records keep the first occurrence.

use crate::model::quote::Quote;
use log::{info, warn};
use serde::Deserialize;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const BUILTIN_CATALOG_JSON: &str = include_str!("../data/quotes.json");

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Unrecoverable catalog errors. Callers abort startup on any of these.
#[derive(Debug)]
pub enum CatalogError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        origin: String,
        source: serde_json::Error,
    },
    Empty {
        origin: String,
    },
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read quote catalog `{}`: {source}", path.display())
            }
            Self::Parse { origin, source } => {
                write!(f, "quote catalog `{origin}` is not valid JSON: {source}")
            }
            Self::Empty { origin } => write!(f, "quote catalog `{origin}` contains no quotes"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Empty { .. } => None,
        }
    }
}

/// Wire record accepted in catalog files.
///
/// Also accepts the older `content` / `tags` spelling; the first tag wins.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogRecord {
    #[serde(alias = "content")]
    text: String,
    author: String,
    tag: Option<String>,
    tags: Vec<String>,
}

impl CatalogRecord {
    fn into_quote(self) -> Option<Quote> {
        let tag = self
            .tag
            .or_else(|| self.tags.into_iter().next())
            .unwrap_or_default();
        Quote::new(self.text, self.author, tag).ok()
    }
}

/// Returns the catalog compiled into the crate.
pub fn builtin_catalog() -> CatalogResult<Vec<Quote>> {
    parse_catalog(BUILTIN_CATALOG_JSON, "builtin")
}

/// Reads a catalog override file.
pub fn load_catalog(path: impl AsRef<Path>) -> CatalogResult<Vec<Quote>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&content, &path.display().to_string())
}

/// Decodes a JSON array of quote records.
pub fn parse_catalog(json: &str, origin: &str) -> CatalogResult<Vec<Quote>> {
    let records: Vec<CatalogRecord> =
        serde_json::from_str(json).map_err(|source| CatalogError::Parse {
            origin: origin.to_string(),
            source,
        })?;

    let total = records.len();
    let mut seen = HashSet::new();
    let mut quotes = Vec::with_capacity(total);
    for record in records {
        match record.into_quote() {
            Some(quote) => {
                if seen.insert(quote.clone()) {
                    quotes.push(quote);
                }
            }
            None => warn!("event=catalog_load module=catalog status=skip origin={origin} reason=empty_text"),
        }
    }

    if quotes.is_empty() {
        return Err(CatalogError::Empty {
            origin: origin.to_string(),
        });
    }

    info!(
        "event=catalog_load module=catalog status=ok origin={} records={} quotes={}",
        origin,
        total,
        quotes.len()
    );
    Ok(quotes)
}

#[cfg(test)]
mod tests {
    use super::{builtin_catalog, parse_catalog, CatalogError};

    #[test]
    fn builtin_catalog_is_not_empty() {
        let quotes = builtin_catalog().unwrap();
        assert!(quotes.len() >= 10);
        assert!(quotes.iter().all(|quote| !quote.tag.is_empty()));
    }

    #[test]
    fn parse_accepts_legacy_field_names() {
        let quotes = parse_catalog(
            r#"[{"content":"Be bold","author":"A","tags":["Courage","life"]}]"#,
            "test",
        )
        .unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].text, "Be bold");
        assert_eq!(quotes[0].tag, "courage");
    }

    #[test]
    fn parse_skips_blank_and_duplicate_records() {
        let quotes = parse_catalog(
            r#"[
                {"text":"Be bold","author":"A","tag":"courage"},
                {"text":"  ","author":"B"},
                {"text":"Be bold","author":"A","tag":"other"}
            ]"#,
            "test",
        )
        .unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].tag, "courage");
    }

    #[test]
    fn parse_rejects_empty_catalog() {
        let err = parse_catalog("[]", "test").unwrap_err();
        assert!(matches!(err, CatalogError::Empty { .. }));
        assert!(err.to_string().contains("no quotes"));
    }

    #[test]
    fn parse_rejects_invalid_json() {
        let err = parse_catalog("{not json", "test").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }
}
