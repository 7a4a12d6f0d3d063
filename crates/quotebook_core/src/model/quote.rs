//! Quote domain model.
//!
//! # Responsibility
//! - Define the immutable `(text, author, tag)` record.
//! - Provide the tolerant wire shape used by catalog and user data files.
//!
//! # Invariants
//! - Equality and hashing consider only `text` and `author`.
//! - `text` is never blank for a validated quote.
//! - Unknown wire fields are ignored; missing ones decode as empty strings.
//! - An unreadable `viewed_at` decodes as `None` instead of failing the record.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// Author used when a record carries no attribution.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Validation errors for quote records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteValidationError {
    EmptyText,
}

impl Display for QuoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "quote text cannot be empty"),
        }
    }
}

impl Error for QuoteValidationError {}

/// Canonical quote record.
///
/// Serialized as `{ "text", "author", "tag" }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Quote {
    pub text: String,
    pub author: String,
    /// Single lowercase category, e.g. `courage`.
    pub tag: String,
}

impl Quote {
    /// Creates a quote, trimming all fields.
    ///
    /// A blank author becomes [`UNKNOWN_AUTHOR`]; the tag is lowercased.
    pub fn new(
        text: impl Into<String>,
        author: impl Into<String>,
        tag: impl Into<String>,
    ) -> Result<Self, QuoteValidationError> {
        let author = author.into();
        let author = author.trim();
        let quote = Self {
            text: text.into().trim().to_string(),
            author: if author.is_empty() {
                UNKNOWN_AUTHOR.to_string()
            } else {
                author.to_string()
            },
            tag: tag.into().trim().to_lowercase(),
        };
        quote.validate()?;
        Ok(quote)
    }

    pub fn validate(&self) -> Result<(), QuoteValidationError> {
        if self.text.trim().is_empty() {
            return Err(QuoteValidationError::EmptyText);
        }
        Ok(())
    }

    /// Returns whether `needle` (already lowercased) occurs in text, author or tag.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.text.to_lowercase().contains(needle)
            || self.author.to_lowercase().contains(needle)
            || self.tag.to_lowercase().contains(needle)
    }

    /// One-line rendering: `"text" - author`.
    pub fn attributed(&self) -> String {
        format!("\"{}\" - {}", self.text, self.author)
    }
}

impl PartialEq for Quote {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.author == other.author
    }
}

impl Eq for Quote {}

impl Hash for Quote {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
        self.author.hash(state);
    }
}

impl Display for Quote {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.attributed())
    }
}

/// One viewed quote in the history log.
///
/// Serialized flat: the quote fields plus an optional RFC 3339 `viewed_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub quote: Quote,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub viewed_at: Option<DateTime<Utc>>,
}

impl HistoryEntry {
    pub fn new(quote: Quote, viewed_at: Option<DateTime<Utc>>) -> Self {
        Self { quote, viewed_at }
    }
}

/// Accepts RFC 3339, naive ISO-8601 (read as local time) or epoch millis.
/// Anything else becomes `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_i64().and_then(DateTime::from_timestamp_millis),
        Some(Value::String(text)) => parse_timestamp(&text),
        _ => None,
    })
}

pub(crate) fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|at| at.with_timezone(&Utc))
}
