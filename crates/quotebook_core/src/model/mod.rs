//! Domain model for quotes and user collections.
//!
//! # Responsibility
//! - Define the canonical quote record shared by catalog, search and storage.
//! - Define the history entry shape persisted by the repository layer.
//!
//! # Invariants
//! - Quote identity is `(text, author)`; `tag` is descriptive only.
//! - Quotes are never mutated after construction.

pub mod quote;
