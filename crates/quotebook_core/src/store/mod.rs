//! In-memory quote catalog and query entry points.
//!
//! # Responsibility
//! - Hold the static catalog for the lifetime of the process.
//! - Serve random selection and substring search.

pub mod quote_store;
