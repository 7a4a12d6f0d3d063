//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage contract for the favorites and history collections.
//! - Isolate file and JSON details from service orchestration.
//!
//! # Invariants
//! - Each collection lives in its own file; one failing never affects the other.
//! - Writes replace a whole collection; there is no partial update.

pub mod json_store;
