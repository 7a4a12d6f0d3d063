//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate collection storage into favorites/history use cases.
//! - Keep controller code decoupled from file and JSON details.

pub mod library_service;
