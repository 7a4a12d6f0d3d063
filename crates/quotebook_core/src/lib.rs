//! Core domain logic for Quotebook.
//! Catalog lookup, favorites/history persistence and daily scheduling live
//! here; front ends only wire user actions to these types.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod service;
pub mod store;

pub use catalog::{builtin_catalog, load_catalog, CatalogError, CatalogResult};
pub use config::{AppConfig, ConfigError, ConfigResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::quote::{HistoryEntry, Quote, QuoteValidationError};
pub use repo::json_store::{Collection, CollectionStore, JsonFileStore, RepoError, RepoResult};
pub use schedule::daily::{DailyScheduler, DailyTime, ScheduleError};
pub use schedule::notify::{fire, Notification, Notifier, NotifyError};
pub use service::library_service::{LoadReport, UserLibrary, WriteOutcome, DEFAULT_HISTORY_LIMIT};
pub use store::quote_store::QuoteStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
