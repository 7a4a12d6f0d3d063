//! Daily notification scheduling.
//!
//! # Responsibility
//! - Validate and parse the configured time of day.
//! - Decide when the daily notification is due.
//! - Deliver a random quote through a [`notify::Notifier`].

pub mod daily;
pub mod notify;
