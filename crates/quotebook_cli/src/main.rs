//! Quotebook command-line front end.
//!
//! # Responsibility
//! - Build every core object once at startup and pass it to the controller.
//! - Translate process arguments into controller commands.
//! - Abort with a clear message on unrecoverable startup errors.

mod app;
mod command;

use app::App;
use command::Command;
use log::warn;
use quotebook_core::{
    builtin_catalog, init_logging, load_catalog, AppConfig, JsonFileStore, QuoteStore,
    UserLibrary,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("quotebook: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let command = Command::parse(std::env::args().skip(1))?;
    match command {
        Command::Help => {
            print!("{}", command::USAGE);
            return Ok(());
        }
        Command::Version => {
            println!("quotebook {}", quotebook_core::core_version());
            return Ok(());
        }
        _ => {}
    }

    let (config, config_error) = AppConfig::load();
    if let Some(err) = config_error {
        eprintln!("warning: {err}; using default settings");
    }

    let data_dir = config.resolve_data_dir()?;
    if let Err(err) = init_logging(&config.resolve_log_level(), data_dir.join("logs")) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let quotes = match &config.catalog_path {
        Some(path) => load_catalog(path)?,
        None => builtin_catalog()?,
    };
    let catalog = QuoteStore::new(quotes);

    let (mut library, report) =
        UserLibrary::load(JsonFileStore::new(&data_dir), config.history_limit);
    for (collection, err) in report.errors() {
        eprintln!("warning: {collection} could not be loaded and starts empty: {err}");
    }
    let orphans = library.prune_orphans(&catalog);
    if orphans > 0 {
        warn!("event=startup module=cli status=degraded orphans={orphans}");
        eprintln!("{}", orphan_notice(orphans));
    }

    let mut app = App::new(config, catalog, library, rand::thread_rng());
    app.execute(command)
}

fn orphan_notice(dropped: usize) -> String {
    format!(
        "warning: {dropped} saved quote(s) are no longer in the catalog and were dropped; \
         the next change rewrites favorites/history without them"
    )
}

#[cfg(test)]
mod tests {
    use super::orphan_notice;

    #[test]
    fn orphan_notice_names_the_count_and_consequence() {
        let notice = orphan_notice(3);
        assert!(notice.starts_with("warning: 3 saved quote(s)"));
        assert!(notice.contains("next change rewrites"));
    }
}
