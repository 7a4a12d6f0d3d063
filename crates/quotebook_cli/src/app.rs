//! Command controller.
//!
//! Owns the catalog, the user library and the settings for one run and
//! maps each [`Command`] onto core operations. Nothing here is global: the
//! binary builds every dependency and hands it to [`App::new`].

use crate::command::Command;
use chrono::{Local, NaiveDateTime};
use log::info;
use quotebook_core::{
    fire, AppConfig, CollectionStore, ConfigError, DailyScheduler, DailyTime, Notification,
    Notifier, NotifyError, QuoteStore, UserLibrary, WriteOutcome,
};
use rand::Rng;
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

const WATCH_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Prints notifications to the terminal and rings the bell.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "\x07[{}] {}", notification.title, notification.body)
            .and_then(|()| stdout.flush())
            .map_err(|err| NotifyError::Delivery(err.to_string()))
    }
}

pub struct App<S: CollectionStore, R: Rng, W: Write> {
    config: AppConfig,
    config_path: Option<PathBuf>,
    catalog: QuoteStore,
    library: UserLibrary<S>,
    rng: R,
    out: W,
}

impl<S: CollectionStore, R: Rng> App<S, R, io::Stdout> {
    pub fn new(config: AppConfig, catalog: QuoteStore, library: UserLibrary<S>, rng: R) -> Self {
        Self::with_output(
            config,
            AppConfig::config_path(),
            catalog,
            library,
            rng,
            io::stdout(),
        )
    }
}

impl<S: CollectionStore, R: Rng, W: Write> App<S, R, W> {
    pub fn with_output(
        config: AppConfig,
        config_path: Option<PathBuf>,
        catalog: QuoteStore,
        library: UserLibrary<S>,
        rng: R,
        out: W,
    ) -> Self {
        Self {
            config,
            config_path,
            catalog,
            library,
            rng,
            out,
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<(), Box<dyn Error>> {
        match command {
            Command::Random { tag } => self.show_random(tag.as_deref()),
            Command::Search { query } => self.search(&query),
            Command::Tags => self.list_tags(),
            Command::FavoriteAdd { query } => self.add_favorite(&query),
            Command::FavoriteRemove { query } => self.remove_favorite(&query),
            Command::FavoriteList => self.list_favorites(),
            Command::FavoriteExport { path } => {
                let count = self.library.export_favorites(&path)?;
                writeln!(self.out, "Exported {count} favorites to {}", path.display())?;
                Ok(())
            }
            Command::History { clear } => self.history(clear),
            Command::NotifyTime { value } => self.set_notify_time(&value),
            Command::Watch => self.watch(),
            Command::Help | Command::Version => Ok(()),
        }
    }

    fn show_random(&mut self, tag: Option<&str>) -> Result<(), Box<dyn Error>> {
        let picked = match tag {
            Some(tag) => self.catalog.random_quote_tagged(tag, &mut self.rng),
            None => self.catalog.random_quote(&mut self.rng),
        };
        let Some(quote) = picked.cloned() else {
            writeln!(self.out, "No quotes found for that category.")?;
            return Ok(());
        };

        writeln!(self.out, "\"{}\"\n\n- {}", quote.text, quote.author)?;
        let outcome = self.library.append_history(&quote);
        self.report(outcome)
    }

    fn search(&mut self, query: &str) -> Result<(), Box<dyn Error>> {
        let results = self.catalog.search(query);
        if results.is_empty() {
            writeln!(self.out, "No results found.")?;
            return Ok(());
        }
        for quote in results {
            writeln!(self.out, "\"{}\"\n- {}\n", quote.text, quote.author)?;
        }
        Ok(())
    }

    fn list_tags(&mut self) -> Result<(), Box<dyn Error>> {
        for tag in self.catalog.tags() {
            writeln!(self.out, "{tag}")?;
        }
        Ok(())
    }

    fn add_favorite(&mut self, query: &str) -> Result<(), Box<dyn Error>> {
        let Some(quote) = self.catalog.search(query).first().map(|quote| (*quote).clone()) else {
            writeln!(self.out, "No quote matches `{query}`.")?;
            return Ok(());
        };

        let outcome = self.library.add_favorite(&quote);
        if outcome.changed {
            writeln!(self.out, "Added to favorites: {quote}")?;
        } else {
            writeln!(self.out, "Already a favorite: {quote}")?;
        }
        self.report(outcome)
    }

    fn remove_favorite(&mut self, query: &str) -> Result<(), Box<dyn Error>> {
        let needle = query.trim().to_lowercase();
        let Some(quote) = self
            .library
            .favorites()
            .iter()
            .find(|quote| quote.matches_lowercase(&needle))
            .cloned()
        else {
            writeln!(self.out, "No favorite matches `{query}`.")?;
            return Ok(());
        };

        let outcome = self.library.remove_favorite(&quote);
        writeln!(self.out, "Removed from favorites: {quote}")?;
        self.report(outcome)
    }

    fn list_favorites(&mut self) -> Result<(), Box<dyn Error>> {
        if self.library.favorites().is_empty() {
            writeln!(self.out, "No favorites yet.")?;
            return Ok(());
        }
        for quote in self.library.favorites() {
            writeln!(self.out, "{}", quote.attributed())?;
        }
        Ok(())
    }

    fn history(&mut self, clear: bool) -> Result<(), Box<dyn Error>> {
        if clear {
            let outcome = self.library.clear_history();
            writeln!(self.out, "History cleared.")?;
            return self.report(outcome);
        }
        if self.library.history().is_empty() {
            writeln!(self.out, "No quotes viewed yet.")?;
            return Ok(());
        }
        for entry in self.library.history() {
            let viewed = entry
                .viewed_at
                .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            writeln!(self.out, "{viewed}  {}", entry.quote.attributed())?;
        }
        Ok(())
    }

    fn set_notify_time(&mut self, value: &str) -> Result<(), Box<dyn Error>> {
        let time = DailyTime::parse(value)?;
        self.config.notification_time = time;
        let path = self
            .config_path
            .clone()
            .ok_or(ConfigError::NoPlatformDir("config"))?;
        self.config.save_to(path)?;
        info!("event=notify_time_set module=cli status=ok time={time}");
        writeln!(self.out, "Daily notification set for {time}.")?;
        Ok(())
    }

    fn watch(&mut self) -> Result<(), Box<dyn Error>> {
        let mut scheduler = DailyScheduler::new(self.config.notification_time);
        scheduler.arm_from(Local::now().naive_local());
        writeln!(
            self.out,
            "Waiting for daily notification at {} (Ctrl-C to stop).",
            scheduler.time()
        )?;
        self.out.flush()?;

        loop {
            let now = Local::now().naive_local();
            if let Err(err) = self.watch_tick(&mut scheduler, &TerminalNotifier, now) {
                writeln!(self.out, "warning: {err}")?;
            }
            let until_next = (scheduler.next_fire_after(now) - now)
                .to_std()
                .unwrap_or(Duration::ZERO);
            std::thread::sleep(until_next.min(WATCH_POLL_INTERVAL));
        }
    }

    /// One timer step: fires when due. Returns whether a notification went out.
    pub fn watch_tick<N: Notifier + ?Sized>(
        &mut self,
        scheduler: &mut DailyScheduler,
        notifier: &N,
        now: NaiveDateTime,
    ) -> Result<bool, NotifyError> {
        if !scheduler.poll(now) {
            return Ok(false);
        }
        fire(&self.catalog, notifier, &mut self.rng)?;
        Ok(true)
    }

    fn report(&mut self, outcome: WriteOutcome) -> Result<(), Box<dyn Error>> {
        if let Some(err) = outcome.warning {
            writeln!(self.out, "warning: change kept for this session only: {err}")?;
        }
        Ok(())
    }
}
