//! Argument parsing for the `quotebook` binary.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const USAGE: &str = "\
usage: quotebook <command> [args]

commands:
  random [--tag TAG]     show a random quote and record it in history
  search QUERY           list quotes whose text, author or tag contains QUERY
  tags                   list available tags
  fav add QUERY          add the first quote matching QUERY to favorites
  fav remove QUERY       remove the first favorite matching QUERY
  fav list               list favorites
  fav export PATH        write favorites as text lines to PATH
  history [--clear]      show (or clear) viewed quotes
  notify-time HH:MM      set the daily notification time
  watch                  run the daily notification timer in the foreground
  help | version
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Random { tag: Option<String> },
    Search { query: String },
    Tags,
    FavoriteAdd { query: String },
    FavoriteRemove { query: String },
    FavoriteList,
    FavoriteExport { path: PathBuf },
    History { clear: bool },
    NotifyTime { value: String },
    Watch,
    Help,
    Version,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageError(String);

impl Display for UsageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (see `quotebook help`)", self.0)
    }
}

impl Error for UsageError {}

fn usage(message: impl Into<String>) -> UsageError {
    UsageError(message.into())
}

impl Command {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, UsageError> {
        let mut args = args.into_iter().collect::<Vec<_>>();
        if args.is_empty() {
            return Ok(Self::Random { tag: None });
        }
        let name = args.remove(0);

        match name.as_str() {
            "random" => match args.as_slice() {
                [] => Ok(Self::Random { tag: None }),
                [flag, tag] if flag == "--tag" => Ok(Self::Random {
                    tag: Some(tag.clone()),
                }),
                _ => Err(usage("random accepts only `--tag TAG`")),
            },
            "search" => Ok(Self::Search {
                query: args.join(" "),
            }),
            "tags" => Ok(Self::Tags),
            "fav" | "favorites" => parse_favorites(args),
            "history" => match args.as_slice() {
                [] => Ok(Self::History { clear: false }),
                [flag] if flag == "--clear" => Ok(Self::History { clear: true }),
                _ => Err(usage("history accepts only `--clear`")),
            },
            "notify-time" => match args.as_slice() {
                [value] => Ok(Self::NotifyTime {
                    value: value.clone(),
                }),
                _ => Err(usage("notify-time expects one HH:MM argument")),
            },
            "watch" => Ok(Self::Watch),
            "help" | "-h" | "--help" => Ok(Self::Help),
            "version" | "-V" | "--version" => Ok(Self::Version),
            other => Err(usage(format!("unknown command `{other}`"))),
        }
    }
}

fn parse_favorites(mut args: Vec<String>) -> Result<Command, UsageError> {
    if args.is_empty() {
        return Ok(Command::FavoriteList);
    }
    let action = args.remove(0);
    let rest = args.join(" ");
    match action.as_str() {
        "list" => Ok(Command::FavoriteList),
        "add" | "remove" if rest.trim().is_empty() => {
            Err(usage(format!("fav {action} expects a search query")))
        }
        "add" => Ok(Command::FavoriteAdd { query: rest }),
        "remove" => Ok(Command::FavoriteRemove { query: rest }),
        "export" if !rest.trim().is_empty() => Ok(Command::FavoriteExport {
            path: PathBuf::from(rest),
        }),
        "export" => Err(usage("fav export expects a file path")),
        other => Err(usage(format!("unknown fav action `{other}`"))),
    }
}
