pub mod activities;
pub mod notes;
pub mod output;
pub mod review;

use std::{fmt::Display, path::PathBuf};

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use chrono_english::parse_date_string;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{level_filters::LevelFilter, warn};

use crate::{
    store::{
        error::StoreError,
        record_store::{LocalStore, RecordStore},
    },
    utils::{
        clock::{Clock, DefaultClock},
        dir::default_storage_root,
        logging::enable_logging,
        time::{parse_day_key, parse_local},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Hoursme", version, long_about = None)]
#[command(about = "Track activity periods, daily reflections, and todos in plain local files", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        help = "Storage root holding the data files. By default uses $XDG_DATA_HOME/hoursme"
    )]
    dir: Option<PathBuf>,
    #[arg(
        long,
        default_value = "Free Time",
        help = "Category excluded from the long-term summary figures"
    )]
    untracked: String,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Show one day's activity periods and reflections")]
    Day {
        #[arg(help = "Day to show. Examples are \"yesterday\", \"2025-03-15\", \"15/03/2025\"")]
        when: Option<String>,
    },
    #[command(about = "Record a new activity period")]
    Add {
        #[arg(help = "Category name, e.g. \"Work\"")]
        category: String,
        #[arg(long, help = "Period start, e.g. \"2025/03/15 09:00\"")]
        start: String,
        #[arg(long, help = "Period end, e.g. \"2025/03/15 10:30\"")]
        end: String,
        #[arg(long, default_value = "", help = "Free-text details")]
        details: String,
    },
    #[command(about = "Show per-category totals for the week containing a day")]
    Week {
        #[arg(help = "Any day inside the week. Defaults to today")]
        when: Option<String>,
    },
    #[command(about = "Show total hours, days tracked, daily average, and top category")]
    Summary,
    #[command(about = "Record or list daily reflections")]
    Idea {
        #[command(subcommand)]
        command: IdeaCommand,
    },
    #[command(about = "Manage the todo list")]
    Todo {
        #[command(subcommand)]
        command: TodoCommand,
    },
    #[command(about = "Check every data file in the storage root for format problems")]
    Check,
}

#[derive(Subcommand, Debug)]
pub enum IdeaCommand {
    Add {
        text: String,
        #[arg(long, help = "Day the reflection belongs to. Defaults to today")]
        date: Option<String>,
    },
    List {
        #[arg(long, help = "Only show reflections for this day")]
        date: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TodoCommand {
    Add { text: String },
    List,
    #[command(about = "Remove a todo by the index shown in `todo list`")]
    Done { index: usize },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let root = match args.dir.clone() {
        Some(dir) => dir,
        None => default_storage_root()?,
    };

    let store = LocalStore::new(root.clone())?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(&root, logging_level, args.log)?;
    let clock = DefaultClock;
    let dialect = args.date_style.into();

    match args.commands {
        Commands::Day { when } => {
            let day = resolve_day(when.as_deref(), &clock, dialect)?;
            activities::show_day(&store, day, &args.untracked).await
        }
        Commands::Add {
            category,
            start,
            end,
            details,
        } => {
            let start = resolve_moment(&start, &clock, dialect)?;
            let end = resolve_moment(&end, &clock, dialect)?;
            activities::add_period(&store, category, start, end, details).await
        }
        Commands::Week { when } => {
            let day = resolve_day(when.as_deref(), &clock, dialect)?;
            review::show_week(&store, day).await
        }
        Commands::Summary => review::show_summary(&store, clock.today(), &args.untracked).await,
        Commands::Idea { command } => notes::run_idea(&store, command, &clock, dialect).await,
        Commands::Todo { command } => notes::run_todo(&store, command).await,
        Commands::Check => run_check(&store).await,
    }
}

async fn run_check(store: &LocalStore) -> Result<()> {
    let report = store.validate_root().await?;
    if report.is_valid() {
        println!("All data files look fine.");
    } else {
        for error in &report.errors {
            println!("- {error}");
        }
        anyhow::bail!("{} problem(s) found", report.errors.len());
    }
    Ok(())
}

/// Turns an optional human date argument into a calendar day. Accepts the
/// stored `YYYY-MM-DD` key directly, everything else goes through
/// chrono-english.
pub(crate) fn resolve_day(
    text: Option<&str>,
    clock: &impl Clock,
    dialect: chrono_english::Dialect,
) -> Result<NaiveDate> {
    let Some(text) = text else {
        return Ok(clock.today());
    };
    if let Some(day) = parse_day_key(text) {
        return Ok(day);
    }
    let parsed = parse_date_string(text, clock.now(), dialect)
        .map_err(|e| anyhow::anyhow!("Can't read {text:?} as a date: {e}"))?;
    Ok(parsed.date_naive())
}

/// Turns a timestamp argument into a wall-clock moment. The canonical
/// `YYYY/MM/DD HH:mm` form wins; human phrases like "today 9am" fall back to
/// chrono-english.
pub(crate) fn resolve_moment(
    text: &str,
    clock: &impl Clock,
    dialect: chrono_english::Dialect,
) -> Result<NaiveDateTime> {
    if let Some(moment) = parse_local(text) {
        return Ok(moment);
    }
    let parsed = parse_date_string(text, clock.now(), dialect)
        .map_err(|e| anyhow::anyhow!("Can't read {text:?} as a timestamp: {e}"))?;
    Ok(parsed.naive_local())
}

/// Read-path degradation: I/O failures log and show an empty collection so
/// the views stay usable; format problems surface to the user.
pub(crate) fn read_or_empty<T>(result: Result<Vec<T>, StoreError>) -> Result<Vec<T>> {
    match result {
        Ok(v) => Ok(v),
        Err(StoreError::Io(e)) => {
            warn!("storage read failed, showing empty collection: {e}");
            Ok(vec![])
        }
        Err(e) => Err(e.into()),
    }
}
