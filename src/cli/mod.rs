pub mod render;

use crate::constants::{APP_DESCRIPTION, APP_NAME};
use crate::domain::{parse_date_param, Mood, YearMonth};
use crate::preferences::ThemeMode;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// A calendar mood journal: one mood and one note per day
#[derive(Parser, Debug)]
#[command(name = APP_NAME, about = APP_DESCRIPTION)]
#[command(author, version, long_about = None)]
pub struct CliArgs {
    /// Print verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log format on stderr (text or json); overrides MOODTAB_LOG_FORMAT
    #[arg(long, global = true, value_parser = ["text", "json"])]
    pub log_format: Option<String>,

    /// Print the resulting state as JSON instead of a rendered view
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show a month grid (default: current month)
    Month {
        /// Month to show (format: YYYY-MM)
        #[arg(value_parser = parse_month_arg)]
        month: Option<YearMonth>,
    },

    /// Show the Monday-to-Sunday week containing a date (default: today)
    Week {
        /// Any date in the week (format: YYYY-MM-DD or YYYYMMDD)
        #[arg(value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
    },

    /// Record the mood (and optional note) for a date, replacing any existing entry
    Set {
        /// Date of the entry (format: YYYY-MM-DD or YYYYMMDD)
        #[arg(value_parser = parse_date_arg)]
        date: NaiveDate,

        /// One of: happy, calm, anxious, depressed
        #[arg(value_parser = parse_mood_arg)]
        mood: Mood,

        /// Free-text note, at most 500 characters
        note: Option<String>,
    },

    /// Delete the entry for a date
    Delete {
        /// Date of the entry (format: YYYY-MM-DD or YYYYMMDD)
        #[arg(value_parser = parse_date_arg)]
        date: NaiveDate,
    },

    /// Show or change the theme
    Theme {
        /// New theme: light, dark or system
        #[arg(value_parser = parse_theme_arg)]
        mode: Option<ThemeMode>,
    },

    /// Show, reset, or complete the welcome flow
    Welcome {
        /// Show the welcome flow again on next launch
        #[arg(long, conflicts_with = "complete")]
        reset: bool,

        /// Mark the welcome flow as completed
        #[arg(long)]
        complete: bool,
    },
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        CliArgs::parse()
    }

    /// The subcommand to run; no subcommand shows the current month.
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Month { month: None })
    }
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_date_param(raw).map_err(|e| e.to_string())
}

fn parse_month_arg(raw: &str) -> Result<YearMonth, String> {
    raw.parse().map_err(|e: crate::errors::AppError| e.to_string())
}

fn parse_mood_arg(raw: &str) -> Result<Mood, String> {
    raw.parse().map_err(|e: crate::errors::AppError| e.to_string())
}

fn parse_theme_arg(raw: &str) -> Result<ThemeMode, String> {
    raw.parse().map_err(|e: crate::errors::AppError| e.to_string())
}
