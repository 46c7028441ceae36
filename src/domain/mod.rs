//! Domain types for the mood journal.
//!
//! These types carry no I/O. `DailyEntry` is the only durable entity; everything
//! else in the application is derived from it or is transient UI state.

pub mod month;

pub use month::{month_grid, week_of, YearMonth};

use crate::constants::{DATE_FORMAT_COMPACT, DATE_FORMAT_ISO, MAX_NOTE_CHARS};
use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The closed set of moods an entry can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mood {
    Happy,
    Calm,
    Anxious,
    Depressed,
}

impl Mood {
    /// Every mood, in legend order.
    pub const ALL: [Mood; 4] = [Mood::Happy, Mood::Calm, Mood::Anxious, Mood::Depressed];

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "HAPPY",
            Mood::Calm => "CALM",
            Mood::Anxious => "ANXIOUS",
            Mood::Depressed => "DEPRESSED",
        }
    }

    /// Parse from database string representation.
    ///
    /// Only the exact stored names are accepted; use `str::parse` for user input.
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "HAPPY" => Some(Mood::Happy),
            "CALM" => Some(Mood::Calm),
            "ANXIOUS" => Some(Mood::Anxious),
            "DEPRESSED" => Some(Mood::Depressed),
            _ => None,
        }
    }

    /// Emoji shown in calendar cells and the legend.
    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Calm => "😌",
            Mood::Anxious => "😰",
            Mood::Depressed => "😔",
        }
    }

    /// Legend colour as `#RRGGBB`.
    pub fn color_hex(&self) -> &'static str {
        match self {
            Mood::Happy => "#4CAF50",
            Mood::Calm => "#2196F3",
            Mood::Anxious => "#FF9800",
            Mood::Depressed => "#F44336",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Mood::Happy => "Happy",
            Mood::Calm => "Calm",
            Mood::Anxious => "Anxious",
            Mood::Depressed => "Depressed",
        };
        f.write_str(label)
    }
}

impl FromStr for Mood {
    type Err = AppError;

    /// Case-insensitive parse of a mood name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::from_name(&s.trim().to_ascii_uppercase()).ok_or_else(|| {
            AppError::Entry(format!(
                "Unknown mood '{}'. Expected one of: happy, calm, anxious, depressed",
                s
            ))
        })
    }
}

/// One day's mood and note.
///
/// The note is bounded to `MAX_NOTE_CHARS` characters; construction through
/// [`DailyEntry::new`] is the only way to obtain a value, so every entry in the
/// system satisfies the bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyEntry {
    date: NaiveDate,
    mood: Mood,
    note: String,
}

impl DailyEntry {
    /// Creates an entry, rejecting notes longer than `MAX_NOTE_CHARS` characters.
    ///
    /// # Examples
    ///
    /// ```
    /// use moodtab::domain::{DailyEntry, Mood};
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    /// let entry = DailyEntry::new(date, Mood::Happy, "Good day").unwrap();
    /// assert_eq!(entry.note(), "Good day");
    ///
    /// assert!(DailyEntry::new(date, Mood::Calm, "x".repeat(501)).is_err());
    /// ```
    pub fn new(date: NaiveDate, mood: Mood, note: impl Into<String>) -> AppResult<Self> {
        let note = note.into();
        let chars = note.chars().count();
        if chars > MAX_NOTE_CHARS {
            return Err(AppError::Entry(format!(
                "Note for {} is {} characters long; the limit is {}",
                date, chars, MAX_NOTE_CHARS
            )));
        }
        Ok(DailyEntry { date, mood, note })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn note(&self) -> &str {
        &self.note
    }
}

/// Parses a date handed over by navigation (`YYYY-MM-DD` or `YYYYMMDD`).
pub fn parse_date_param(raw: &str) -> AppResult<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT_ISO)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, DATE_FORMAT_COMPACT))
        .map_err(|e| AppError::Entry(format!("Invalid date '{}': {}", raw, e)))
}
