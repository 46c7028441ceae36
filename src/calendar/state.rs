//! Calendar view state and its reducer.
//!
//! Every input to the calendar (a UI command or the result of asynchronous work)
//! is a [`CalendarEvent`]. [`CalendarUiState::reduce`] applies one event and
//! returns the side effect, if any, that the runtime must start. The reducer
//! itself performs no I/O, which keeps every transition testable in isolation.

use crate::domain::{DailyEntry, YearMonth};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Read-only snapshot rendered by calendar screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarUiState {
    pub current_month: YearMonth,
    /// Entries of the active range subscription, keyed by date.
    pub entries_by_date: BTreeMap<NaiveDate, DailyEntry>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub selected_date: Option<NaiveDate>,
    pub show_edit_modal: bool,
}

impl CalendarUiState {
    pub fn new(current_month: YearMonth) -> Self {
        CalendarUiState {
            current_month,
            entries_by_date: BTreeMap::new(),
            is_loading: false,
            error_message: None,
            selected_date: None,
            show_edit_modal: false,
        }
    }

    pub fn entry_for(&self, date: NaiveDate) -> Option<&DailyEntry> {
        self.entries_by_date.get(&date)
    }

    /// Applies one event and returns the effect the runtime must start.
    pub fn reduce(&mut self, event: CalendarEvent) -> Option<Effect> {
        match event {
            CalendarEvent::Init => {
                self.is_loading = true;
                Some(Effect::Subscribe(self.current_month))
            }
            CalendarEvent::Command(command) => self.on_command(command),
            CalendarEvent::EntriesLoaded(entries) => {
                self.entries_by_date = entries.into_iter().map(|e| (e.date(), e)).collect();
                self.is_loading = false;
                None
            }
            CalendarEvent::LoadFailed(message) => {
                self.is_loading = false;
                self.error_message = Some(format!("Failed to load entries: {}", message));
                None
            }
            CalendarEvent::SaveFinished(result) => {
                match result {
                    Ok(()) => self.dismiss_edit(),
                    Err(message) => {
                        self.error_message = Some(format!("Failed to save entry: {}", message))
                    }
                }
                None
            }
            CalendarEvent::DeleteFinished(result) => {
                match result {
                    Ok(()) => self.dismiss_edit(),
                    Err(message) => {
                        self.error_message = Some(format!("Failed to delete entry: {}", message))
                    }
                }
                None
            }
        }
    }

    fn on_command(&mut self, command: CalendarCommand) -> Option<Effect> {
        match command {
            CalendarCommand::MonthChanged(month) => {
                self.current_month = month;
                self.is_loading = true;
                Some(Effect::Subscribe(month))
            }
            CalendarCommand::DaySelected(date) => {
                self.selected_date = Some(date);
                self.show_edit_modal = true;
                None
            }
            CalendarCommand::EditDismissed => {
                self.dismiss_edit();
                None
            }
            // Entries are never patched here: the store change re-emits the range.
            CalendarCommand::EntrySaved(entry) => Some(Effect::Save(entry)),
            CalendarCommand::EntryDeleted(date) => Some(Effect::Delete(date)),
            CalendarCommand::ErrorDismissed => {
                self.error_message = None;
                None
            }
        }
    }

    fn dismiss_edit(&mut self) {
        self.selected_date = None;
        self.show_edit_modal = false;
    }
}

/// Commands issued by screens and navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarCommand {
    MonthChanged(YearMonth),
    DaySelected(NaiveDate),
    EditDismissed,
    EntrySaved(DailyEntry),
    EntryDeleted(NaiveDate),
    ErrorDismissed,
}

/// Everything the reducer reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarEvent {
    /// Start-up: subscribe to the initial month.
    Init,
    Command(CalendarCommand),
    /// Emission of the active range subscription.
    EntriesLoaded(Vec<DailyEntry>),
    /// Failed read of the active range subscription.
    LoadFailed(String),
    SaveFinished(Result<(), String>),
    DeleteFinished(Result<(), String>),
}

impl From<CalendarCommand> for CalendarEvent {
    fn from(command: CalendarCommand) -> Self {
        CalendarEvent::Command(command)
    }
}

/// Work the runtime starts on behalf of the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replace the active range subscription with one for this month.
    Subscribe(YearMonth),
    Save(DailyEntry),
    Delete(NaiveDate),
}
