//! Narrow operations the calendar composes against the repository.

use crate::domain::DailyEntry;
use crate::errors::AppResult;
use crate::repository::{EntryListStream, MoodRepository};
use chrono::NaiveDate;
use std::sync::Arc;

/// Live entries for an inclusive date range.
#[derive(Clone)]
pub struct GetDailyEntries {
    repository: Arc<dyn MoodRepository>,
}

impl GetDailyEntries {
    pub fn new(repository: Arc<dyn MoodRepository>) -> Self {
        GetDailyEntries { repository }
    }

    pub fn call(&self, start: NaiveDate, end: NaiveDate) -> EntryListStream {
        self.repository.get_entries_in_range(start, end)
    }
}

#[derive(Clone)]
pub struct SaveDailyEntry {
    repository: Arc<dyn MoodRepository>,
}

impl SaveDailyEntry {
    pub fn new(repository: Arc<dyn MoodRepository>) -> Self {
        SaveDailyEntry { repository }
    }

    pub async fn call(&self, entry: DailyEntry) -> AppResult<()> {
        self.repository.save(entry).await
    }
}

#[derive(Clone)]
pub struct DeleteDailyEntry {
    repository: Arc<dyn MoodRepository>,
}

impl DeleteDailyEntry {
    pub fn new(repository: Arc<dyn MoodRepository>) -> Self {
        DeleteDailyEntry { repository }
    }

    pub async fn call(&self, date: NaiveDate) -> AppResult<()> {
        self.repository.delete(date).await
    }
}

/// The three use cases the calendar view-model is constructed with.
#[derive(Clone)]
pub struct CalendarUseCases {
    pub get_entries: GetDailyEntries,
    pub save_entry: SaveDailyEntry,
    pub delete_entry: DeleteDailyEntry,
}

impl CalendarUseCases {
    /// Wires all three use cases to one repository.
    pub fn new(repository: Arc<dyn MoodRepository>) -> Self {
        CalendarUseCases {
            get_entries: GetDailyEntries::new(repository.clone()),
            save_entry: SaveDailyEntry::new(repository.clone()),
            delete_entry: DeleteDailyEntry::new(repository),
        }
    }
}
