//! Calendar operations: month and week views, saving and deleting entries.
//!
//! Month, save and delete run through a short-lived [`CalendarViewModel`] the
//! same way a screen would: subscribe, issue commands, wait for the resulting
//! state. The week view spans month boundaries and reads the range directly.

use crate::calendar::{CalendarUiState, CalendarViewModel};
use crate::cli::render;
use crate::domain::{week_of, DailyEntry, YearMonth};
use crate::errors::{AppError, AppResult};
use crate::repository::MoodRepository;
use crate::usecase::{CalendarUseCases, GetDailyEntries};
use chrono::NaiveDate;
use futures::StreamExt;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Renders `month` once its first load has completed.
pub async fn show_month(
    repository: Arc<dyn MoodRepository>,
    month: YearMonth,
    today: NaiveDate,
    json: bool,
) -> AppResult<String> {
    let vm = CalendarViewModel::spawn(CalendarUseCases::new(repository), month);
    let state = vm.wait_until(|s| !s.is_loading).await?;
    vm.shutdown().await?;

    if json {
        to_json(&state)
    } else {
        Ok(render::render_month(&state, today))
    }
}

/// Renders the Monday-to-Sunday week containing `date`.
pub async fn show_week(
    repository: Arc<dyn MoodRepository>,
    date: NaiveDate,
    json: bool,
) -> AppResult<String> {
    let days = week_of(date);
    let (start, end) = match (days.first(), days.last()) {
        (Some(start), Some(end)) => (*start, *end),
        _ => return Err(AppError::Entry(format!("No week contains {}", date))),
    };

    let entries = GetDailyEntries::new(repository)
        .call(start, end)
        .next()
        .await
        .transpose()?
        .unwrap_or_default();
    debug!("Week of {} has {} entries", date, entries.len());

    if json {
        to_json(&entries)
    } else {
        Ok(render::render_week(&days, &entries))
    }
}

/// Selects the entry's day, saves it and waits until the month shows it.
pub async fn save_entry(
    repository: Arc<dyn MoodRepository>,
    entry: DailyEntry,
    today: NaiveDate,
    json: bool,
) -> AppResult<String> {
    let date = entry.date();
    let vm = open_editor(repository, date).await?;

    vm.on_entry_saved(entry.clone())?;
    settle_edit(&vm).await?;
    let state = vm
        .wait_until(|s| s.error_message.is_some() || s.entry_for(date) == Some(&entry))
        .await?;
    vm.shutdown().await?;
    ensure_no_error(&state)?;

    info!("Saved entry for {}", date);
    if json {
        to_json(&state)
    } else {
        Ok(render::render_month(&state, today))
    }
}

/// Selects `date`, deletes its entry and waits until the month no longer shows it.
pub async fn delete_entry(
    repository: Arc<dyn MoodRepository>,
    date: NaiveDate,
    today: NaiveDate,
    json: bool,
) -> AppResult<String> {
    let vm = open_editor(repository, date).await?;

    vm.on_entry_deleted(date)?;
    settle_edit(&vm).await?;
    let state = vm
        .wait_until(|s| s.error_message.is_some() || s.entry_for(date).is_none())
        .await?;
    vm.shutdown().await?;
    ensure_no_error(&state)?;

    info!("Deleted entry for {}", date);
    if json {
        to_json(&state)
    } else {
        Ok(render::render_month(&state, today))
    }
}

/// Spawns a view-model on the month of `date`, waits for the first load and
/// opens the edit modal for `date`.
async fn open_editor(
    repository: Arc<dyn MoodRepository>,
    date: NaiveDate,
) -> AppResult<CalendarViewModel> {
    let vm = CalendarViewModel::spawn(
        CalendarUseCases::new(repository),
        YearMonth::containing(date),
    );
    let state = vm.wait_until(|s| !s.is_loading).await?;
    ensure_no_error(&state)?;

    vm.on_day_selected(date)?;
    vm.wait_until(|s| s.show_edit_modal).await?;
    Ok(vm)
}

/// Waits for the pending write: the modal closes on success, an error appears
/// on failure.
async fn settle_edit(vm: &CalendarViewModel) -> AppResult<()> {
    let state = vm
        .wait_until(|s| !s.show_edit_modal || s.error_message.is_some())
        .await?;
    ensure_no_error(&state)
}

fn ensure_no_error(state: &CalendarUiState) -> AppResult<()> {
    match &state.error_message {
        Some(message) => Err(AppError::Calendar(message.clone())),
        None => Ok(()),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Io(std::io::Error::from(e)))
}
