/*!
# moodtab

moodtab is a single-user mood journal: one mood and one short note per calendar
day, browsed by month or week.

## Architecture

- `db`: SQLite schema, connection pool and row-level queries
- `store`: the entry table with live range subscriptions
- `repository`: `MoodRepository`, mapping rows to `DailyEntry` values
- `usecase`: the narrow operations the calendar composes
- `calendar`: the calendar reducer and the task that runs it
- `preferences`: theme mode and onboarding flags
- `cli` / `ops`: the terminal front-end

## Usage Example

```rust,no_run
use moodtab::calendar::CalendarViewModel;
use moodtab::db::Database;
use moodtab::domain::YearMonth;
use moodtab::repository::SqliteMoodRepository;
use moodtab::store::EntryStore;
use moodtab::usecase::CalendarUseCases;
use std::sync::Arc;

#[tokio::main]
async fn main() -> moodtab::AppResult<()> {
    let config = moodtab::Config::load()?;
    let db = Database::open(&config.db_path(), config.pool_size)?;
    db.initialize_schema()?;

    let repository = Arc::new(SqliteMoodRepository::new(EntryStore::new(db)));
    let vm = CalendarViewModel::spawn(
        CalendarUseCases::new(repository),
        YearMonth::new(2024, 3)?,
    );

    let state = vm.wait_until(|s| !s.is_loading).await?;
    println!("{} entries in {}", state.entries_by_date.len(), state.current_month);
    vm.shutdown().await
}
```
*/

/// The calendar state machine
pub mod calendar;
/// Command-line interface for parsing and rendering
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// Database schema and queries
pub mod db;
/// Moods, entries and calendar arithmetic
pub mod domain;
/// Error types and utilities for error handling
pub mod errors;
/// Tracing subscriber setup
pub mod logging;
/// Operations behind each subcommand
pub mod ops;
/// Theme and onboarding preferences
pub mod preferences;
/// Domain-level entry access
pub mod repository;
/// Entry store with live queries
pub mod store;
/// Calendar use cases
pub mod usecase;

// Re-export important types for convenience
pub use config::Config;
pub use errors::{AppError, AppResult};
