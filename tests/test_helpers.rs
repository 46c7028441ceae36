#![allow(dead_code)]

use assert_cmd::Command;
use chrono::NaiveDate;
use moodtab::db::Database;
use moodtab::repository::{MoodRepository, SqliteMoodRepository};
use moodtab::store::EntryStore;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Creates a `Command` for the `moodtab` binary with a clean environment and its
/// data directory pointed at `data_dir`.
pub fn base_moodtab_command(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("moodtab").expect("moodtab binary not built");
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
        cmd.env("PATH", path);
    }
    cmd.env("HOME", data_dir).env("MOODTAB_DIR", data_dir);
    cmd
}

/// Opens a fresh database in a temporary directory.
pub fn temp_database() -> (TempDir, Database) {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(&temp_dir.path().join("moodtab.db"), 4).unwrap();
    db.initialize_schema().unwrap();
    (temp_dir, db)
}

/// Repository plus the store beneath it, sharing one temporary database.
pub fn temp_repository() -> (TempDir, EntryStore, Arc<dyn MoodRepository>) {
    let (temp_dir, db) = temp_database();
    let store = EntryStore::new(db);
    let repository: Arc<dyn MoodRepository> = Arc::new(SqliteMoodRepository::new(store.clone()));
    (temp_dir, store, repository)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
