//! Mood repository: domain-level access to daily entries.
//!
//! The repository translates between persisted `EntryRecord` rows and
//! `DailyEntry` values (date parsing, mood mapping) and is the seam the use
//! cases and the calendar state machine depend on.

use crate::constants::DATE_FORMAT_ISO;
use crate::db::entries::EntryRecord;
use crate::domain::{DailyEntry, Mood};
use crate::errors::{AppResult, DatabaseError};
use crate::store::EntryStore;
use chrono::NaiveDate;
use futures::future::BoxFuture;
use futures::stream::{BoxStream, StreamExt};
use futures::FutureExt;
use tracing::warn;

/// A live sequence of complete entry lists.
pub type EntryListStream = BoxStream<'static, AppResult<Vec<DailyEntry>>>;

/// Access to persisted daily entries.
///
/// # Replace-not-patch
///
/// [`MoodRepository::get_entries_in_range`] emits the **full current list** for
/// the range first and again after every change inside it. Items are never
/// deltas: a consumer replaces whatever it holds with the latest emission and
/// needs no merge logic. An `Err` item reports a failed read; the stream keeps
/// running and the next successful emission is again a full list.
///
/// Failures from the underlying store are propagated unchanged.
pub trait MoodRepository: Send + Sync {
    /// Point lookup of the entry for `date`.
    fn get_entry(&self, date: NaiveDate) -> BoxFuture<'_, AppResult<Option<DailyEntry>>>;

    /// Live entries with `start <= date <= end`, ordered by date.
    fn get_entries_in_range(&self, start: NaiveDate, end: NaiveDate) -> EntryListStream;

    /// Inserts or fully replaces the entry for `entry.date()`.
    fn save(&self, entry: DailyEntry) -> BoxFuture<'_, AppResult<()>>;

    /// Removes the entry for `date`; no-op when absent.
    fn delete(&self, date: NaiveDate) -> BoxFuture<'_, AppResult<()>>;
}

/// `MoodRepository` backed by the SQLite entry store.
#[derive(Clone)]
pub struct SqliteMoodRepository {
    store: EntryStore,
}

impl SqliteMoodRepository {
    pub fn new(store: EntryStore) -> Self {
        SqliteMoodRepository { store }
    }

    async fn lookup(&self, date: NaiveDate) -> AppResult<Option<DailyEntry>> {
        match self.store.get(&date_key(date)).await? {
            Some(record) => Ok(Some(to_entry(&record)?)),
            None => Ok(None),
        }
    }

    /// Live list of every entry, for list-wide consumers such as the mood legend.
    pub fn all_entries(&self) -> EntryListStream {
        self.store.get_all().map(|rows| rows.map(to_entries)).boxed()
    }
}

impl MoodRepository for SqliteMoodRepository {
    fn get_entry(&self, date: NaiveDate) -> BoxFuture<'_, AppResult<Option<DailyEntry>>> {
        self.lookup(date).boxed()
    }

    fn get_entries_in_range(&self, start: NaiveDate, end: NaiveDate) -> EntryListStream {
        self.store
            .get_range(&date_key(start), &date_key(end))
            .map(|rows| rows.map(to_entries))
            .boxed()
    }

    fn save(&self, entry: DailyEntry) -> BoxFuture<'_, AppResult<()>> {
        async move { self.store.upsert(to_record(&entry)).await }.boxed()
    }

    fn delete(&self, date: NaiveDate) -> BoxFuture<'_, AppResult<()>> {
        async move { self.store.delete(&date_key(date)).await }.boxed()
    }
}

fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT_ISO).to_string()
}

fn to_record(entry: &DailyEntry) -> EntryRecord {
    EntryRecord {
        date: date_key(entry.date()),
        mood: entry.mood().as_str().to_string(),
        note: entry.note().to_string(),
    }
}

fn to_entry(record: &EntryRecord) -> Result<DailyEntry, DatabaseError> {
    let malformed = |reason: String| DatabaseError::MalformedRecord {
        date: record.date.clone(),
        reason,
    };

    let date = NaiveDate::parse_from_str(&record.date, DATE_FORMAT_ISO)
        .map_err(|e| malformed(format!("unparseable date: {}", e)))?;
    let mood = Mood::from_name(&record.mood)
        .ok_or_else(|| malformed(format!("unknown mood '{}'", record.mood)))?;

    DailyEntry::new(date, mood, record.note.clone()).map_err(|e| malformed(e.to_string()))
}

/// Maps a row list, skipping (and logging) rows that do not map to an entry.
fn to_entries(records: Vec<EntryRecord>) -> Vec<DailyEntry> {
    records
        .iter()
        .filter_map(|record| match to_entry(record) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping stored entry: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::errors::AppError;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup_repository() -> (TempDir, SqliteMoodRepository) {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open(&temp_dir.path().join("test.db"), 2).unwrap();
        db.initialize_schema().unwrap();
        (temp_dir, SqliteMoodRepository::new(EntryStore::new(db)))
    }

    fn insert_raw(repo: &SqliteMoodRepository, date: &str, mood: &str) {
        repo.store
            .database()
            .get_conn()
            .unwrap()
            .execute(
                "INSERT INTO daily_entries (date, mood, note) VALUES (?1, ?2, '')",
                [date, mood],
            )
            .unwrap();
    }

    #[test]
    fn test_record_mapping() {
        let entry = DailyEntry::new(date(2024, 3, 15), Mood::Happy, "Good day").unwrap();
        let record = to_record(&entry);
        assert_eq!(record.date, "2024-03-15");
        assert_eq!(record.mood, "HAPPY");
        assert_eq!(to_entry(&record).unwrap(), entry);
    }

    #[test]
    fn test_unknown_mood_is_malformed() {
        let record = EntryRecord {
            date: "2024-03-15".to_string(),
            mood: "GRUMPY".to_string(),
            note: String::new(),
        };
        assert!(matches!(
            to_entry(&record),
            Err(DatabaseError::MalformedRecord { .. })
        ));
    }

    #[tokio::test]
    async fn test_save_then_get() {
        let (_dir, repo) = setup_repository();
        let entry = DailyEntry::new(date(2024, 3, 15), Mood::Calm, "Quiet").unwrap();

        repo.save(entry.clone()).await.unwrap();

        assert_eq!(repo.get_entry(date(2024, 3, 15)).await.unwrap(), Some(entry));
        assert_eq!(repo.get_entry(date(2024, 3, 16)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_range_skips_malformed_rows() {
        let (_dir, repo) = setup_repository();
        insert_raw(&repo, "2024-03-02", "GRUMPY");
        insert_raw(&repo, "2024-03-03", "CALM");

        let mut march = repo.get_entries_in_range(date(2024, 3, 1), date(2024, 3, 31));
        let entries = march.next().await.unwrap().unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date(), date(2024, 3, 3));
    }

    #[tokio::test]
    async fn test_all_entries_follows_every_write() {
        let (_dir, repo) = setup_repository();
        let mut all = repo.all_entries();
        assert!(all.next().await.unwrap().unwrap().is_empty());

        let entry = DailyEntry::new(date(1999, 12, 31), Mood::Depressed, "").unwrap();
        repo.save(entry.clone()).await.unwrap();

        assert_eq!(all.next().await.unwrap().unwrap(), vec![entry]);
    }

    #[tokio::test]
    async fn test_point_lookup_of_malformed_row_fails() {
        let (_dir, repo) = setup_repository();
        insert_raw(&repo, "2024-03-02", "GRUMPY");

        let result = repo.get_entry(date(2024, 3, 2)).await;
        assert!(matches!(
            result,
            Err(AppError::Database(DatabaseError::MalformedRecord { .. }))
        ));
    }
}
