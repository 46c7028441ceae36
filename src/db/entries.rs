//! Daily entry row operations.
//!
//! Rows are exchanged as raw `EntryRecord`s keyed by the ISO date string. Mapping
//! to and from domain types happens in the repository, not here.

use crate::errors::{AppResult, DatabaseError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

/// A persisted `daily_entries` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    pub date: String,
    pub mood: String,
    pub note: String,
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<EntryRecord> {
    Ok(EntryRecord {
        date: row.get(0)?,
        mood: row.get(1)?,
        note: row.get(2)?,
    })
}

/// Inserts a row or fully replaces the existing row for the same date.
pub fn upsert_entry(conn: &Connection, record: &EntryRecord) -> AppResult<()> {
    debug!("Upserting entry for date {}", record.date);

    conn.execute(
        r#"
        INSERT INTO daily_entries (date, mood, note)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(date) DO UPDATE SET
            mood = excluded.mood,
            note = excluded.note
        "#,
        params![record.date, record.mood, record.note],
    )
    .map_err(DatabaseError::Sqlite)?;

    Ok(())
}

/// Retrieves the row for a date.
///
/// Returns `Ok(None)` if no entry exists for the given date.
pub fn get_entry_by_date(conn: &Connection, date: &str) -> AppResult<Option<EntryRecord>> {
    debug!("Getting entry for date {}", date);

    conn.query_row(
        "SELECT date, mood, note FROM daily_entries WHERE date = ?1",
        params![date],
        map_row,
    )
    .optional()
    .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Retrieves every row with `start <= date <= end`, ordered by date.
pub fn get_entries_in_range(
    conn: &Connection,
    start: &str,
    end: &str,
) -> AppResult<Vec<EntryRecord>> {
    debug!("Getting entries between {} and {}", start, end);

    let mut stmt = conn
        .prepare(
            "SELECT date, mood, note FROM daily_entries WHERE date BETWEEN ?1 AND ?2 ORDER BY date",
        )
        .map_err(DatabaseError::Sqlite)?;

    let rows = stmt
        .query_map(params![start, end], map_row)
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;

    debug!("Found {} entries", rows.len());
    Ok(rows)
}

/// Retrieves every row, ordered by date.
pub fn get_all_entries(conn: &Connection) -> AppResult<Vec<EntryRecord>> {
    debug!("Getting all entries");

    let mut stmt = conn
        .prepare("SELECT date, mood, note FROM daily_entries ORDER BY date")
        .map_err(DatabaseError::Sqlite)?;

    let rows = stmt
        .query_map([], map_row)
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;

    Ok(rows)
}

/// Deletes the row for a date. Deleting a missing date is not an error.
///
/// Returns the number of rows removed (0 or 1).
pub fn delete_entry_by_date(conn: &Connection, date: &str) -> AppResult<usize> {
    debug!("Deleting entry for date {}", date);

    let rows_affected = conn
        .execute("DELETE FROM daily_entries WHERE date = ?1", params![date])
        .map_err(DatabaseError::Sqlite)?;

    Ok(rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn setup_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::schema::create_tables(&conn).unwrap();
        conn
    }

    fn record(date: &str, mood: &str, note: &str) -> EntryRecord {
        EntryRecord {
            date: date.to_string(),
            mood: mood.to_string(),
            note: note.to_string(),
        }
    }

    #[test]
    fn test_upsert_entry_insert() {
        let conn = setup_test_db();
        let rec = record("2024-03-15", "HAPPY", "Good day");

        upsert_entry(&conn, &rec).unwrap();

        let stored = get_entry_by_date(&conn, "2024-03-15").unwrap().unwrap();
        assert_eq!(stored, rec);
    }

    #[test]
    fn test_upsert_entry_replaces_not_merges() {
        let conn = setup_test_db();

        upsert_entry(&conn, &record("2024-03-15", "HAPPY", "Good day")).unwrap();
        upsert_entry(&conn, &record("2024-03-15", "ANXIOUS", "")).unwrap();

        let stored = get_entry_by_date(&conn, "2024-03-15").unwrap().unwrap();
        assert_eq!(stored.mood, "ANXIOUS");
        assert_eq!(stored.note, "");
        assert_eq!(get_all_entries(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_get_entry_by_date_not_found() {
        let conn = setup_test_db();
        assert!(get_entry_by_date(&conn, "2024-01-01").unwrap().is_none());
    }

    #[test]
    fn test_range_is_inclusive_and_ordered() {
        let conn = setup_test_db();
        upsert_entry(&conn, &record("2024-03-31", "CALM", "")).unwrap();
        upsert_entry(&conn, &record("2024-02-29", "CALM", "")).unwrap();
        upsert_entry(&conn, &record("2024-03-01", "HAPPY", "")).unwrap();
        upsert_entry(&conn, &record("2024-04-01", "DEPRESSED", "")).unwrap();

        let march = get_entries_in_range(&conn, "2024-03-01", "2024-03-31").unwrap();
        let dates: Vec<&str> = march.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-03-31"]);
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let conn = setup_test_db();
        assert_eq!(delete_entry_by_date(&conn, "2024-03-15").unwrap(), 0);

        upsert_entry(&conn, &record("2024-03-15", "HAPPY", "")).unwrap();
        assert_eq!(delete_entry_by_date(&conn, "2024-03-15").unwrap(), 1);
        assert!(get_entry_by_date(&conn, "2024-03-15").unwrap().is_none());
    }
}
