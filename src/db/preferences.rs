//! Key/value preference rows.

use crate::errors::{AppResult, DatabaseError};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

/// Reads a preference value. Returns `Ok(None)` when the key was never written.
pub fn get_preference(conn: &Connection, key: &str) -> AppResult<Option<String>> {
    conn.query_row(
        "SELECT value FROM preferences WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Writes a preference value, replacing any previous value.
pub fn set_preference(conn: &Connection, key: &str, value: &str) -> AppResult<()> {
    debug!("Setting preference {} = {}", key, value);

    conn.execute(
        r#"
        INSERT INTO preferences (key, value) VALUES (?1, ?2)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        "#,
        params![key, value],
    )
    .map_err(DatabaseError::Sqlite)?;

    Ok(())
}

/// Reads a boolean preference stored as `"true"` / `"false"`.
///
/// Missing or unrecognised values yield `default`.
pub fn get_flag(conn: &Connection, key: &str, default: bool) -> AppResult<bool> {
    Ok(match get_preference(conn, key)?.as_deref() {
        Some("true") => true,
        Some("false") => false,
        _ => default,
    })
}

pub fn set_flag(conn: &Connection, key: &str, value: bool) -> AppResult<()> {
    set_preference(conn, key, if value { "true" } else { "false" })
}
