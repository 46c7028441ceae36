//! Entry store with live range subscriptions.
//!
//! `EntryStore` wraps the `daily_entries` table. Point reads and writes are plain
//! async calls; range and list reads are *live*: they return a stream that emits
//! the current rows immediately and then re-emits the full row list every time a
//! write touches a date inside the queried range.
//!
//! Every successful write publishes the written date on a broadcast change feed.
//! Each live query subscribes to that feed when it is created (before its first
//! read), so no write committed after creation can be missed. A subscriber that
//! falls behind the feed re-queries unconditionally.

use crate::constants::CHANGE_FEED_CAPACITY;
use crate::db::entries::{self, EntryRecord};
use crate::db::Database;
use crate::errors::AppResult;
use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, warn};

/// A live sequence of full row lists.
pub type RecordListStream = BoxStream<'static, AppResult<Vec<EntryRecord>>>;

/// Durable date-keyed entry table plus its change feed.
///
/// Cloning is cheap; clones share the database pool and the change feed.
#[derive(Clone)]
pub struct EntryStore {
    db: Database,
    changes: broadcast::Sender<String>,
}

impl EntryStore {
    pub fn new(db: Database) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        EntryStore { db, changes }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Point lookup. Returns `Ok(None)` if no row exists for `date`.
    pub async fn get(&self, date: &str) -> AppResult<Option<EntryRecord>> {
        let date = date.to_string();
        self.db
            .run(move |conn| entries::get_entry_by_date(conn, &date))
            .await
    }

    /// Inserts or fully replaces the row for `record.date`.
    pub async fn upsert(&self, record: EntryRecord) -> AppResult<()> {
        let date = record.date.clone();
        self.db
            .run(move |conn| entries::upsert_entry(conn, &record))
            .await?;
        self.publish(date);
        Ok(())
    }

    /// Removes the row for `date`. A missing row is a no-op and publishes nothing.
    pub async fn delete(&self, date: &str) -> AppResult<()> {
        let key = date.to_string();
        let removed = self
            .db
            .run(move |conn| entries::delete_entry_by_date(conn, &key))
            .await?;
        if removed > 0 {
            self.publish(date.to_string());
        } else {
            debug!("Delete for {} matched no row", date);
        }
        Ok(())
    }

    /// Live rows with `start <= date <= end` (ISO date strings, inclusive).
    pub fn get_range(&self, start: &str, end: &str) -> RecordListStream {
        self.live(Scope::Range {
            start: start.to_string(),
            end: end.to_string(),
        })
    }

    /// Live list of every row.
    pub fn get_all(&self) -> RecordListStream {
        self.live(Scope::All)
    }

    fn publish(&self, date: String) {
        if self.changes.send(date).is_err() {
            debug!("No live subscribers for entry change");
        }
    }

    fn live(&self, scope: Scope) -> RecordListStream {
        let query = LiveQuery {
            db: self.db.clone(),
            scope,
            changes: self.changes.subscribe(),
            primed: false,
        };

        stream::unfold(query, |mut query| async move {
            if query.primed && !query.wait_for_change().await {
                return None;
            }
            query.primed = true;
            let rows = fetch(query.db.clone(), query.scope.clone()).await;
            Some((rows, query))
        })
        .boxed()
    }
}

#[derive(Debug, Clone)]
enum Scope {
    Range { start: String, end: String },
    All,
}

impl Scope {
    fn contains(&self, date: &str) -> bool {
        match self {
            Scope::Range { start, end } => start.as_str() <= date && date <= end.as_str(),
            Scope::All => true,
        }
    }
}

struct LiveQuery {
    db: Database,
    scope: Scope,
    changes: broadcast::Receiver<String>,
    primed: bool,
}

impl LiveQuery {
    /// Waits for a write inside the scope. Returns `false` once the feed is closed.
    async fn wait_for_change(&mut self) -> bool {
        loop {
            match self.changes.recv().await {
                Ok(date) if self.scope.contains(&date) => break,
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Live query lagged by {} changes; re-querying", skipped);
                    break;
                }
                Err(RecvError::Closed) => return false,
            }
        }

        // The fetch that follows reflects every change already queued.
        loop {
            match self.changes.try_recv() {
                Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        true
    }
}

async fn fetch(db: Database, scope: Scope) -> AppResult<Vec<EntryRecord>> {
    match scope {
        Scope::Range { start, end } => {
            db.run(move |conn| entries::get_entries_in_range(conn, &start, &end))
                .await
        }
        Scope::All => db.run(entries::get_all_entries).await,
    }
}
