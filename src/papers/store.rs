//! SQLite-backed [`KeyValueStore`] for papers.
//!
//! Holds the process-wide connection handle. Each trait call takes the lock
//! on its own, so a writer may run between [`keys`](KeyValueStore::keys) and
//! a later [`get`](KeyValueStore::get).

use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{KeyValueStore, StoreError};

/// Default number of titles fetched per enumeration page.
pub const DEFAULT_SCAN_PAGE_SIZE: usize = 500;

#[derive(Clone)]
pub struct SqlitePaperStore {
    db: Arc<Mutex<Connection>>,
    page_size: usize,
}

impl SqlitePaperStore {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self::with_page_size(db, DEFAULT_SCAN_PAGE_SIZE)
    }

    pub fn with_page_size(db: Arc<Mutex<Connection>>, page_size: usize) -> Self {
        Self {
            db,
            page_size: page_size.max(1),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.db
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    /// One page of titles after `after_rowid`, in rowid order.
    fn scan_page(&self, after_rowid: i64) -> Result<Vec<(i64, String)>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(
            "SELECT rowid, title FROM papers WHERE rowid > ?1 ORDER BY rowid LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![after_rowid, self.page_size as i64], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

impl KeyValueStore for SqlitePaperStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT summary FROM papers WHERE title = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let now = chrono::Utc::now().to_rfc3339();
        // ON CONFLICT keeps the rowid, so an overwrite does not move the title
        // to the end of the enumeration order.
        conn.execute(
            "INSERT INTO papers (title, summary, created_at, updated_at) VALUES (?1, ?2, ?3, ?3) \
             ON CONFLICT(title) DO UPDATE SET summary = excluded.summary, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        let mut cursor = 0i64;
        loop {
            let page = self.scan_page(cursor)?;
            let done = page.len() < self.page_size;
            if let Some((rowid, _)) = page.last() {
                cursor = *rowid;
            }
            keys.extend(page.into_iter().map(|(_, title)| title));
            if done {
                break;
            }
        }
        Ok(keys)
    }
}
