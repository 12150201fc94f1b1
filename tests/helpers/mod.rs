#![allow(dead_code)]

use papermind::db;
use papermind::papers::store::SqlitePaperStore;
use papermind::papers::{KeyValueStore, StoreError};
use rusqlite::Connection;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    db::open_memory_database().unwrap()
}

pub fn shared_db() -> Arc<Mutex<Connection>> {
    Arc::new(Mutex::new(test_db()))
}

/// SQLite paper store pre-loaded with `papers`, in order.
pub fn paper_store(papers: &[(&str, &str)]) -> SqlitePaperStore {
    let store = SqlitePaperStore::new(shared_db());
    for (title, summary) in papers {
        store.set(title, summary).unwrap();
    }
    store
}

/// Store that enumerates a key which no longer exists, reproducing a delete
/// landing between the scan and the re-fetch.
pub struct RacingStore {
    pub entries: Mutex<HashMap<String, String>>,
    pub phantom_keys: Vec<String>,
}

impl RacingStore {
    pub fn new(entries: &[(&str, &str)], phantom_keys: &[&str]) -> Self {
        Self {
            entries: Mutex::new(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
            phantom_keys: phantom_keys.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl KeyValueStore for RacingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys = self.phantom_keys.clone();
        keys.extend(self.entries.lock().unwrap().keys().cloned());
        Ok(keys)
    }
}

/// Store whose first read misses and every later read fails.
pub struct FlakyStore {
    pub keys: Vec<String>,
    pub reads: AtomicUsize,
}

impl FlakyStore {
    pub fn new(keys: &[&str]) -> Self {
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            reads: AtomicUsize::new(0),
        }
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        if self.reads.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(None)
        } else {
            Err(StoreError::LockPoisoned("connection reset".into()))
        }
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.keys.clone())
    }
}

/// Store with no exact hit whose key enumeration fails.
pub struct UnlistableStore;

impl KeyValueStore for UnlistableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Err(StoreError::LockPoisoned("scan aborted".into()))
    }
}
