//! [`VectorIndex`] backed by sqlite-vec.
//!
//! Payloads live in `memories`, vectors in the `memories_vec` vec0 table.
//! Vectors are unit length, so the L2 distance sqlite-vec reports converts to
//! cosine similarity as `1 - d² / 2`.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{ScoredMemory, VectorIndex};
use crate::embedding::EmbeddingProvider;

pub struct SqliteVectorIndex {
    db: Arc<Mutex<Connection>>,
    embedding: Arc<dyn EmbeddingProvider>,
}

impl SqliteVectorIndex {
    pub fn new(db: Arc<Mutex<Connection>>, embedding: Arc<dyn EmbeddingProvider>) -> Self {
        Self { db, embedding }
    }
}

impl VectorIndex for SqliteVectorIndex {
    fn upsert(&self, id: &str, data: &str) -> Result<()> {
        let vector = self.embedding.embed(data).context("embedding failed")?;

        let mut conn = self
            .db
            .lock()
            .map_err(|e| anyhow::anyhow!("db lock poisoned: {e}"))?;
        let tx = conn.transaction()?;
        let now = chrono::Utc::now().to_rfc3339();

        tx.execute(
            "INSERT INTO memories (id, data, created_at, updated_at) VALUES (?1, ?2, ?3, ?3) \
             ON CONFLICT(id) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at",
            params![id, data, now],
        )?;
        // vec0 has no upsert
        tx.execute("DELETE FROM memories_vec WHERE id = ?1", params![id])?;
        tx.execute(
            "INSERT INTO memories_vec (id, embedding) VALUES (?1, ?2)",
            params![id, embedding_to_bytes(&vector)],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn query(&self, data: &str, top_k: usize) -> Result<Vec<ScoredMemory>> {
        if top_k == 0 {
            return Ok(vec![]);
        }
        let vector = self.embedding.embed(data).context("embedding failed")?;

        let conn = self
            .db
            .lock()
            .map_err(|e| anyhow::anyhow!("db lock poisoned: {e}"))?;

        let neighbours: Vec<(String, f64)> = conn
            .prepare(
                "SELECT id, distance FROM memories_vec WHERE embedding MATCH ?1 AND k = ?2 ORDER BY distance",
            )?
            .query_map(params![embedding_to_bytes(&vector), top_k as i64], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let payloads = fetch_payloads(&conn, neighbours.iter().map(|(id, _)| id.as_str()))?;

        Ok(neighbours
            .into_iter()
            .filter_map(|(id, distance)| {
                let data = payloads.get(&id)?.clone();
                Some(ScoredMemory {
                    score: l2_to_cosine(distance),
                    id,
                    data,
                })
            })
            .collect())
    }
}

fn fetch_payloads<'a>(
    conn: &Connection,
    ids: impl Iterator<Item = &'a str>,
) -> Result<HashMap<String, String>> {
    let mut stmt = conn.prepare_cached("SELECT data FROM memories WHERE id = ?1")?;
    let mut out = HashMap::new();
    for id in ids {
        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            out.insert(id.to_string(), row.get(0)?);
        }
    }
    Ok(out)
}

fn l2_to_cosine(distance: f64) -> f32 {
    (1.0 - distance * distance / 2.0) as f32
}

/// View an f32 slice as the raw little-endian bytes sqlite-vec expects.
pub fn embedding_to_bytes(embedding: &[f32]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            embedding.as_ptr() as *const u8,
            std::mem::size_of_val(embedding),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::embedding::hash::HashEmbeddingProvider;
    use crate::memory::{add_memory, get_memory, search_memory};

    fn test_index() -> SqliteVectorIndex {
        let conn = db::open_memory_database().unwrap();
        SqliteVectorIndex::new(
            Arc::new(Mutex::new(conn)),
            Arc::new(HashEmbeddingProvider::new()),
        )
    }

    #[test]
    fn l2_to_cosine_endpoints() {
        assert!((l2_to_cosine(0.0) - 1.0).abs() < 1e-6);
        assert!(l2_to_cosine(2f64.sqrt()).abs() < 1e-6);
        assert!((l2_to_cosine(2.0) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn upsert_then_query_ranks_closest_first() {
        let index = test_index();
        index.upsert("rust", "rust ownership and borrowing").unwrap();
        index.upsert("python", "python decorators and generators").unwrap();

        let hits = index.query("ownership borrowing", 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "rust");
        assert_eq!(hits[0].data, "rust ownership and borrowing");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn upsert_replaces_existing_entry() {
        let index = test_index();
        index.upsert("m1", "first version").unwrap();
        index.upsert("m1", "second version").unwrap();

        let hits = index.query("second version", 5).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].data, "second version");
        assert!((hits[0].score - 1.0).abs() < 1e-4);
    }

    #[test]
    fn top_k_limits_results() {
        let index = test_index();
        for i in 0..5 {
            index.upsert(&format!("m{i}"), &format!("note number{i}")).unwrap();
        }
        assert_eq!(index.query("note", 3).unwrap().len(), 3);
        assert!(index.query("note", 0).unwrap().is_empty());
    }

    #[test]
    fn query_on_empty_index() {
        let index = test_index();
        assert!(index.query("anything", 5).unwrap().is_empty());
    }

    #[test]
    fn memory_operations_round_trip() {
        let index = test_index();
        add_memory(&index, "rust-facts", "rust facts about ownership", Some("lang")).unwrap();
        add_memory(&index, "python-tips", "python tips for decorators", None).unwrap();

        let found = get_memory(&index, "rust-facts").unwrap().unwrap();
        assert_eq!(found.data, "rust facts about ownership [metadata: lang]");

        let results = search_memory(&index, "decorators", 1).unwrap();
        assert_eq!(results[0].id, "python-tips");
    }
}
