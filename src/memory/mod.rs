//! Semantic memory: id-keyed text recalled by vector similarity.
//!
//! All similarity work happens in a [`VectorIndex`]. The functions here only
//! fold metadata into the stored payload and interpret top-1 results as
//! id lookups.

pub mod index;

use anyhow::Result;
use serde::Serialize;

/// One ranked hit from a [`VectorIndex`] query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredMemory {
    pub id: String,
    /// Cosine similarity to the query, higher is closer.
    pub score: f32,
    pub data: String,
}

/// External similarity index.
pub trait VectorIndex: Send + Sync {
    /// Embed `data` and store it under `id`, replacing any previous entry.
    fn upsert(&self, id: &str, data: &str) -> Result<()>;

    /// Up to `top_k` entries ranked by similarity to `data`, best first.
    fn query(&self, data: &str, top_k: usize) -> Result<Vec<ScoredMemory>>;
}

/// The payload stored for a memory: content, with metadata appended when present.
pub fn memory_payload(content: &str, metadata: Option<&str>) -> String {
    match metadata {
        Some(meta) if !meta.is_empty() => format!("{content} [metadata: {meta}]"),
        _ => content.to_string(),
    }
}

pub fn add_memory<I>(index: &I, id: &str, content: &str, metadata: Option<&str>) -> Result<()>
where
    I: VectorIndex + ?Sized,
{
    let data = memory_payload(content, metadata);
    index.upsert(id, &data)?;
    tracing::debug!(id = %id, data_len = data.len(), "memory upserted");
    Ok(())
}

pub fn search_memory<I>(index: &I, query: &str, top_k: usize) -> Result<Vec<ScoredMemory>>
where
    I: VectorIndex + ?Sized,
{
    index.query(query, top_k)
}

/// Look a memory up by id.
///
/// The index has no exact-key read, so this embeds the id itself and takes
/// the single nearest entry. It is a hit only if that entry carries the same
/// id; a memory whose text is dissimilar to its id can be missed.
pub fn get_memory<I>(index: &I, id: &str) -> Result<Option<ScoredMemory>>
where
    I: VectorIndex + ?Sized,
{
    let top = index.query(id, 1)?.into_iter().next();
    Ok(top.filter(|m| m.id == id))
}

/// `"Found N memories:\n1. ID: ..., Score: 0.1234, Content: ...\n"`.
pub fn format_search_results(results: &[ScoredMemory]) -> String {
    if results.is_empty() {
        return "No memories found matching your query".to_string();
    }
    let mut out = format!("Found {} memories:\n", results.len());
    for (i, m) in results.iter().enumerate() {
        out.push_str(&format!(
            "{}. ID: {}, Score: {:.4}, Content: {}\n",
            i + 1,
            m.id,
            m.score,
            m.data
        ));
    }
    out
}
