//! MCP tool handlers.
//!
//! [`PaperTools`] serves the research paper store and [`MemoryTools`] the
//! semantic memory. Parameter structs live one per tool in sibling modules.

pub mod add_to_memory;
pub mod get_memory;
pub mod get_research_paper;
pub mod memory;
pub mod papers;
pub mod search_memory;
pub mod set_research_paper;

pub use memory::MemoryTools;
pub use papers::PaperTools;

/// Run synchronous store or embedding work on the blocking pool.
async fn blocking<T, F>(work: F) -> Result<T, String>
where
    F: FnOnce() -> Result<T, String> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| format!("task failed: {e}"))?
}
