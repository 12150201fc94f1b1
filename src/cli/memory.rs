use anyhow::Result;
use std::sync::{Arc, Mutex};

use papermind::config::PapermindConfig;
use papermind::memory::index::SqliteVectorIndex;
use papermind::memory::{format_search_results, search_memory};

/// Run a similarity search from the terminal.
pub async fn search(config: &PapermindConfig, query: &str, top_k: Option<usize>) -> Result<()> {
    let conn = papermind::db::open_database(config.resolved_db_path())?;
    let provider = papermind::embedding::create_provider(&config.embedding)?;
    let index = SqliteVectorIndex::new(Arc::new(Mutex::new(conn)), Arc::from(provider));

    let top_k = top_k
        .unwrap_or(config.memory.default_top_k)
        .clamp(1, config.memory.max_top_k.max(1));
    let query = query.to_string();
    let results =
        tokio::task::spawn_blocking(move || search_memory(&index, &query, top_k)).await??;

    print!("{}", format_search_results(&results));
    Ok(())
}
