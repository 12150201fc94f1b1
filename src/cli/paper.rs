//! `papermind paper ...`: read and write papers without an MCP client.

use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};

use papermind::config::PapermindConfig;
use papermind::db;
use papermind::papers::resolver;
use papermind::papers::store::SqlitePaperStore;
use papermind::papers::KeyValueStore;

fn open_store(config: &PapermindConfig) -> Result<SqlitePaperStore> {
    let conn = db::open_database(config.resolved_db_path())?;
    Ok(SqlitePaperStore::with_page_size(
        Arc::new(Mutex::new(conn)),
        config.papers.scan_page_size,
    ))
}

pub fn set(config: &PapermindConfig, title: &str, summary: &str) -> Result<()> {
    anyhow::ensure!(!title.is_empty(), "title must not be empty");
    open_store(config)?
        .set(title, summary)
        .context("failed to store paper")?;
    println!("Successful update of the knowledge base");
    Ok(())
}

pub fn get(config: &PapermindConfig, title: &str) -> Result<()> {
    anyhow::ensure!(!title.is_empty(), "title must not be empty");
    let store = open_store(config)?;
    let outcome = resolver::resolve(title, &store, config.papers.max_distance)?;
    println!("{}", outcome.to_response(title));
    Ok(())
}

pub fn list(config: &PapermindConfig) -> Result<()> {
    let keys = open_store(config)?.keys().context("failed to list papers")?;
    if keys.is_empty() {
        println!("No papers stored.");
        return Ok(());
    }
    for key in &keys {
        println!("{key}");
    }
    println!("\n{} paper(s)", keys.len());
    Ok(())
}
