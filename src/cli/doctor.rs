//! CLI `doctor` command: database diagnostics.

use anyhow::{Context, Result};

use papermind::config::PapermindConfig;
use papermind::db;

pub fn doctor(config: &PapermindConfig, json: bool) -> Result<()> {
    let db_path = config.resolved_db_path();

    if !db_path.exists() {
        println!("Database: not found at {}", db_path.display());
        println!("Run `papermind serve papers` or `papermind paper set` to create it.");
        return Ok(());
    }

    let conn = db::open_database(&db_path).context("failed to open database (may be corrupt)")?;
    let report = db::check_database_health(&conn).context("failed to run health check")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

    println!("papermind health report");
    println!("=======================");
    println!();
    println!("Database:          {}", db_path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!("Schema version:    {}", report.schema_version);
    println!("sqlite-vec:        {}", report.sqlite_vec_version);
    println!();
    println!(
        "Embedding model:   {} (configured provider: {})",
        report.embedding_model.as_deref().unwrap_or("(not set)"),
        config.embedding.provider
    );
    println!();
    println!("Papers:            {}", report.paper_count);
    println!("Memories:          {}", report.memory_count);
    println!(
        "Fuzzy lookup:      max distance {}, full scan of {} title(s) per miss",
        config.papers.max_distance, report.paper_count
    );
    println!();
    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_details);
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
