//! MCP server startup for both services over stdio or streamable HTTP.
//!
//! The database is opened once here and shared by every request through an
//! `Arc<Mutex<Connection>>`; it is closed when the server returns.

use anyhow::Result;
use rmcp::ServiceExt;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use papermind::config::PapermindConfig;
use papermind::db;
use papermind::embedding;
use papermind::memory::index::SqliteVectorIndex;
use papermind::memory::VectorIndex;
use papermind::papers::store::SqlitePaperStore;
use papermind::papers::KeyValueStore;

use crate::tools::{MemoryTools, PaperTools};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Service {
    Papers,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Transport {
    Stdio,
    Http,
}

impl std::str::FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdio" => Ok(Self::Stdio),
            "http" | "sse" => Ok(Self::Http),
            _ => Err(format!("unknown transport: {s}")),
        }
    }
}

fn open_shared_db(config: &PapermindConfig) -> Result<Arc<Mutex<Connection>>> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    tracing::info!(db = %db_path.display(), "database ready");
    Ok(Arc::new(Mutex::new(conn)))
}

fn paper_tools(config: &PapermindConfig) -> Result<PaperTools> {
    let db = open_shared_db(config)?;
    let store: Arc<dyn KeyValueStore> = Arc::new(SqlitePaperStore::with_page_size(
        db,
        config.papers.scan_page_size,
    ));
    Ok(PaperTools::new(store, config.papers.max_distance))
}

fn memory_tools(config: &PapermindConfig) -> Result<MemoryTools> {
    let db = open_shared_db(config)?;
    let provider: Arc<dyn embedding::EmbeddingProvider> =
        Arc::from(embedding::create_provider(&config.embedding)?);
    tracing::info!(model = provider.model_id(), "embedding provider ready");

    {
        let conn = db
            .lock()
            .map_err(|e| anyhow::anyhow!("db lock poisoned: {e}"))?;
        match db::migrations::get_embedding_model(&conn)? {
            Some(stored) if stored != provider.model_id() => tracing::warn!(
                stored = %stored,
                configured = %provider.model_id(),
                "embedding model changed; existing memory vectors are not comparable"
            ),
            Some(_) => {}
            None => db::migrations::set_embedding_model(&conn, provider.model_id())?,
        }
    }

    let index: Arc<dyn VectorIndex> = Arc::new(SqliteVectorIndex::new(db, provider));
    Ok(MemoryTools::new(
        index,
        config.memory.default_top_k,
        config.memory.max_top_k,
    ))
}

/// Run `service` until the client disconnects (stdio) or ctrl-c (http).
pub async fn serve(config: PapermindConfig, service: Service, transport: Transport) -> Result<()> {
    let port = match service {
        Service::Papers => config.server.papers_port,
        Service::Memory => config.server.memory_port,
    };
    match (service, transport) {
        (Service::Papers, Transport::Stdio) => serve_stdio(paper_tools(&config)?).await,
        (Service::Memory, Transport::Stdio) => serve_stdio(memory_tools(&config)?).await,
        (Service::Papers, Transport::Http) => {
            let tools = paper_tools(&config)?;
            serve_http(&config.server.host, port, move || Ok(tools.clone())).await
        }
        (Service::Memory, Transport::Http) => {
            let tools = memory_tools(&config)?;
            serve_http(&config.server.host, port, move || Ok(tools.clone())).await
        }
    }
}

async fn serve_stdio<H>(handler: H) -> Result<()>
where
    H: rmcp::ServerHandler,
{
    tracing::info!("starting MCP server on stdio");
    let server = handler.serve(rmcp::transport::stdio()).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");
    Ok(())
}

async fn serve_http<H, F>(host: &str, port: u16, factory: F) -> Result<()>
where
    H: rmcp::ServerHandler,
    F: Fn() -> std::io::Result<H> + Send + Sync + 'static,
{
    let bind_addr = format!("{host}:{port}");

    let service = rmcp::transport::streamable_http_server::StreamableHttpService::new(
        factory,
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default()
            .into(),
        Default::default(),
    );
    let router = axum::Router::new().nest_service("/mcp", service);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "MCP server listening at http://{bind_addr}/mcp");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
