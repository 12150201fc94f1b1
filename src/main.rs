mod cli;
mod server;
mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use papermind::config::PapermindConfig;
use server::{Service, Transport};

#[derive(Parser)]
#[command(name = "papermind", version, about = "Research paper and semantic memory MCP servers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start an MCP server
    Serve {
        #[arg(value_enum)]
        service: Service,
        /// Overrides `server.transport` from the config file
        #[arg(long, value_enum)]
        transport: Option<Transport>,
    },
    /// Store or look up research papers directly
    Paper {
        #[command(subcommand)]
        action: PaperAction,
    },
    /// Query the semantic memory
    Memory {
        #[command(subcommand)]
        action: MemoryAction,
    },
    /// Manage the embedding model
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },
    /// Check database health
    Doctor {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum PaperAction {
    /// Store a paper summary under its title
    Set {
        title: String,
        #[arg(long, default_value = "")]
        summary: String,
    },
    /// Fetch a paper by title, tolerating small typos
    Get { title: String },
    /// List stored titles in enumeration order
    List,
}

#[derive(Subcommand)]
enum MemoryAction {
    /// Similarity search over stored memories
    Search {
        query: String,
        #[arg(long)]
        top_k: Option<usize>,
    },
}

#[derive(Subcommand)]
enum ModelAction {
    /// Download the embedding model to ~/.papermind/models/
    Download,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = PapermindConfig::load()?;

    // stderr keeps stdout clean for MCP JSON-RPC over stdio.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { service, transport } => {
            let transport = match transport {
                Some(t) => t,
                None => config
                    .server
                    .transport
                    .parse::<Transport>()
                    .map_err(anyhow::Error::msg)?,
            };
            server::serve(config, service, transport).await?;
        }
        Command::Paper { action } => match action {
            PaperAction::Set { title, summary } => cli::paper::set(&config, &title, &summary)?,
            PaperAction::Get { title } => cli::paper::get(&config, &title)?,
            PaperAction::List => cli::paper::list(&config)?,
        },
        Command::Memory { action } => match action {
            MemoryAction::Search { query, top_k } => {
                cli::memory::search(&config, &query, top_k).await?
            }
        },
        Command::Model { action } => match action {
            ModelAction::Download => cli::model_download(&config.embedding).await?,
        },
        Command::Doctor { json } => cli::doctor::doctor(&config, json)?,
    }

    Ok(())
}
