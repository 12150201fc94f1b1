use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use std::sync::Arc;

use papermind::memory::{self as mem, VectorIndex};

use super::add_to_memory::AddToMemoryParams;
use super::blocking;
use super::get_memory::GetMemoryParams;
use super::search_memory::{SearchMemoryParams, TopK};

/// Handler for the semantic memory service.
#[derive(Clone)]
pub struct MemoryTools {
    tool_router: ToolRouter<Self>,
    index: Arc<dyn VectorIndex>,
    default_top_k: usize,
    max_top_k: usize,
}

#[tool_router]
impl MemoryTools {
    pub fn new(index: Arc<dyn VectorIndex>, default_top_k: usize, max_top_k: usize) -> Self {
        Self {
            tool_router: Self::tool_router(),
            index,
            default_top_k,
            max_top_k,
        }
    }

    #[tool(name = "add-to-memory", description = "Add a new memory or update an existing memory")]
    async fn add_to_memory(
        &self,
        Parameters(params): Parameters<AddToMemoryParams>,
    ) -> Result<String, String> {
        if params.id.is_empty() {
            return Err("argument 'id' must not be empty".into());
        }
        if params.content.is_empty() {
            return Err("argument 'content' must not be empty".into());
        }
        tracing::info!(
            id = %params.id,
            content_len = params.content.len(),
            has_metadata = params.metadata.is_some(),
            "add-to-memory called"
        );

        let index = Arc::clone(&self.index);
        let id = params.id.clone();
        blocking(move || {
            mem::add_memory(index.as_ref(), &id, &params.content, params.metadata.as_deref())
                .map_err(|e| format!("error storing memory: {e:#}"))
        })
        .await?;

        Ok(format!("Successfully stored memory with ID: {}", params.id))
    }

    #[tool(name = "search-memory", description = "Search for memories using semantic similarity")]
    async fn search_memory(
        &self,
        Parameters(params): Parameters<SearchMemoryParams>,
    ) -> Result<String, String> {
        let top_k = TopK::resolve(params.top_k.as_ref(), self.default_top_k, self.max_top_k);
        tracing::info!(query = %params.query, top_k, "search-memory called");

        let index = Arc::clone(&self.index);
        let results = blocking(move || {
            mem::search_memory(index.as_ref(), &params.query, top_k)
                .map_err(|e| format!("error searching memories: {e:#}"))
        })
        .await?;

        Ok(mem::format_search_results(&results))
    }

    #[tool(name = "get-memory", description = "Get a specific memory by ID")]
    async fn get_memory(
        &self,
        Parameters(params): Parameters<GetMemoryParams>,
    ) -> Result<String, String> {
        tracing::info!(id = %params.id, "get-memory called");

        let index = Arc::clone(&self.index);
        let id = params.id.clone();
        let found = blocking(move || {
            mem::get_memory(index.as_ref(), &id)
                .map_err(|e| format!("error retrieving memory: {e:#}"))
        })
        .await?;

        Ok(match found {
            Some(m) => format!("Memory ID: {}\nContent: {}", m.id, m.data),
            None => format!("Memory with ID '{}' not found", params.id),
        })
    }
}

#[tool_handler]
impl ServerHandler for MemoryTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "Semantic memory. Use add-to-memory to store text under an id, search-memory \
                 for similarity search, and get-memory to fetch by id."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use papermind::db;
    use papermind::embedding::hash::HashEmbeddingProvider;
    use papermind::memory::index::SqliteVectorIndex;
    use std::sync::Mutex;

    fn tools() -> MemoryTools {
        let conn = db::open_memory_database().unwrap();
        let index = SqliteVectorIndex::new(
            Arc::new(Mutex::new(conn)),
            Arc::new(HashEmbeddingProvider::new()),
        );
        MemoryTools::new(Arc::new(index), 5, 100)
    }

    async fn add(tools: &MemoryTools, id: &str, content: &str, metadata: Option<&str>) -> Result<String, String> {
        tools
            .add_to_memory(Parameters(AddToMemoryParams {
                id: id.into(),
                content: content.into(),
                metadata: metadata.map(Into::into),
            }))
            .await
    }

    #[tokio::test]
    async fn add_then_get() {
        let tools = tools();
        assert_eq!(
            add(&tools, "rust-facts", "rust facts about ownership", Some("lang")).await.unwrap(),
            "Successfully stored memory with ID: rust-facts"
        );
        add(&tools, "python-tips", "python tips for decorators", None).await.unwrap();

        let got = tools
            .get_memory(Parameters(GetMemoryParams {
                id: "rust-facts".into(),
            }))
            .await
            .unwrap();
        assert_eq!(
            got,
            "Memory ID: rust-facts\nContent: rust facts about ownership [metadata: lang]"
        );
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let tools = tools();
        let got = tools
            .get_memory(Parameters(GetMemoryParams { id: "missing".into() }))
            .await
            .unwrap();
        assert_eq!(got, "Memory with ID 'missing' not found");
    }

    #[tokio::test]
    async fn search_lists_ranked_hits() {
        let tools = tools();
        add(&tools, "a", "graph neural networks", None).await.unwrap();
        add(&tools, "b", "protein folding", None).await.unwrap();

        let out = tools
            .search_memory(Parameters(SearchMemoryParams {
                query: "neural networks".into(),
                top_k: Some(TopK::Text("1".into())),
            }))
            .await
            .unwrap();
        assert!(out.starts_with("Found 1 memories:\n1. ID: a, Score: "), "{out}");
        assert!(out.ends_with("Content: graph neural networks\n"));
    }

    #[tokio::test]
    async fn search_empty_store() {
        let tools = tools();
        let out = tools
            .search_memory(Parameters(SearchMemoryParams {
                query: "anything".into(),
                top_k: None,
            }))
            .await
            .unwrap();
        assert_eq!(out, "No memories found matching your query");
    }

    #[tokio::test]
    async fn empty_fields_rejected() {
        let tools = tools();
        assert!(add(&tools, "", "x", None).await.is_err());
        assert!(add(&tools, "id", "", None).await.is_err());
    }
}
