use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use std::sync::Arc;

use papermind::papers::resolver;
use papermind::papers::KeyValueStore;

use super::blocking;
use super::get_research_paper::GetResearchPaperParams;
use super::set_research_paper::SetResearchPaperParams;

/// Handler for the research paper service.
#[derive(Clone)]
pub struct PaperTools {
    tool_router: ToolRouter<Self>,
    store: Arc<dyn KeyValueStore>,
    max_distance: usize,
}

#[tool_router]
impl PaperTools {
    pub fn new(store: Arc<dyn KeyValueStore>, max_distance: usize) -> Self {
        Self {
            tool_router: Self::tool_router(),
            store,
            max_distance,
        }
    }

    #[tool(name = "set-new-research-paper", description = "Add a new research paper")]
    async fn set_new_research_paper(
        &self,
        Parameters(params): Parameters<SetResearchPaperParams>,
    ) -> Result<String, String> {
        if params.title.is_empty() {
            return Err("argument 'title' must not be empty".into());
        }
        let summarization = params.summarization.unwrap_or_default();

        tracing::info!(
            title = %params.title,
            summary_len = summarization.len(),
            "set-new-research-paper called"
        );

        let store = Arc::clone(&self.store);
        let title = params.title;
        blocking(move || {
            store.set(&title, &summarization).map_err(|e| {
                tracing::warn!(title = %title, error = %e, "paper write failed");
                e.to_string()
            })
        })
        .await?;

        Ok("Successful update of the knowledge base".into())
    }

    #[tool(
        name = "get-research-paper",
        description = "Get the content of a research paper based on its name. Falls back to the closest title within a small edit distance."
    )]
    async fn get_research_paper(
        &self,
        Parameters(params): Parameters<GetResearchPaperParams>,
    ) -> Result<String, String> {
        if params.title.is_empty() {
            return Err("argument 'title' must not be empty".into());
        }
        tracing::info!(title = %params.title, "get-research-paper called");

        let store = Arc::clone(&self.store);
        let max_distance = self.max_distance;
        let title = params.title.clone();
        let outcome = blocking(move || {
            resolver::resolve(&title, store.as_ref(), max_distance).map_err(|e| {
                tracing::warn!(title = %title, error = %e, "paper lookup failed");
                e.to_string()
            })
        })
        .await?;

        Ok(outcome.to_response(&params.title))
    }
}

#[tool_handler]
impl ServerHandler for PaperTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "Research paper memory. Use set-new-research-paper to store a paper summary \
                 under its title and get-research-paper to fetch it; slightly misspelled \
                 titles resolve to the closest stored title."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
