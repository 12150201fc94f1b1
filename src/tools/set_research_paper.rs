use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SetResearchPaperParams {
    #[schemars(description = "The name of the paper")]
    pub title: String,

    #[schemars(description = "The main content of the paper")]
    pub summarization: Option<String>,
}
