use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetResearchPaperParams {
    #[schemars(description = "The name of the paper")]
    pub title: String,
}
