//! MCP `add-to-memory` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `add-to-memory` MCP tool. Upserts on `id`.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddToMemoryParams {
    #[schemars(description = "Unique identifier for the memory")]
    pub id: String,

    #[schemars(description = "The memory content to store")]
    pub content: String,

    /// Appended to the stored text as `[metadata: ...]`.
    #[schemars(description = "Additional metadata for the memory")]
    pub metadata: Option<String>,
}
