//! Inspect tool
//!
//! Describes the dataset: shape, column types, first rows, missing values.

use std::sync::Arc;

use crate::core::{AnalystError, Result, ToolCall, ToolDefinition, ToolResult};
use crate::dataset::Dataset;

/// Tool for inspecting the loaded dataset
pub struct InspectTool {
    dataset: Arc<Dataset>,
}

impl InspectTool {
    pub const NAME: &'static str = "inspect_dataset";

    /// Create a new inspect tool
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            Self::NAME,
            "Inspect the CSV dataset. Returns the number of rows and columns, column names \
             with their types, the first 3 rows, and the count of missing values per column.",
            serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        )
    }

    /// Any arguments are ignored. Runs on the blocking pool like queries do.
    pub async fn execute(&self, _tool_call: &ToolCall) -> Result<ToolResult> {
        let dataset = Arc::clone(&self.dataset);
        let outcome = tokio::task::spawn_blocking(move || dataset.summary())
            .await
            .map_err(|e| AnalystError::tool(format!("Inspect task failed: {}", e)))?;

        match outcome {
            Ok(summary) => Ok(ToolResult::success(Self::NAME, summary)),
            Err(e) => Ok(ToolResult::failure(Self::NAME, e.to_string())),
        }
    }
}
