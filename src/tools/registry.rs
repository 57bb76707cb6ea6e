//! Tool registry - manages and dispatches tool calls
//!
//! Registers the two dataset tools under stable names and routes the model's
//! tool calls to them.

use std::sync::Arc;

use crate::core::{Result, ToolCall, ToolDefinition, ToolResult};
use crate::dataset::Dataset;
use crate::tools::inspect::InspectTool;
use crate::tools::query::QueryTool;

/// Registry of available tools
pub struct ToolRegistry {
    /// Tool definitions in registration order
    definitions: Vec<ToolDefinition>,
    dataset: Arc<Dataset>,
    inspect_tool: InspectTool,
    query_tool: QueryTool,
}

impl ToolRegistry {
    /// Create a registry exposing the dataset tools
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let inspect_tool = InspectTool::new(Arc::clone(&dataset));
        let query_tool = QueryTool::new(Arc::clone(&dataset));
        let definitions = vec![inspect_tool.definition(), query_tool.definition()];

        Self {
            definitions,
            dataset,
            inspect_tool,
            query_tool,
        }
    }

    /// Get all tool definitions
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Names of the registered tools
    pub fn names(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.name()).collect()
    }

    /// The dataset the tools operate on
    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// Execute a tool call
    pub async fn execute(&self, tool_call: &ToolCall) -> Result<ToolResult> {
        match tool_call.name.as_str() {
            InspectTool::NAME => self.inspect_tool.execute(tool_call).await,
            QueryTool::NAME => self.query_tool.execute(tool_call).await,
            _ => Ok(ToolResult::failure(
                &tool_call.name,
                format!(
                    "Unknown tool: {}. Available tools: {}",
                    tool_call.name,
                    self.names().join(", ")
                ),
            )),
        }
    }
}
