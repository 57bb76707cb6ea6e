//! Query tool
//!
//! Runs model-written SQL against the dataset table and returns the rows as
//! text.

use std::sync::Arc;

use crate::core::{AnalystError, Result, ToolCall, ToolDefinition, ToolResult};
use crate::dataset::Dataset;

/// Tool for running read-only SQL against the dataset
pub struct QueryTool {
    dataset: Arc<Dataset>,
}

impl QueryTool {
    pub const NAME: &'static str = "run_query";

    /// Create a new query tool
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            Self::NAME,
            format!(
                "Run one read-only SQLite SELECT statement against the table \"{}\" to answer \
                 questions. The data is already loaded. Quote column names containing spaces \
                 with double quotes. Returns the result rows as a text table.",
                self.dataset.table_name()
            ),
            serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The SQL SELECT statement to run"
                    }
                },
                "required": ["query"]
            }),
        )
    }

    /// Pull the SQL text out of the call arguments
    pub fn extract_query(tool_call: &ToolCall) -> Option<String> {
        let raw = match &tool_call.arguments {
            serde_json::Value::String(s) => Some(s.clone()),
            _ => tool_call
                .get_string("query")
                .or_else(|| tool_call.get_string("sql")),
        }?;

        let sql = sanitize(&raw);
        (!sql.is_empty()).then_some(sql)
    }

    /// Execute on the blocking pool; query failures become failed results
    pub async fn execute(&self, tool_call: &ToolCall) -> Result<ToolResult> {
        let Some(sql) = Self::extract_query(tool_call) else {
            return Ok(ToolResult::failure(
                Self::NAME,
                "Missing required argument 'query'",
            ));
        };

        let dataset = Arc::clone(&self.dataset);
        let outcome = tokio::task::spawn_blocking(move || dataset.run_query(&sql))
            .await
            .map_err(|e| AnalystError::tool(format!("Query task failed: {}", e)))?;

        match outcome {
            Ok(output) => Ok(ToolResult::success(Self::NAME, output.render())),
            Err(e) => Ok(ToolResult::failure(Self::NAME, e.to_string())),
        }
    }
}

/// Strip Markdown code fences and a leading `sql` tag in any case
fn sanitize(input: &str) -> String {
    let mut text = input.trim();
    text = text.trim_start_matches("```").trim_end_matches("```").trim();
    let tagged = text.get(..3).is_some_and(|tag| tag.eq_ignore_ascii_case("sql"));
    if tagged && text[3..].starts_with(char::is_whitespace) {
        text = text[3..].trim();
    }
    text.trim_matches('`').trim().to_string()
}
