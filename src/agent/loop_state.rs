//! Agent loop state management
//!
//! Tracks the state of the tool-calling loop including observations from
//! tool executions and the text the model emitted along the way.

use crate::core::ToolResult;

/// Returned when the cap is hit before the model produced anything usable
pub const ITERATION_LIMIT_MESSAGE: &str = "Agent stopped due to iteration limit.";

/// State of the agent reasoning loop
#[derive(Debug, Clone)]
pub struct AgentLoopState {
    /// Model calls made so far
    pub turn: usize,
    /// Maximum allowed model calls
    pub max_turns: usize,
    /// Observations collected from tool executions
    pub observations: Vec<Observation>,
    /// Final answer if the model stopped calling tools
    pub final_answer: Option<String>,
    /// Last non-empty text the model sent alongside tool calls
    pub last_partial_text: Option<String>,
}

impl AgentLoopState {
    /// Create a new loop state with the given max turns
    pub fn new(max_turns: usize) -> Self {
        Self {
            turn: 0,
            max_turns,
            observations: Vec::new(),
            final_answer: None,
            last_partial_text: None,
        }
    }

    /// Check if the loop should continue
    pub fn should_continue(&self) -> bool {
        self.turn < self.max_turns && self.final_answer.is_none()
    }

    /// Remember text produced together with tool calls
    pub fn record_partial(&mut self, content: &str) {
        let text = content.trim();
        if !text.is_empty() {
            self.last_partial_text = Some(text.to_string());
        }
    }

    /// Add a single observation
    pub fn add_observation(&mut self, observation: Observation) {
        self.observations.push(observation);
    }

    /// Increment the turn counter
    pub fn next_turn(&mut self) {
        self.turn += 1;
    }

    /// Names of tools that failed, in call order
    pub fn failed_tools(&self) -> Vec<&str> {
        self.observations
            .iter()
            .filter(|obs| !obs.success)
            .map(|obs| obs.tool_name.as_str())
            .collect()
    }

    /// Answer to return when the loop was stopped by the cap
    pub fn partial_answer(&self) -> String {
        if let Some(text) = &self.last_partial_text {
            return text.clone();
        }

        self.observations
            .iter()
            .rev()
            .find(|obs| obs.success && !obs.output.trim().is_empty())
            .map(|obs| obs.output.clone())
            .unwrap_or_else(|| ITERATION_LIMIT_MESSAGE.to_string())
    }
}

/// An observation from a tool execution
#[derive(Debug, Clone)]
pub struct Observation {
    /// Name of the tool that produced this observation
    pub tool_name: String,
    /// Whether the tool execution was successful
    pub success: bool,
    /// Output from the tool
    pub output: String,
}

impl Observation {
    /// Create a successful observation
    pub fn success(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            output: output.into(),
        }
    }

    /// Create an error observation
    pub fn error(tool_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            output: error.into(),
        }
    }
}

impl From<ToolResult> for Observation {
    fn from(result: ToolResult) -> Self {
        Self {
            tool_name: result.tool_name,
            success: result.success,
            output: result.output,
        }
    }
}
