//! Agent orchestrator
//!
//! The facade front ends talk to. Coordinates the model, the dataset tools and
//! a conversation transcript in a capped tool-calling loop
//! (Thought → Action → Observation).

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::agent::loop_state::{AgentLoopState, Observation};
use crate::agent::prompt::resolve_system_prompt;
use crate::agent::transcript::Transcript;
use crate::core::{Config, Message, Result, ToolCall, ToolResult};
use crate::dataset::Dataset;
use crate::llm::{create_provider, GenerateOptions, LLMProvider};
use crate::tools::ToolRegistry;

/// Returned when the model stops without saying anything
pub const EMPTY_ANSWER_MESSAGE: &str = "I apologize, but I couldn't generate a response.";

/// Per-agent settings resolved from configuration
#[derive(Debug, Clone)]
pub struct AgentSettings {
    /// Model name passed to the provider
    pub model: String,
    /// Maximum model calls per question
    pub max_iterations: usize,
    /// System instruction sent first in every request
    pub system_prompt: String,
    /// Human description of the dataset
    pub description: String,
    /// Sampling options
    pub options: Option<GenerateOptions>,
}

impl AgentSettings {
    /// Resolve settings from configuration
    pub fn from_config(config: &Config) -> Self {
        let options = match (config.llm.temperature, config.llm.max_tokens) {
            (None, None) => None,
            (temperature, max_tokens) => Some(GenerateOptions {
                temperature,
                max_tokens,
            }),
        };

        Self {
            model: config.llm.model.clone(),
            max_iterations: config.agent.max_iterations,
            system_prompt: resolve_system_prompt(
                config.agent.system_prompt.as_deref(),
                &config.dataset.description,
                &config.dataset.table_name,
            ),
            description: config.dataset.description.clone(),
            options,
        }
    }
}

/// Main agent that orchestrates LLM and tools
pub struct Agent {
    /// LLM client
    llm: Arc<dyn LLMProvider>,
    /// Tool registry
    tools: Arc<ToolRegistry>,
    settings: AgentSettings,
}

impl Agent {
    /// Create an agent from its parts
    pub fn new(llm: Arc<dyn LLMProvider>, tools: Arc<ToolRegistry>, settings: AgentSettings) -> Self {
        Self {
            llm,
            tools,
            settings,
        }
    }

    /// Load the dataset and connect the configured provider
    pub fn from_config(config: &Config) -> Result<Self> {
        let dataset = Arc::new(Dataset::load(&config.dataset)?);
        let tools = Arc::new(ToolRegistry::new(dataset));
        let llm = create_provider(config)?;

        info!(
            provider = llm.name(),
            model = %config.llm.model,
            max_iterations = config.agent.max_iterations,
            "Agent ready"
        );

        Ok(Self::new(llm, tools, AgentSettings::from_config(config)))
    }

    /// Answer a question in the context of a transcript without modifying it
    ///
    /// The loop ends when:
    /// 1. The model produces a response without tool calls (final answer)
    /// 2. `max_iterations` model calls have been made (partial answer)
    pub async fn answer(&self, question: &str, transcript: &Transcript) -> Result<String> {
        let mut messages = Vec::with_capacity(transcript.len() + 2);
        messages.push(Message::system(self.settings.system_prompt.clone()));
        messages.extend(transcript.messages().iter().cloned());
        messages.push(Message::user(question));

        let mut state = AgentLoopState::new(self.settings.max_iterations);

        debug!(
            history = transcript.len(),
            max_turns = state.max_turns,
            "Starting tool-calling loop"
        );

        while state.should_continue() {
            let turn = state.turn + 1;
            debug!(turn, max_turns = state.max_turns, "Calling model");

            let response = self
                .llm
                .chat_with_tools(
                    &self.settings.model,
                    &messages,
                    self.tools.definitions(),
                    self.settings.options.clone(),
                )
                .await?;
            state.next_turn();

            // No tool calls = final answer
            if response.tool_calls.is_empty() {
                let content = response.content.trim();
                state.final_answer = Some(if content.is_empty() {
                    EMPTY_ANSWER_MESSAGE.to_string()
                } else {
                    content.to_string()
                });
                debug!(turn, "Final answer received");
                break;
            }

            state.record_partial(&response.content);
            messages.push(Message::assistant_with_tools(
                response.content.clone(),
                response.tool_calls.clone(),
            ));

            for tool_call in &response.tool_calls {
                let result = self.execute_tool(tool_call).await;
                messages.push(Message::tool(
                    tool_call.id.clone(),
                    result.to_message_content(),
                ));
                state.add_observation(Observation::from(result));
            }
        }

        let answer = match state.final_answer.take() {
            Some(answer) => answer,
            None => {
                warn!(
                    max_turns = state.max_turns,
                    observations = state.observations.len(),
                    failed_tools = ?state.failed_tools(),
                    "Iteration limit reached; returning partial answer"
                );
                state.partial_answer()
            }
        };

        info!(
            turns = state.turn,
            observations = state.observations.len(),
            "Question answered"
        );

        Ok(answer)
    }

    /// Answer a question and record the exchange on success
    pub async fn respond(&self, question: &str, transcript: &mut Transcript) -> Result<String> {
        let answer = self.answer(question, transcript).await?;
        transcript.record_exchange(question, answer.clone());
        Ok(answer)
    }

    /// Execute one tool call; failures become failed results for the model
    async fn execute_tool(&self, tool_call: &ToolCall) -> ToolResult {
        debug!(tool = %tool_call.name, arguments = %tool_call.arguments, "Executing tool");

        let result = match self.tools.execute(tool_call).await {
            Ok(result) => result,
            Err(e) => ToolResult::failure(&tool_call.name, e.to_string()),
        };

        if result.success {
            debug!(tool = %result.tool_name, "Tool succeeded");
        } else {
            warn!(tool = %result.tool_name, error = %result.output, "Tool failed");
        }
        result
    }

    /// Model name
    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// Human description of the dataset
    pub fn description(&self) -> &str {
        &self.settings.description
    }

    /// Tool registry
    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tools
    }

    /// Provider name
    pub fn provider_name(&self) -> &str {
        self.llm.name()
    }
}
