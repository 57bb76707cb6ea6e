//! Shared fixtures for the integration tests
//!
//! Scripted in-process providers and a World Happiness Report shaped CSV.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use csv_analyst::agent::{Agent, AgentSettings};
use csv_analyst::core::{AnalystError, Message, Result, ToolCall, ToolDefinition};
use csv_analyst::dataset::Dataset;
use csv_analyst::llm::{GenerateOptions, LLMProvider, LLMResponse};
use csv_analyst::tools::ToolRegistry;
use parking_lot::Mutex;
use tempfile::TempDir;

pub const ROWS: usize = 156;

pub const COLUMNS: [&str; 9] = [
    "Overall rank",
    "Country or region",
    "Score",
    "GDP per capita",
    "Social support",
    "Healthy life expectancy",
    "Freedom to make life choices",
    "Generosity",
    "Perceptions of corruption",
];

const TOP_COUNTRIES: [&str; 5] = ["Finland", "Norway", "Denmark", "Iceland", "Switzerland"];

/// 156 rows in the 2018 report layout. Row 20 has `N/A` for corruption.
pub fn happiness_csv() -> String {
    let mut csv = COLUMNS.join(",");
    csv.push('\n');

    for rank in 1..=ROWS {
        let country = match rank {
            1..=5 => TOP_COUNTRIES[rank - 1].to_string(),
            20 => "United Arab Emirates".to_string(),
            _ => format!("Country {}", rank),
        };
        let step = (rank - 1) as f64;
        let corruption = if rank == 20 {
            "N/A".to_string()
        } else {
            format!("{:.3}", 0.4 - step * 0.002)
        };

        csv.push_str(&format!(
            "{},{},{:.3},{:.3},{:.3},{:.3},{:.3},{:.3},{}\n",
            rank,
            country,
            7.632 - step * 0.03,
            1.3 - step * 0.005,
            1.5 - step * 0.004,
            0.87 - step * 0.003,
            0.6 - step * 0.002,
            0.2 + (rank % 7) as f64 * 0.01,
            corruption
        ));
    }
    csv
}

/// Write the fixture to a temporary directory
pub fn write_happiness_csv() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("2018.csv");
    std::fs::write(&path, happiness_csv()).unwrap();
    (dir, path)
}

pub fn happiness_dataset() -> Dataset {
    Dataset::from_reader(happiness_csv().as_bytes(), "data", 50).unwrap()
}

pub fn settings(max_iterations: usize) -> AgentSettings {
    AgentSettings {
        model: "test-model".to_string(),
        max_iterations,
        system_prompt: csv_analyst::agent::build_system_prompt(
            "the World Happiness Report 2018",
            "data",
        ),
        description: "the World Happiness Report 2018".to_string(),
        options: None,
    }
}

/// Agent over the fixture dataset
pub fn build_agent(provider: Arc<dyn LLMProvider>, max_iterations: usize) -> Agent {
    let tools = ToolRegistry::new(Arc::new(happiness_dataset()));
    Agent::new(provider, Arc::new(tools), settings(max_iterations))
}

pub fn query_call(id: &str, sql: &str) -> ToolCall {
    ToolCall::new(id, "run_query", serde_json::json!({ "query": sql }))
}

/// Replays canned responses in order and records every request
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<LLMResponse>>,
    requests: Mutex<Vec<Vec<Message>>>,
    /// Returned for every call once the script is exhausted
    fallback: Option<LLMResponse>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<LLMResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            fallback: None,
        })
    }

    /// Answer every call with the same response
    pub fn repeating(response: LLMResponse) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            fallback: Some(response),
        })
    }

    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn chat_with_tools(
        &self,
        _model: &str,
        messages: &[Message],
        _tools: &[ToolDefinition],
        _options: Option<GenerateOptions>,
    ) -> Result<LLMResponse> {
        self.requests.lock().push(messages.to_vec());
        let next = self.responses.lock().pop_front();
        Ok(next
            .or_else(|| self.fallback.clone())
            .unwrap_or_else(|| LLMResponse::text("done")))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Answers with the previous user question it can see in the history
pub struct RecallProvider;

#[async_trait]
impl LLMProvider for RecallProvider {
    async fn chat_with_tools(
        &self,
        _model: &str,
        messages: &[Message],
        _tools: &[ToolDefinition],
        _options: Option<GenerateOptions>,
    ) -> Result<LLMResponse> {
        let users: Vec<&Message> = messages.iter().filter(|m| m.is_user()).collect();
        let answer = match users.len() {
            0 | 1 => "Previous question: none".to_string(),
            n => format!("Previous question: {}", users[n - 2].content),
        };
        Ok(LLMResponse::text(answer))
    }

    fn name(&self) -> &str {
        "recall"
    }
}

/// Always fails like an unreachable provider
pub struct FailingProvider;

#[async_trait]
impl LLMProvider for FailingProvider {
    async fn chat_with_tools(
        &self,
        _model: &str,
        _messages: &[Message],
        _tools: &[ToolDefinition],
        _options: Option<GenerateOptions>,
    ) -> Result<LLMResponse> {
        Err(AnalystError::provider("Cannot connect to http://127.0.0.1:9"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Sleeps before answering with the question it was asked
pub struct SlowEchoProvider {
    pub delay: std::time::Duration,
}

#[async_trait]
impl LLMProvider for SlowEchoProvider {
    async fn chat_with_tools(
        &self,
        _model: &str,
        messages: &[Message],
        _tools: &[ToolDefinition],
        _options: Option<GenerateOptions>,
    ) -> Result<LLMResponse> {
        let question = messages
            .iter()
            .rev()
            .find(|m| m.is_user())
            .map(|m| m.content.clone())
            .unwrap_or_default();
        tokio::time::sleep(self.delay).await;
        Ok(LLMResponse::text(format!("answer to: {}", question)))
    }

    fn name(&self) -> &str {
        "slow-echo"
    }
}
