//! Agent module - orchestration and transcript management
//!
//! Contains the main agent logic that coordinates LLM calls and tool execution.

pub mod loop_state;
pub mod orchestrator;
pub mod prompt;
pub mod transcript;

pub use loop_state::{AgentLoopState, Observation, ITERATION_LIMIT_MESSAGE};
pub use orchestrator::{Agent, AgentSettings, EMPTY_ANSWER_MESSAGE};
pub use prompt::build_system_prompt;
pub use transcript::Transcript;
