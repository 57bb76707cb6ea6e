//! csv-analyst - ask questions about a CSV file in plain English
//!
//! Loads a CSV dataset into an in-memory SQLite table and lets a tool-calling
//! LLM inspect and query it, either from an interactive REPL or a small REST
//! API with per-session conversation history.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **Dataset**: CSV loading, column typing, and read-only SQL queries
//! - **LLM**: Provider abstraction with OpenAI-compatible and Ollama clients
//! - **Tools**: The inspect and query tools and their registry
//! - **Agent**: The tool-calling loop and conversation transcripts
//! - **Session**: Transcripts keyed by session id
//! - **CLI**: Interactive REPL
//! - **API**: axum HTTP server
//!
//! # Usage
//!
//! ```rust,no_run
//! use csv_analyst::agent::{Agent, Transcript};
//! use csv_analyst::Config;
//!
//! #[tokio::main]
//! async fn main() -> csv_analyst::Result<()> {
//!     let agent = Agent::from_config(&Config::load())?;
//!     let mut transcript = Transcript::new();
//!
//!     let answer = agent.respond("Which country is the happiest?", &mut transcript).await?;
//!     println!("{}", answer);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod api;
pub mod cli;
pub mod core;
pub mod dataset;
pub mod llm;
pub mod session;
pub mod tools;

// Re-export commonly used items
pub use agent::{Agent, Transcript};
pub use cli::Repl;
pub use core::{AnalystError, Config, Result};
pub use dataset::Dataset;
pub use session::SessionStore;
