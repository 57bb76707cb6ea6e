//! Interactive REPL
//!
//! Provides the main user interaction loop over one process-wide transcript.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tracing::warn;

use crate::agent::{Agent, Transcript};
use crate::cli::commands::{parse_input, CommandResult};
use crate::core::Result;

/// Interactive REPL (Read-Eval-Print Loop)
pub struct Repl {
    agent: Arc<Agent>,
    transcript: Transcript,
}

impl Repl {
    /// Create a REPL with an empty transcript
    pub fn new(agent: Arc<Agent>) -> Self {
        Self {
            agent,
            transcript: Transcript::new(),
        }
    }

    /// Run the REPL on stdin/stdout
    pub async fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock()).await
    }

    /// Run the REPL over any input and output
    pub async fn run_with<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> Result<()> {
        self.print_banner(&mut output)?;

        loop {
            // Print prompt
            write!(output, "You: ")?;
            output.flush()?;

            // Read input
            let mut line = String::new();
            match input.read_line(&mut line) {
                Ok(0) => {
                    // EOF (Ctrl+D)
                    writeln!(output, "\nGoodbye!")?;
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    eprintln!("Error reading input: {}", e);
                    continue;
                }
            }

            match parse_input(&line) {
                CommandResult::Exit => {
                    writeln!(output, "Goodbye!")?;
                    break;
                }
                CommandResult::None => continue,
                CommandResult::Ask(question) => {
                    match self.agent.respond(&question, &mut self.transcript).await {
                        Ok(answer) => {
                            writeln!(output, "\nAgent: {}\n", answer)?;
                        }
                        Err(e) => {
                            warn!("Turn failed: {}", e);
                            eprintln!("\nError: {}\n", e);
                        }
                    }
                }
            }
        }

        output.flush()?;
        Ok(())
    }

    /// The conversation so far
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Print the startup banner
    fn print_banner<W: Write>(&self, output: &mut W) -> Result<()> {
        writeln!(output, "CSV Analysis Agent: {}", self.agent.description())?;
        writeln!(output, "Model: {} ({})", self.agent.model(), self.agent.provider_name())?;
        writeln!(output, "Type 'exit' to quit\n")?;
        Ok(())
    }
}
