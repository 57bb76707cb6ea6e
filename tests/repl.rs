//! REPL behavior over in-memory input and output

mod common;

use std::io::Cursor;
use std::sync::Arc;

use common::{build_agent, FailingProvider, ScriptedProvider};
use csv_analyst::llm::LLMResponse;
use csv_analyst::Repl;

async fn run(repl: &mut Repl, input: &str) -> String {
    let mut output = Vec::new();
    repl.run_with(Cursor::new(input.to_string()), &mut output)
        .await
        .unwrap();
    String::from_utf8(output).unwrap()
}

#[tokio::test]
async fn answers_questions_until_exit() {
    let provider = ScriptedProvider::new(vec![
        LLMResponse::text("Finland is the happiest country."),
        LLMResponse::text("never asked"),
    ]);
    let mut repl = Repl::new(Arc::new(build_agent(provider.clone(), 5)));

    let output = run(&mut repl, "Which country is happiest?\n\n   \n QUIT \nignored\n").await;

    assert!(output.starts_with("CSV Analysis Agent: the World Happiness Report 2018"));
    assert!(output.contains("Type 'exit' to quit"));
    assert!(output.contains("\nAgent: Finland is the happiest country.\n"));
    assert!(output.trim_end().ends_with("Goodbye!"));
    assert!(!output.contains("never asked"));

    assert_eq!(provider.call_count(), 1);
    assert_eq!(repl.transcript().len(), 2);
}

#[tokio::test]
async fn end_of_input_ends_the_session() {
    let provider = ScriptedProvider::new(vec![LLMResponse::text("156")]);
    let mut repl = Repl::new(Arc::new(build_agent(provider, 5)));

    let output = run(&mut repl, "How many rows?").await;

    assert!(output.contains("Agent: 156"));
    assert!(output.trim_end().ends_with("Goodbye!"));
    assert_eq!(repl.transcript().exchanges(), 1);
}

#[tokio::test]
async fn failed_turn_keeps_the_loop_running() {
    let mut repl = Repl::new(Arc::new(build_agent(Arc::new(FailingProvider), 5)));

    let output = run(&mut repl, "first\nsecond\nexit\n").await;

    assert!(!output.contains("Agent:"));
    assert_eq!(output.matches("You: ").count(), 3);
    assert!(repl.transcript().is_empty());
}
