//! CLI commands
//!
//! Classifies a line of REPL input.

/// Result of parsing a line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Ask the agent this question
    Ask(String),
    /// Exit the REPL
    Exit,
    /// Nothing to do
    None,
}

/// Parse a line of input
pub fn parse_input(input: &str) -> CommandResult {
    let input = input.trim();
    if input.is_empty() {
        return CommandResult::None;
    }

    match input.to_lowercase().as_str() {
        "exit" | "quit" => CommandResult::Exit,
        _ => CommandResult::Ask(input.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_commands() {
        assert_eq!(parse_input("exit"), CommandResult::Exit);
        assert_eq!(parse_input("  QUIT \n"), CommandResult::Exit);
        assert_eq!(parse_input("Exit"), CommandResult::Exit);
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(parse_input(""), CommandResult::None);
        assert_eq!(parse_input("   \n"), CommandResult::None);
    }

    #[test]
    fn test_question() {
        assert_eq!(
            parse_input(" Which country is happiest?\n"),
            CommandResult::Ask("Which country is happiest?".into())
        );
        assert_eq!(
            parse_input("exit the loop?"),
            CommandResult::Ask("exit the loop?".into())
        );
    }
}
