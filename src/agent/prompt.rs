//! System prompt construction

/// Build the system instruction for a dataset
pub fn build_system_prompt(description: &str, table_name: &str) -> String {
    format!(
        r#"You are a data analysis assistant working with {description}.
The CSV data is already loaded into the SQLite table "{table_name}".

## Tools
- `inspect_dataset`: shape, column names and types, first rows, missing values.
- `run_query`: run one read-only SQL SELECT statement and get the result rows.

## Rules
- Inspect the dataset only if you have not already done so in this conversation.
- Write the query once. Fix it only if it returned an error.
- Stop as soon as you have a valid result. Never re-run the same query.
- Explain the result in plain English. Be concise and decisive."#
    )
}

/// The configured override, or the built-in instruction
pub fn resolve_system_prompt(
    override_prompt: Option<&str>,
    description: &str,
    table_name: &str,
) -> String {
    match override_prompt {
        Some(prompt) if !prompt.trim().is_empty() => prompt.to_string(),
        _ => build_system_prompt(description, table_name),
    }
}
