//! Text rendering of query results and the dataset summary

use comfy_table::{presets, Table};
use rusqlite::types::Value;

use super::schema::Column;

/// Rows returned by a query, already formatted as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutput {
    /// Result column names
    pub columns: Vec<String>,
    /// Rendered rows, at most the row limit
    pub rows: Vec<Vec<String>>,
    /// Number of rows the query produced
    pub total_rows: usize,
}

impl QueryOutput {
    /// Rows that were cut off by the row limit
    pub fn truncated_rows(&self) -> usize {
        self.total_rows.saturating_sub(self.rows.len())
    }

    /// Render as a text table
    pub fn render(&self) -> String {
        if self.total_rows == 0 {
            return "(no rows)".to_string();
        }

        let mut output = render_table(&self.columns, &self.rows);
        let hidden = self.truncated_rows();
        if hidden > 0 {
            output.push_str(&format!("\n... {} more rows", hidden));
        }
        output
    }
}

/// Format a single SQLite value for display
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => format_real(*f),
        Value::Text(s) => s.clone(),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

/// Whole floats keep one decimal so they read as floats
fn format_real(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Render rows under a header as a Markdown-style text table
pub fn render_table(header: &[String], rows: &[Vec<String>]) -> String {
    let mut table = Table::new();
    table.load_preset(presets::ASCII_MARKDOWN);
    table.set_header(header.to_vec());
    for row in rows {
        table.add_row(row.clone());
    }
    table.to_string()
}

/// Render `name  value` lines with the names padded to one width
fn aligned_lines<'a>(entries: impl Iterator<Item = (&'a str, String)> + Clone) -> String {
    let width = entries
        .clone()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0);

    entries
        .map(|(name, value)| format!("{:<width$}  {}", name, value, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The inspection summary handed to the model
pub fn summary(
    table_name: &str,
    row_count: usize,
    columns: &[Column],
    head: &QueryOutput,
) -> String {
    let types = aligned_lines(
        columns
            .iter()
            .map(|c| (c.name.as_str(), c.column_type.to_string())),
    );
    let missing = aligned_lines(columns.iter().map(|c| (c.name.as_str(), c.missing.to_string())));
    let first_rows = if head.rows.is_empty() {
        "(no rows)".to_string()
    } else {
        render_table(&head.columns, &head.rows)
    };

    format!(
        "Shape: {} rows, {} columns\nTable: \"{}\"\n\nColumns & types:\n{}\n\nFirst {} rows:\n{}\n\nMissing values:\n{}\n",
        row_count,
        columns.len(),
        table_name,
        types,
        head.rows.len(),
        first_rows,
        missing
    )
}
