//! Column naming, type inference and missing-value detection

use rusqlite::types::Value;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Cell texts treated as missing values, after trimming
const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "NULL", "null", "None", "#N/A", "<NA>",
];

/// Inferred storage type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    /// SQL type used in the table definition
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }

    /// Convert a raw cell into the value stored for this column type
    pub fn to_sql_value(&self, cell: Option<&str>) -> Value {
        let Some(text) = cell else {
            return Value::Null;
        };
        match self {
            ColumnType::Integer => text
                .parse::<i64>()
                .map(Value::Integer)
                .unwrap_or_else(|_| Value::Text(text.to_string())),
            ColumnType::Real => parse_real(text)
                .map(Value::Real)
                .unwrap_or_else(|| Value::Text(text.to_string())),
            ColumnType::Text => Value::Text(text.to_string()),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_type())
    }
}

/// A column of the loaded table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    /// Number of missing cells
    pub missing: usize,
}

/// Trim a raw cell, mapping missing-value markers to `None`
pub fn cell_value(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if MISSING_MARKERS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_real(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Make header names usable as column names: blanks get a positional name
/// and duplicates get a numeric suffix.
pub fn normalize_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::new();

    for (index, header) in headers.into_iter().enumerate() {
        let base = match header.trim() {
            "" => format!("Unnamed: {}", index),
            name => name.to_string(),
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name.to_lowercase()) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }

        seen.insert(name.to_lowercase());
        names.push(name);
    }

    names
}

/// Infer column types and missing counts from the parsed rows
pub fn infer_columns(headers: &[String], rows: &[Vec<Option<String>>]) -> Vec<Column> {
    headers
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let cells = rows.iter().map(|row| row.get(index).and_then(|c| c.as_deref()));
            let mut missing = 0;
            let mut all_integer = true;
            let mut all_real = true;
            let mut any_present = false;

            for cell in cells {
                match cell {
                    None => missing += 1,
                    Some(text) => {
                        any_present = true;
                        if all_integer && text.parse::<i64>().is_err() {
                            all_integer = false;
                        }
                        if all_real && parse_real(text).is_none() {
                            all_real = false;
                        }
                    }
                }
            }

            let column_type = match (any_present, all_integer, all_real) {
                (false, _, _) => ColumnType::Text,
                (true, true, _) => ColumnType::Integer,
                (true, false, true) => ColumnType::Real,
                _ => ColumnType::Text,
            };

            Column {
                name: name.clone(),
                column_type,
                missing,
            }
        })
        .collect()
}

/// Quote an SQL identifier
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<Option<String>> {
        cells.iter().map(|c| cell_value(c)).collect()
    }

    #[test]
    fn test_missing_markers() {
        assert_eq!(cell_value("  N/A "), None);
        assert_eq!(cell_value(""), None);
        assert_eq!(cell_value(" Finland "), Some("Finland".to_string()));
        assert_eq!(cell_value("0"), Some("0".to_string()));
    }

    #[test]
    fn test_infer_columns() {
        let headers = vec!["rank".to_string(), "score".to_string(), "country".to_string()];
        let rows = vec![
            row(&["1", "7.632", "Finland"]),
            row(&["2", "7", "Norway"]),
            row(&["3", "N/A", ""]),
        ];

        let columns = infer_columns(&headers, &rows);
        assert_eq!(columns[0].column_type, ColumnType::Integer);
        assert_eq!(columns[1].column_type, ColumnType::Real);
        assert_eq!(columns[1].missing, 1);
        assert_eq!(columns[2].column_type, ColumnType::Text);
        assert_eq!(columns[2].missing, 1);
    }

    #[test]
    fn test_all_missing_column_is_text() {
        let headers = vec!["empty".to_string()];
        let rows = vec![row(&[""]), row(&["NA"])];
        let columns = infer_columns(&headers, &rows);
        assert_eq!(columns[0].column_type, ColumnType::Text);
        assert_eq!(columns[0].missing, 2);
    }

    #[test]
    fn test_normalize_headers() {
        let names = normalize_headers(["Score", "", "score", "Score"]);
        assert_eq!(names, vec!["Score", "Unnamed: 1", "score.1", "Score.2"]);
    }

    #[test]
    fn test_sql_values() {
        assert_eq!(ColumnType::Integer.to_sql_value(Some("42")), Value::Integer(42));
        assert_eq!(ColumnType::Real.to_sql_value(Some("0.5")), Value::Real(0.5));
        assert_eq!(ColumnType::Text.to_sql_value(None), Value::Null);
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("GDP per capita"), "\"GDP per capita\"");
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }
}
