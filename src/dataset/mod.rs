//! Dataset module - the CSV table the agent answers questions about
//!
//! The CSV is parsed once and loaded into an in-memory SQLite table. After
//! loading, the connection is switched to `query_only` and every query is
//! checked to be a single read-only statement, so no request can change what
//! another session sees.

mod render;
mod schema;

pub use render::{format_value, render_table, QueryOutput};
pub use schema::{Column, ColumnType};

use parking_lot::Mutex;
use rusqlite::types::Value;
use rusqlite::Connection;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::core::config::DatasetConfig;
use crate::core::{AnalystError, Result};
use schema::quote_identifier;

/// Rows shown by the inspection summary
const HEAD_ROWS: usize = 3;

/// Statement keywords accepted by [`Dataset::run_query`]
const READ_ONLY_KEYWORDS: &[&str] = &["SELECT", "WITH", "VALUES", "EXPLAIN"];

/// An immutable table loaded from a CSV file
pub struct Dataset {
    table_name: String,
    columns: Vec<Column>,
    row_count: usize,
    row_limit: usize,
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataset")
            .field("table_name", &self.table_name)
            .field("columns", &self.columns)
            .field("row_count", &self.row_count)
            .finish()
    }
}

impl Dataset {
    /// Load the dataset described by the configuration
    pub fn load(config: &DatasetConfig) -> Result<Self> {
        let dataset = Self::open(&config.path, &config.table_name, config.query_row_limit)?;
        info!(
            path = %config.path.display(),
            rows = dataset.row_count,
            columns = dataset.columns.len(),
            "Loaded dataset"
        );
        Ok(dataset)
    }

    /// Load a CSV file into a table named `table_name`
    pub fn open(path: impl AsRef<Path>, table_name: &str, row_limit: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            AnalystError::dataset(format!("Failed to open {}: {}", path.display(), e))
        })?;
        Self::from_reader(file, table_name, row_limit)
    }

    /// Load CSV text from any reader
    pub fn from_reader<R: Read>(reader: R, table_name: &str, row_limit: usize) -> Result<Self> {
        if table_name.trim().is_empty() {
            return Err(AnalystError::dataset("Table name must not be empty"));
        }

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = schema::normalize_headers(csv_reader.headers()?.iter());
        if headers.is_empty() {
            return Err(AnalystError::dataset("CSV file has no header row"));
        }

        let mut rows: Vec<Vec<Option<String>>> = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(schema::cell_value).collect());
        }

        let columns = schema::infer_columns(&headers, &rows);
        let mut conn = Connection::open_in_memory()?;
        create_table(&mut conn, table_name, &columns, &rows)?;
        conn.pragma_update(None, "query_only", true)?;

        Ok(Self {
            table_name: table_name.to_string(),
            columns,
            row_count: rows.len(),
            row_limit: row_limit.max(1),
            conn: Mutex::new(conn),
        })
    }

    /// Name of the SQL table
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column descriptions in file order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Fixed-format description: shape, column types, first rows and
    /// missing values per column
    pub fn summary(&self) -> Result<String> {
        let sql = format!(
            "SELECT * FROM {} LIMIT {}",
            quote_identifier(&self.table_name),
            HEAD_ROWS
        );
        let head = self.fetch(&sql, HEAD_ROWS)?;
        Ok(render::summary(
            &self.table_name,
            self.row_count,
            &self.columns,
            &head,
        ))
    }

    /// Execute a single read-only SQL statement
    pub fn run_query(&self, sql: &str) -> Result<QueryOutput> {
        let sql = sql.trim().trim_end_matches(|c: char| c == ';' || c.is_whitespace());
        let sql = strip_enclosing_parens(sql);
        if sql.is_empty() {
            return Err(AnalystError::query("Empty query"));
        }
        check_read_only(sql)?;

        debug!(sql, "Running query");
        self.fetch(sql, self.row_limit)
    }

    fn fetch(&self, sql: &str, limit: usize) -> Result<QueryOutput> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| AnalystError::query(e.to_string()))?;

        if !stmt.readonly() {
            return Err(AnalystError::query(
                "Only read-only statements are allowed; the table cannot be modified",
            ));
        }

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();
        let mut rows = Vec::new();
        let mut total_rows = 0;

        let mut result = stmt
            .query([])
            .map_err(|e| AnalystError::query(e.to_string()))?;
        while let Some(row) = result
            .next()
            .map_err(|e| AnalystError::query(e.to_string()))?
        {
            total_rows += 1;
            if rows.len() >= limit {
                continue;
            }
            let mut cells = Vec::with_capacity(width);
            for index in 0..width {
                let value: Value = row.get(index)?;
                cells.push(format_value(&value));
            }
            rows.push(cells);
        }

        Ok(QueryOutput {
            columns,
            rows,
            total_rows,
        })
    }
}

fn create_table(
    conn: &mut Connection,
    table_name: &str,
    columns: &[Column],
    rows: &[Vec<Option<String>>],
) -> Result<()> {
    let definitions = columns
        .iter()
        .map(|c| format!("{} {}", quote_identifier(&c.name), c.column_type.sql_type()))
        .collect::<Vec<_>>()
        .join(", ");
    conn.execute_batch(&format!(
        "CREATE TABLE {} ({});",
        quote_identifier(table_name),
        definitions
    ))?;

    let placeholders = vec!["?"; columns.len()].join(", ");
    let insert = format!(
        "INSERT INTO {} VALUES ({})",
        quote_identifier(table_name),
        placeholders
    );

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(&insert)?;
        for row in rows {
            let values = columns
                .iter()
                .enumerate()
                .map(|(index, column)| {
                    column
                        .column_type
                        .to_sql_value(row.get(index).and_then(|c| c.as_deref()))
                });
            stmt.execute(rusqlite::params_from_iter(values))?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Reject anything but one statement starting with a read-only keyword
fn check_read_only(sql: &str) -> Result<()> {
    let keyword = first_keyword(sql).to_uppercase();
    if !READ_ONLY_KEYWORDS.contains(&keyword.as_str()) {
        return Err(AnalystError::query(format!(
            "Only SELECT queries are allowed, got '{}'",
            keyword
        )));
    }
    if has_statement_separator(sql) {
        return Err(AnalystError::query("Run one statement at a time"));
    }
    Ok(())
}

/// Skip whitespace and `--` or `/* */` comments at the start of `sql`
fn skip_comments(sql: &str) -> &str {
    let mut rest = sql.trim_start();
    loop {
        if let Some(after) = rest.strip_prefix("--") {
            rest = after.find('\n').map_or("", |i| &after[i + 1..]).trim_start();
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = after.find("*/").map_or("", |i| &after[i + 2..]).trim_start();
        } else {
            return rest;
        }
    }
}

/// First word of the statement, skipping leading comments
fn first_keyword(sql: &str) -> &str {
    let rest = skip_comments(sql);
    let end = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    &rest[..end]
}

/// `(SELECT ...)` becomes `SELECT ...` when the outer pair encloses everything
fn strip_enclosing_parens(sql: &str) -> &str {
    let mut sql = sql;
    while sql.starts_with('(') && sql.ends_with(')') && closes_at_end(sql) {
        sql = sql[1..sql.len() - 1].trim();
    }
    sql
}

/// Whether the `(` at the start is matched by the final `)`
fn closes_at_end(sql: &str) -> bool {
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    for (i, c) in sql.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"' | '`') => quote = Some(c),
            (None, '[') => quote = Some(']'),
            (None, '(') => depth += 1,
            (None, ')') => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i == sql.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}

/// Whether a `;` outside quotes and comments is followed by more SQL
fn has_statement_separator(sql: &str) -> bool {
    let mut quote: Option<char> = None;
    let mut chars = sql.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"' | '`') => quote = Some(c),
            (None, '[') => quote = Some(']'),
            (None, '-') if sql[i..].starts_with("--") => {
                match sql[i..].find('\n') {
                    Some(end) => while chars.peek().is_some_and(|&(j, _)| j < i + end) {
                        chars.next();
                    },
                    None => return false,
                }
            }
            (None, '/') if sql[i..].starts_with("/*") => {
                match sql[i + 2..].find("*/") {
                    Some(end) => while chars.peek().is_some_and(|&(j, _)| j < i + end + 4) {
                        chars.next();
                    },
                    None => return false,
                }
            }
            (None, ';') => return !skip_comments(&sql[i + 1..]).is_empty(),
            _ => {}
        }
    }
    false
}
