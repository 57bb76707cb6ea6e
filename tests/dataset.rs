//! Loading the happiness fixture from disk and querying it

mod common;

use common::{write_happiness_csv, COLUMNS, ROWS};
use csv_analyst::core::config::DatasetConfig;
use csv_analyst::core::AnalystError;
use csv_analyst::dataset::{ColumnType, Dataset};

fn load() -> Dataset {
    let (_dir, path) = write_happiness_csv();
    Dataset::load(&DatasetConfig {
        path,
        table_name: "data".to_string(),
        description: "the World Happiness Report 2018".to_string(),
        query_row_limit: 50,
    })
    .unwrap()
}

#[test]
fn summary_reports_shape_and_every_column() {
    let dataset = load();
    assert_eq!(dataset.row_count(), ROWS);
    assert_eq!(dataset.column_count(), COLUMNS.len());

    let summary = dataset.summary().unwrap();
    assert!(summary.starts_with("Shape: 156 rows, 9 columns"), "{}", summary);
    for column in COLUMNS {
        assert!(summary.contains(column), "missing {}", column);
    }
    assert!(summary.contains("First 3 rows:"));
    assert!(summary.contains("Finland"));
    assert!(summary.contains("Missing values:"));
}

#[test]
fn column_types_and_missing_values() {
    let dataset = load();
    let columns = dataset.columns();

    assert_eq!(columns[0].column_type, ColumnType::Integer);
    assert_eq!(columns[1].column_type, ColumnType::Text);
    assert_eq!(columns[2].column_type, ColumnType::Real);

    let corruption = &columns[8];
    assert_eq!(corruption.name, "Perceptions of corruption");
    assert_eq!(corruption.column_type, ColumnType::Real);
    assert_eq!(corruption.missing, 1);
    assert!(columns[..8].iter().all(|c| c.missing == 0));
}

#[test]
fn answers_aggregate_queries() {
    let dataset = load();

    let top = dataset
        .run_query("SELECT \"Country or region\", Score FROM data ORDER BY Score DESC LIMIT 1;")
        .unwrap();
    assert_eq!(top.rows, vec![vec!["Finland".to_string(), "7.632".to_string()]]);

    let nulls = dataset
        .run_query("SELECT COUNT(*) FROM data WHERE \"Perceptions of corruption\" IS NULL")
        .unwrap();
    assert_eq!(nulls.rows[0][0], "1");
}

#[test]
fn large_results_are_truncated() {
    let dataset = load();
    let output = dataset
        .run_query("SELECT \"Country or region\" FROM data")
        .unwrap();

    assert_eq!(output.total_rows, ROWS);
    assert_eq!(output.rows.len(), 50);
    assert!(output.render().ends_with("... 106 more rows"));
}

#[test]
fn writes_are_rejected() {
    let dataset = load();

    for sql in [
        "DELETE FROM data",
        "UPDATE data SET Score = 0",
        "INSERT INTO data (Score) VALUES (1)",
        "DROP TABLE data",
        "SELECT 1; DELETE FROM data",
        "WITH x AS (SELECT 1) DELETE FROM data",
        "ATTACH DATABASE ':memory:' AS other",
    ] {
        let err = dataset.run_query(sql).unwrap_err();
        assert!(matches!(err, AnalystError::Query(_)), "{}: {:?}", sql, err);
    }

    let count = dataset.run_query("SELECT COUNT(*) FROM data").unwrap();
    assert_eq!(count.rows[0][0], "156");
}

#[test]
fn missing_file_is_a_dataset_error() {
    let err = Dataset::open("/nonexistent/2018.csv", "data", 50).unwrap_err();
    assert!(matches!(err, AnalystError::Dataset(_)));
    assert!(err.to_string().contains("/nonexistent/2018.csv"));
}
