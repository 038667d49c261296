//! Tabular metric files (`metrics.csv`, `results.txt`).
//!
//! Header row names the metrics; each following row is one sample per column.
//! Values are stored at half precision.

use std::collections::HashMap;

use kp_core::{MetricTable, MetricTableBuilder, Sample, round_to_half};

#[derive(thiserror::Error, Debug)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row}, column '{column}': cannot parse '{value}' as a number")]
    BadValue {
        row: usize,
        column: String,
        value: String,
    },
}

/// Column names with pandas-style `.N` suffixes on repeats.
fn unique_columns<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .map(|raw| {
            let name = raw.trim().to_string();
            let count = seen.entry(name.clone()).or_insert(0);
            let unique = if *count == 0 {
                name
            } else {
                format!("{}.{}", name, count)
            };
            *count += 1;
            unique
        })
        .collect()
}

fn parse_cell(cell: &str) -> Option<Sample> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Some(Sample::NAN);
    }
    cell.parse::<Sample>().ok().map(round_to_half)
}

/// Parse the raw bytes of a tabular metric file.
pub fn parse_table(bytes: &[u8]) -> Result<MetricTable, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let columns = unique_columns(reader.headers()?.iter());
    let mut builder = MetricTableBuilder::new();
    for column in &columns {
        builder.declare(column);
    }

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        for (column, cell) in columns.iter().zip(record.iter()) {
            let value = parse_cell(cell).ok_or_else(|| TableError::BadValue {
                row: row + 1,
                column: column.clone(),
                value: cell.to_string(),
            })?;
            builder.push(column, value);
        }
    }

    Ok(builder.build())
}
