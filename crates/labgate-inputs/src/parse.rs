//! Pure text parsers; no filesystem access.

use anyhow::Context;
use labgate_domain::Table;
use serde_json::Value;
use std::collections::BTreeMap;

pub fn parse_json(text: &str) -> anyhow::Result<Value> {
    serde_json::from_str(text).context("invalid JSON")
}

/// YAML is read into the same JSON value model the checks query.
pub fn parse_yaml(text: &str) -> anyhow::Result<Value> {
    let value: Value = serde_yaml::from_str(text).context("invalid YAML")?;
    Ok(value)
}

/// The first record is the header row. Short records are padded with empty
/// cells; extra cells beyond the header are dropped.
pub fn parse_csv(text: &str) -> anyhow::Result<Table> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .context("read CSV header")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("read CSV record {}", i + 1))?;
        let row: BTreeMap<String, String> = columns
            .iter()
            .enumerate()
            .map(|(col, name)| (name.clone(), record.get(col).unwrap_or_default().to_string()))
            .collect();
        rows.push(row);
    }
    Ok(Table::new(columns, rows))
}
