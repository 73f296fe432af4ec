use crate::snapshot::{Snapshot, Table};
use serde_json::Value;
use std::collections::BTreeMap;

pub fn doc(name: &str, value: Value) -> Snapshot {
    Snapshot::builder().document(name, value).build()
}

/// A table from a header and string rows.
pub fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
    let rows = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .zip(row.iter())
                .map(|(c, v)| (c.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>()
        })
        .collect();
    Table::new(columns.iter().map(|c| c.to_string()).collect(), rows)
}

/// A single-column `id` table.
pub fn id_table(ids: &[&str]) -> Table {
    let rows: Vec<[&str; 1]> = ids.iter().map(|id| [*id]).collect();
    let refs: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
    table(&["id"], &refs)
}
