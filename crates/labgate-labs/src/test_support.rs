use crate::lab;
use labgate_domain::{Snapshot, Table, run};
use labgate_types::Report;
use std::collections::BTreeMap;

pub fn evaluate(chapter: &str, snapshot: &Snapshot) -> Report {
    let registry = lab(chapter)
        .expect("known chapter")
        .registry()
        .expect("registry builds");
    run(&registry, snapshot)
}

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

/// A single-column `id` table with `n` rows.
pub fn numbered(n: usize) -> Table {
    let rows = (0..n)
        .map(|i| BTreeMap::from([("id".to_string(), i.to_string())]))
        .collect();
    Table::new(vec!["id".to_string()], rows)
}
