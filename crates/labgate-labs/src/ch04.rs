//! CH04: a tiny medallion layout keeps its customer population intact
//! across raw, bronze, silver, and gold.

use crate::Lab;
use labgate_domain::checks::{ColumnsPresent, LayeredKeys, LayeredRowCounts, Layer, layers};
use labgate_domain::{Check, CheckRegistry, RegistryError};
use labgate_types::{InputFormat, InputSpec};

pub(crate) const LAB: Lab = Lab {
    chapter: "CH04",
    title: "Medallion layer consistency",
    inputs,
    build,
};

const LAYERS: [&str; 4] = ["raw", "bronze", "silver", "gold"];

fn inputs() -> Vec<InputSpec> {
    vec![
        InputSpec::required("raw", "inputs/raw/customers.csv", InputFormat::Csv),
        InputSpec::required("bronze", "inputs/bronze/customers.csv", InputFormat::Csv),
        InputSpec::required("silver", "inputs/silver/customers.csv", InputFormat::Csv),
        InputSpec::required("gold", "inputs/gold/customers.csv", InputFormat::Csv),
    ]
}

fn medallion() -> Vec<Layer> {
    layers(LAYERS.map(|name| (name, name)))
}

fn build() -> Result<CheckRegistry, RegistryError> {
    Ok(CheckRegistry::new("CH04")
        .with(Check::new(
            "row_counts_consistent",
            LayeredRowCounts::new(medallion()),
        ))?
        .with(Check::new(
            "keys_consistent",
            LayeredKeys::new(medallion(), "customer_id"),
        ))?
        .with(Check::new(
            "column_evolution_present",
            ColumnsPresent::new(medallion()),
        ))?)
}
