//! CH10: workloads mapped to warehouses must fit each warehouse's maximum
//! concurrency.

use crate::Lab;
use labgate_domain::checks::{Capacity, NonEmpty};
use labgate_domain::{Check, CheckRegistry, Field, RegistryError};
use labgate_types::{InputFormat, InputSpec};

pub(crate) const LAB: Lab = Lab {
    chapter: "CH10",
    title: "Warehouse scaling and overcommit",
    inputs,
    build,
};

fn inputs() -> Vec<InputSpec> {
    vec![
        InputSpec::required("workloads", "inputs/workloads.json", InputFormat::Json),
        InputSpec::required("warehouses", "inputs/warehouses.json", InputFormat::Json),
    ]
}

fn warehouses() -> Field {
    Field::new("warehouses", "warehouses")
}

fn workloads() -> Field {
    Field::new("workloads", "workloads")
}

fn build() -> Result<CheckRegistry, RegistryError> {
    Ok(CheckRegistry::new("CH10")
        .with(Check::new("warehouses_defined", NonEmpty::new(warehouses())))?
        .with(Check::new("workloads_defined", NonEmpty::new(workloads())))?
        .with(Check::new(
            "no_overcommitted_warehouses",
            Capacity::new(warehouses(), workloads())
                .resource_keys("id", "max_concurrency")
                .consumer_keys("assigned_warehouse", "concurrency")
                .metrics_as(
                    "warehouse_capacity",
                    "warehouse_used_concurrency",
                    "overcommitted",
                ),
        ))?)
}
