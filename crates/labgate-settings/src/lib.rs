//! Lab config parsing and resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{CheckConfig, DEFAULT_REPORT_OUT, LabConfigV1};
pub use resolve::{Overrides, ResolvedConfig, chapter_from_dir_name};

/// Parse `lab.toml` into a typed model. Empty input yields the defaults.
pub fn parse_config_toml(input: &str) -> anyhow::Result<LabConfigV1> {
    let cfg: LabConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve chapter, input paths, and check flags against the catalog
/// (CLI overrides > lab.toml > catalog defaults).
pub fn resolve_config(cfg: LabConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
