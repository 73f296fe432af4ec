use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use walkdir::WalkDir;

/// Marks a directory as a lab.
pub const LAB_CONFIG_FILE: &str = "lab.toml";

/// Lab directories under `root` (inclusive), sorted by path.
///
/// A lab directory is any directory containing `lab.toml`. Report output
/// directories named `artifacts` are not descended into.
pub fn discover_labs(root: &Utf8Path) -> anyhow::Result<Vec<Utf8PathBuf>> {
    if !root.is_dir() {
        anyhow::bail!("lab root {} is not a directory", root);
    }

    let mut labs: Vec<Utf8PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || e.file_name() != "artifacts")
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == LAB_CONFIG_FILE)
        .filter_map(|e| e.path().parent().map(|p| p.to_path_buf()))
        .map(|p| Utf8PathBuf::from_path_buf(p).map_err(|p| p.display().to_string()))
        .collect::<Result<_, _>>()
        .map_err(|p| anyhow::anyhow!("non-UTF-8 lab path: {p}"))
        .with_context(|| format!("discover labs under {}", root))?;

    labs.sort();
    labs.dedup();
    tracing::debug!(root = %root, count = labs.len(), "discovered labs");
    Ok(labs)
}
