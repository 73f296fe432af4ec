//! Input adapters: discover lab directories and read their input documents
//! into a [`Snapshot`].
//!
//! This crate is allowed to do filesystem IO (reads only). Every file handle
//! is opened and released inside a single function call.

#![forbid(unsafe_code)]

mod discover;
mod parse;

use camino::{Utf8Path, Utf8PathBuf};
use labgate_domain::{InputFailure, Snapshot, SnapshotBuilder};
use labgate_types::{InputFormat, InputSpec};
use walkdir::WalkDir;

pub use discover::{LAB_CONFIG_FILE, discover_labs};
pub use parse::{parse_csv, parse_json, parse_yaml};

/// Read every declared input under `lab_dir`.
///
/// Never fails: an unreadable or malformed input is recorded on the snapshot
/// as an [`InputFailure`], which makes the evaluation fail closed. Missing
/// optional inputs are skipped.
pub fn load_snapshot(lab_dir: &Utf8Path, specs: &[InputSpec]) -> Snapshot {
    let mut builder = Snapshot::builder();
    for spec in specs {
        builder = load_input(builder, lab_dir, spec);
    }
    builder.build()
}

fn load_input(builder: SnapshotBuilder, lab_dir: &Utf8Path, spec: &InputSpec) -> SnapshotBuilder {
    let abs = lab_dir.join(&spec.path);
    match spec.format {
        InputFormat::CsvDir if abs.is_dir() => load_csv_dir(builder, &abs, spec),
        InputFormat::CsvDir => missing(builder, spec, "Directory not found"),
        _ if !abs.is_file() => missing(builder, spec, "File not found"),
        format => match read_document(&abs, format) {
            Ok(Parsed::Document(value)) => {
                tracing::debug!(input = %spec.name, path = %spec.path, "loaded input");
                builder.document(spec.name.clone(), value)
            }
            Ok(Parsed::Table(table)) => {
                tracing::debug!(input = %spec.name, path = %spec.path, rows = table.len(), "loaded input");
                builder.table(spec.name.clone(), table)
            }
            Err(reason) => fail(builder, spec, reason.render(format, &spec.path)),
        },
    }
}

enum Parsed {
    Document(serde_json::Value),
    Table(labgate_domain::Table),
}

enum ReadError {
    Io(std::io::Error),
    Parse(anyhow::Error),
}

impl ReadError {
    fn render(&self, format: InputFormat, path: &str) -> String {
        match self {
            ReadError::Io(err) => format!("Failed to read {path}: {err}"),
            ReadError::Parse(err) => {
                format!("Failed to parse {} at {path}: {err:#}", format.as_str())
            }
        }
    }
}

fn read_document(abs: &Utf8Path, format: InputFormat) -> Result<Parsed, ReadError> {
    let text = std::fs::read_to_string(abs).map_err(ReadError::Io)?;
    let parsed = match format {
        InputFormat::Json => parse_json(&text).map(Parsed::Document),
        InputFormat::Yaml => parse_yaml(&text).map(Parsed::Document),
        InputFormat::Csv | InputFormat::CsvDir => parse_csv(&text).map(Parsed::Table),
    };
    parsed.map_err(ReadError::Parse)
}

/// Every `*.csv` directly inside `dir`, as tables named `<input>/<stem>`.
fn load_csv_dir(mut builder: SnapshotBuilder, dir: &Utf8Path, spec: &InputSpec) -> SnapshotBuilder {
    let files: Vec<Utf8PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| Utf8PathBuf::from_path_buf(e.into_path()).ok())
        .filter(|p| p.extension() == Some("csv"))
        .collect();

    for file in files {
        let Some(stem) = file.file_stem() else {
            continue;
        };
        let rel = format!("{}/{}", spec.path.trim_end_matches('/'), file.file_name().unwrap_or(stem));
        match read_document(&file, InputFormat::Csv) {
            Ok(Parsed::Table(table)) => {
                tracing::debug!(input = %spec.name, path = %rel, rows = table.len(), "loaded table");
                builder = builder.table(format!("{}/{stem}", spec.name), table);
            }
            Ok(Parsed::Document(_)) => {}
            Err(reason) => {
                builder = fail(builder, spec, reason.render(InputFormat::Csv, &rel));
            }
        }
    }
    builder
}

fn missing(builder: SnapshotBuilder, spec: &InputSpec, what: &str) -> SnapshotBuilder {
    if spec.required {
        fail(builder, spec, format!("{what}: {}", spec.path))
    } else {
        tracing::debug!(input = %spec.name, path = %spec.path, "optional input absent");
        builder
    }
}

fn fail(builder: SnapshotBuilder, spec: &InputSpec, reason: String) -> SnapshotBuilder {
    tracing::warn!(input = %spec.name, "{reason}");
    builder.failure(InputFailure::new(spec.name.clone(), reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use labgate_domain::Field;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    fn write_file(path: &Utf8Path, contents: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, contents).expect("write file");
    }

    #[test]
    fn loads_documents_and_tables_by_input_name() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        write_file(&root.join("inputs/pipeline.json"), r#"{"stages": ["validate"]}"#);
        write_file(&root.join("inputs/policy.yaml"), "max_files_changed: 3\n");
        write_file(&root.join("inputs/hub.csv"), "policy_id,name\nP1,a\nP2,b\n");

        let snapshot = load_snapshot(
            &root,
            &[
                InputSpec::required("pipeline", "inputs/pipeline.json", InputFormat::Json),
                InputSpec::required("policy", "inputs/policy.yaml", InputFormat::Yaml),
                InputSpec::required("hub", "inputs/hub.csv", InputFormat::Csv),
            ],
        );
        assert!(snapshot.failures().is_empty());
        assert_eq!(
            snapshot
                .require_number(&Field::new("policy", "max_files_changed"))
                .expect("number"),
            3.0
        );
        assert_eq!(snapshot.require_table("hub").expect("table").len(), 2);
        assert_eq!(
            snapshot
                .list(&Field::new("pipeline", "stages"))
                .expect("list")
                .len(),
            1
        );
    }

    #[test]
    fn missing_and_malformed_inputs_become_failures() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        write_file(&root.join("inputs/snapshot.json"), "{ not json");

        let snapshot = load_snapshot(
            &root,
            &[
                InputSpec::required("snapshot", "inputs/snapshot.json", InputFormat::Json),
                InputSpec::required("pack", "inputs/pack.json", InputFormat::Json),
                InputSpec::optional("extra", "inputs/extra.json", InputFormat::Json),
            ],
        );
        let reasons: Vec<String> = snapshot.failures().iter().map(|f| f.to_string()).collect();
        assert_eq!(reasons.len(), 2);
        assert!(reasons[0].starts_with("Failed to parse JSON at inputs/snapshot.json: "));
        assert_eq!(reasons[1], "File not found: inputs/pack.json");
    }

    #[test]
    fn csv_directories_load_one_table_per_file() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        write_file(&root.join("onprem/customers.csv"), "id\n1\n2\n");
        write_file(&root.join("onprem/orders.csv"), "id\n1\n");
        write_file(&root.join("onprem/notes.txt"), "ignored");

        let snapshot = load_snapshot(
            &root,
            &[
                InputSpec::optional("onprem", "onprem", InputFormat::CsvDir),
                InputSpec::optional("cloud", "cloud", InputFormat::CsvDir),
            ],
        );
        assert!(snapshot.failures().is_empty());
        let names: Vec<&str> = snapshot.table_names("").collect();
        assert_eq!(names, vec!["onprem/customers", "onprem/orders"]);
        assert_eq!(snapshot.require_table("onprem/customers").expect("t").len(), 2);
    }
}
