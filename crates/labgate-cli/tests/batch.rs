use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn labgate_cmd() -> Command {
    Command::cargo_bin("labgate").expect("labgate binary not found - run `cargo build` first")
}

fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, contents).expect("write file");
}

#[test]
fn batch_writes_one_report_per_lab_and_exits_with_worst_status() {
    let tmp = TempDir::new().expect("temp dir");
    let root = tmp.path();

    write_file(&root.join("ch08_guards/lab.toml"), "");
    write_file(
        &root.join("ch08_guards/inputs/pipeline.json"),
        r#"{"pipeline_id": "p-1", "stages": [{"name": "validate", "guards": ["g"], "owner_team": "data"}]}"#,
    );
    write_file(&root.join("ch10_scaling/lab.toml"), "");
    write_file(
        &root.join("ch10_scaling/inputs/warehouses.json"),
        r#"{"warehouses": [{"id": "wh_a", "max_concurrency": 10}]}"#,
    );
    write_file(
        &root.join("ch10_scaling/inputs/workloads.json"),
        r#"{"workloads": [{"id": "etl", "assigned_warehouse": "wh_a", "concurrency": 12}]}"#,
    );

    labgate_cmd()
        .arg("batch")
        .arg("--root")
        .arg(root)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("[CH08] Lab completed. status=accept"))
        .stdout(predicate::str::contains("[CH10] Lab completed. status=reject"));

    assert!(root.join("ch08_guards/artifacts/result.json").is_file());
    let ch10: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(root.join("ch10_scaling/artifacts/result.json"))
            .expect("read report"),
    )
    .expect("parse report");
    assert_eq!(ch10["checks"]["no_overcommitted_warehouses"], false);
    assert_eq!(
        ch10["metrics"]["overcommitted"],
        serde_json::json!({ "wh_a": { "max": 10, "used": 12 } })
    );
}
