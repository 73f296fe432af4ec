use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

pub fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
}

pub fn write_file(path: &Utf8Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, contents).expect("write file");
}

/// A CH05 pipeline that runs every canonical stage in order.
pub fn accepting_pipeline() -> String {
    serde_json::json!({
        "pipeline_name": "change_highway",
        "stages": [
            { "name": "validate" },
            { "name": "dry_run" },
            { "name": "gate" },
            { "name": "apply" },
            { "name": "export" },
            { "name": "rb30_verify" },
        ],
    })
    .to_string()
}
