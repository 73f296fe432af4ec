//! The `batch` use case: evaluate every lab under a root in parallel.

use camino::{Utf8Path, Utf8PathBuf};
use labgate_inputs::LAB_CONFIG_FILE;
use labgate_settings::Overrides;
use labgate_types::Report;
use rayon::prelude::*;

use crate::artifacts::read_config_text;
use crate::run::{RunInput, run_lab, runtime_failure, status_exit_code};

/// One lab's result in a batch. A lab that could not run still carries a
/// fail-closed report.
#[derive(Clone, Debug)]
pub struct BatchOutcome {
    pub lab_dir: Utf8PathBuf,
    pub report_path: Utf8PathBuf,
    pub report: Report,
    /// The runtime error, when the lab could not be evaluated.
    pub error: Option<String>,
}

impl BatchOutcome {
    pub fn exit_code(&self) -> i32 {
        if self.error.is_some() {
            1
        } else {
            status_exit_code(self.report.status)
        }
    }
}

/// Evaluate every lab directory under `root`. Outcomes are sorted by lab
/// directory regardless of completion order.
pub fn run_batch(root: &Utf8Path, overrides: &Overrides) -> anyhow::Result<Vec<BatchOutcome>> {
    let labs = labgate_inputs::discover_labs(root)?;
    tracing::info!(root = %root, labs = labs.len(), "running batch");

    let mut outcomes: Vec<BatchOutcome> = labs
        .par_iter()
        .map(|lab_dir| run_one(lab_dir, overrides))
        .collect();
    outcomes.sort_by(|a, b| a.lab_dir.cmp(&b.lab_dir));
    Ok(outcomes)
}

/// Worst exit code across the batch: 1 beats 2 beats 0.
pub fn batch_exit_code(outcomes: &[BatchOutcome]) -> i32 {
    let codes = outcomes.iter().map(BatchOutcome::exit_code);
    if codes.clone().any(|c| c == 1) {
        1
    } else {
        codes.max().unwrap_or(0)
    }
}

fn run_one(lab_dir: &Utf8Path, overrides: &Overrides) -> BatchOutcome {
    let mut config_text = String::new();
    let result = read_config_text(&lab_dir.join(LAB_CONFIG_FILE)).and_then(|text| {
        config_text = text;
        run_lab(RunInput {
            lab_dir,
            config_text: &config_text,
            overrides: overrides.clone(),
        })
    });

    match result {
        Ok(output) => BatchOutcome {
            lab_dir: lab_dir.to_path_buf(),
            report_path: output.report_path,
            report: output.report,
            error: None,
        },
        Err(err) => {
            let message = format!("{err:#}");
            tracing::warn!(lab = %lab_dir, "lab could not be evaluated: {message}");
            let (report_path, report) =
                runtime_failure(lab_dir, &config_text, overrides, &message);
            BatchOutcome {
                lab_dir: lab_dir.to_path_buf(),
                report_path,
                report,
                error: Some(message),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{accepting_pipeline, utf8_root, write_file};
    use labgate_types::Status;
    use tempfile::TempDir;

    #[test]
    fn batch_results_are_sorted_and_keep_going_after_failures() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        write_file(&root.join("ch08_guards/lab.toml"), "");
        write_file(
            &root.join("ch08_guards/inputs/pipeline.json"),
            r#"{"pipeline_id": "p-1", "stages": []}"#,
        );
        write_file(&root.join("ch05_highway/lab.toml"), "");
        write_file(&root.join("ch05_highway/inputs/pipeline.json"), &accepting_pipeline());
        write_file(&root.join("broken/lab.toml"), "chapter = [");

        let outcomes = run_batch(&root, &Overrides::default()).expect("batch");
        let dirs: Vec<&str> = outcomes
            .iter()
            .map(|o| o.lab_dir.file_name().expect("name"))
            .collect();
        assert_eq!(dirs, vec!["broken", "ch05_highway", "ch08_guards"]);

        assert!(outcomes[0].error.is_some());
        assert_eq!(outcomes[0].report.chapter, "unknown");
        assert_eq!(outcomes[0].report_path, root.join("broken/artifacts/result.json"));
        assert_eq!(outcomes[1].report.status, Status::Accept);
        assert_eq!(outcomes[2].report.status, Status::Reject);

        assert_eq!(outcomes[1].exit_code(), 0);
        assert_eq!(outcomes[2].exit_code(), 2);
        assert_eq!(batch_exit_code(&outcomes), 1);
        assert_eq!(batch_exit_code(&outcomes[1..]), 2);
        assert_eq!(batch_exit_code(&[]), 0);
    }
}
