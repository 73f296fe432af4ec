use crate::model::{DEFAULT_REPORT_OUT, LabConfigV1};
use anyhow::Context;
use labgate_domain::CheckRegistry;
use labgate_labs::Lab;
use labgate_types::{InputSpec, SCHEMA_CONFIG_V1};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub chapter: Option<String>,
    pub report_out: Option<String>,
    /// Chapter derived from the lab directory name, used last.
    pub inferred_chapter: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub lab: &'static Lab,
    pub report_out: String,
    pub inputs: Vec<InputSpec>,
    /// check_id -> required, for checks the config overrides.
    pub required: BTreeMap<String, bool>,
}

impl ResolvedConfig {
    pub fn chapter(&self) -> &'static str {
        self.lab.chapter
    }

    /// The chapter's registry with the configured required flags applied.
    pub fn registry(&self) -> anyhow::Result<CheckRegistry> {
        let mut registry = self
            .lab
            .registry()
            .with_context(|| format!("build check registry for {}", self.lab.chapter))?;
        for (id, required) in &self.required {
            registry.set_required(id, *required)?;
        }
        Ok(registry)
    }
}

/// `ch05` or `ch05_single_change_highway` -> `CH05`.
pub fn chapter_from_dir_name(name: &str) -> Option<String> {
    let lower = name.trim().to_ascii_lowercase();
    let rest = lower.strip_prefix("ch")?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let candidate = format!("CH{digits}");
    labgate_labs::lab(&candidate).map(|lab| lab.chapter.to_string())
}

pub fn resolve_config(cfg: LabConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != SCHEMA_CONFIG_V1
    {
        anyhow::bail!("unsupported config schema: {schema} (expected {SCHEMA_CONFIG_V1})");
    }

    let chapter = overrides
        .chapter
        .clone()
        .or(cfg.chapter.clone())
        .or(overrides.inferred_chapter.clone())
        .context("no chapter configured: set `chapter` in lab.toml or pass --chapter")?;
    let lab = labgate_labs::lab(&chapter).with_context(|| {
        let known: Vec<&str> = labgate_labs::all().iter().map(|l| l.chapter).collect();
        format!("unknown chapter: {chapter} (expected one of {})", known.join(", "))
    })?;

    let report_out = overrides
        .report_out
        .clone()
        .or(cfg.report_out.clone())
        .unwrap_or_else(|| DEFAULT_REPORT_OUT.to_string());

    let mut inputs = lab.inputs();
    for (name, path) in &cfg.inputs {
        let spec = inputs
            .iter_mut()
            .find(|spec| spec.name == *name)
            .with_context(|| {
                format!("unknown input `{name}` for {}", lab.chapter)
            })?;
        if path.trim().is_empty() {
            anyhow::bail!("empty path for input `{name}`");
        }
        spec.path = path.clone();
    }

    let ids = lab
        .check_ids()
        .with_context(|| format!("build check registry for {}", lab.chapter))?;
    let mut required = BTreeMap::new();
    for (check_id, cc) in &cfg.checks {
        if !ids.iter().any(|id| id == check_id) {
            anyhow::bail!(
                "unknown check id `{check_id}` for {} (expected one of {})",
                lab.chapter,
                ids.join(", ")
            );
        }
        if let Some(flag) = cc.required {
            required.insert(check_id.clone(), flag);
        }
    }

    Ok(ResolvedConfig {
        lab,
        report_out,
        inputs,
        required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_config_toml;

    #[test]
    fn empty_config_uses_inferred_chapter_and_defaults() {
        let cfg = parse_config_toml("").expect("parse");
        let resolved = resolve_config(
            cfg,
            Overrides {
                inferred_chapter: chapter_from_dir_name("ch05"),
                ..Overrides::default()
            },
        )
        .expect("resolve");
        assert_eq!(resolved.chapter(), "CH05");
        assert_eq!(resolved.report_out, DEFAULT_REPORT_OUT);
        assert_eq!(resolved.inputs[0].path, "inputs/pipeline.json");
        assert!(resolved.required.is_empty());
    }

    #[test]
    fn cli_overrides_win_over_config() {
        let cfg = parse_config_toml(
            r#"
chapter = "CH03"
report_out = "out/cfg.json"
"#,
        )
        .expect("parse");
        let resolved = resolve_config(
            cfg,
            Overrides {
                chapter: Some("ch05".to_string()),
                report_out: Some("out/cli.json".to_string()),
                inferred_chapter: Some("CH10".to_string()),
            },
        )
        .expect("resolve");
        assert_eq!(resolved.chapter(), "CH05");
        assert_eq!(resolved.report_out, "out/cli.json");
    }

    #[test]
    fn input_paths_and_required_flags_apply() {
        let cfg = parse_config_toml(
            r#"
chapter = "CH05"

[inputs]
pipeline = "data/highway.json"

[checks.rb30_ok]
required = false
"#,
        )
        .expect("parse");
        let resolved = resolve_config(cfg, Overrides::default()).expect("resolve");
        assert_eq!(resolved.inputs[0].path, "data/highway.json");

        let registry = resolved.registry().expect("registry");
        let rb30 = registry
            .checks()
            .iter()
            .find(|c| c.id() == "rb30_ok")
            .expect("rb30_ok");
        assert!(!rb30.required());
    }

    #[test]
    fn unknown_names_are_rejected() {
        let unknown_check = parse_config_toml("chapter = \"CH05\"\n[checks.nope]\nrequired = false\n")
            .expect("parse");
        let err = resolve_config(unknown_check, Overrides::default()).expect_err("check");
        assert!(err.to_string().contains("unknown check id `nope` for CH05"));

        let unknown_input =
            parse_config_toml("chapter = \"CH05\"\n[inputs]\nplan = \"x.json\"\n").expect("parse");
        let err = resolve_config(unknown_input, Overrides::default()).expect_err("input");
        assert_eq!(err.to_string(), "unknown input `plan` for CH05");

        let unknown_chapter = parse_config_toml("chapter = \"CH99\"").expect("parse");
        let err = resolve_config(unknown_chapter, Overrides::default()).expect_err("chapter");
        assert!(err.to_string().starts_with("unknown chapter: CH99"));

        let err = resolve_config(LabConfigV1::default(), Overrides::default()).expect_err("none");
        assert!(err.to_string().starts_with("no chapter configured"));
    }

    #[test]
    fn chapter_inference_reads_the_directory_prefix() {
        assert_eq!(chapter_from_dir_name("ch09").as_deref(), Some("CH09"));
        assert_eq!(
            chapter_from_dir_name("CH07_ai_pack").as_deref(),
            Some("CH07")
        );
        assert_eq!(chapter_from_dir_name("ch01"), None);
        assert_eq!(chapter_from_dir_name("labs"), None);
    }

    #[test]
    fn foreign_schema_is_rejected() {
        let cfg = parse_config_toml("schema = \"other.config.v2\"").expect("parse");
        assert!(resolve_config(cfg, Overrides::default()).is_err());
    }
}
