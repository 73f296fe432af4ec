//! CLI entry point for labgate.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `labgate-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use labgate_app::{
    BatchOutcome, RunInput, batch_exit_code, parse_report_json, read_config_text, run_batch,
    run_lab, runtime_failure, status_exit_code, write_report, write_text,
};
use labgate_render::{render_markdown, render_summary_line};
use labgate_settings::Overrides;

#[derive(Parser, Debug)]
#[command(
    name = "labgate",
    version,
    about = "Deterministic policy gate for change-unit teaching labs"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate one lab and write its report.
    Run {
        /// Lab directory (inputs and report paths are relative to it).
        #[arg(long, default_value = ".")]
        lab_dir: Utf8PathBuf,

        /// Path to the lab config TOML, relative to the lab directory.
        #[arg(long, default_value = "lab.toml")]
        config: Utf8PathBuf,

        /// Override the chapter (e.g. CH05).
        #[arg(long)]
        chapter: Option<String>,

        /// Where to write the JSON report, relative to the lab directory
        /// (default: `report_out` from lab.toml, else artifacts/result.json).
        #[arg(long)]
        report_out: Option<Utf8PathBuf>,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled), relative to the lab directory.
        #[arg(long, default_value = "artifacts/result.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Evaluate every lab (directory containing lab.toml) under a root.
    Batch {
        /// Directory to search for labs.
        #[arg(long, default_value = ".")]
        root: Utf8PathBuf,

        /// Write a Markdown report next to each JSON report.
        #[arg(long)]
        write_markdown: bool,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/result.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// List the chapter catalog, or one chapter's inputs and checks.
    Catalog {
        #[arg(long)]
        chapter: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Run {
            lab_dir,
            config,
            chapter,
            report_out,
            write_markdown,
            markdown_out,
        } => cmd_run(
            &lab_dir,
            &config,
            Overrides {
                chapter,
                report_out: report_out.map(Utf8PathBuf::into_string),
                inferred_chapter: None,
            },
            write_markdown.then_some(markdown_out),
        ),
        Commands::Batch {
            root,
            write_markdown,
        } => cmd_batch(&root, write_markdown),
        Commands::Md { report, output } => cmd_md(report, output),
        Commands::Catalog { chapter } => cmd_catalog(chapter.as_deref()),
    }
}

fn absolute(dir: &Utf8Path) -> Utf8PathBuf {
    dir.canonicalize_utf8().unwrap_or_else(|_| dir.to_path_buf())
}

fn cmd_run(
    lab_dir: &Utf8Path,
    config: &Utf8Path,
    overrides: Overrides,
    markdown_out: Option<Utf8PathBuf>,
) -> anyhow::Result<()> {
    let lab_dir = absolute(lab_dir);
    let mut config_text = String::new();

    let result = (|| -> anyhow::Result<i32> {
        if !lab_dir.is_dir() {
            anyhow::bail!("lab directory does not exist: {}", lab_dir);
        }
        config_text = read_config_text(&lab_dir.join(config))?;
        tracing::debug!(lab = %lab_dir, config = %config, "config loaded");

        let output = run_lab(RunInput {
            lab_dir: &lab_dir,
            config_text: &config_text,
            overrides: overrides.clone(),
        })?;

        write_report(&output.report_path, &output.report).context("write report json")?;
        if let Some(md_out) = &markdown_out {
            let md = render_markdown(&output.report);
            write_text(&lab_dir.join(md_out), &md).context("write markdown")?;
        }

        println!(
            "{}",
            render_summary_line(&output.report, &output.resolved_config.report_out)
        );
        Ok(status_exit_code(output.report.status))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let message = format!("{err:#}");
            tracing::error!(lab = %lab_dir, "run failed: {message}");
            let (report_path, report) =
                runtime_failure(&lab_dir, &config_text, &overrides, &message);
            if let Err(write_err) = write_report(&report_path, &report) {
                tracing::warn!(path = %report_path, "could not write runtime report: {write_err:#}");
            }
            eprintln!("labgate error: {message}");
            std::process::exit(1);
        }
    }
}

fn cmd_batch(root: &Utf8Path, write_markdown: bool) -> anyhow::Result<()> {
    let root = absolute(root);
    let outcomes = run_batch(&root, &Overrides::default())?;
    if outcomes.is_empty() {
        tracing::warn!(root = %root, "no labs found");
        eprintln!("labgate: no labs found under {}", root);
    }

    for outcome in &outcomes {
        write_outcome(&root, outcome, write_markdown)?;
    }

    let code = batch_exit_code(&outcomes);
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn write_outcome(root: &Utf8Path, outcome: &BatchOutcome, write_markdown: bool) -> anyhow::Result<()> {
    write_report(&outcome.report_path, &outcome.report).context("write report json")?;
    if write_markdown {
        let md = render_markdown(&outcome.report);
        write_text(&outcome.report_path.with_extension("md"), &md).context("write markdown")?;
    }

    let shown = outcome
        .report_path
        .strip_prefix(root)
        .unwrap_or(&outcome.report_path);
    println!("{}", render_summary_line(&outcome.report, shown.as_str()));
    if let Some(err) = &outcome.error {
        eprintln!("labgate error: {}: {err}", outcome.lab_dir);
    }
    Ok(())
}

fn cmd_md(report_path: Utf8PathBuf, output: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(&report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;
    let md = render_markdown(&report);

    if let Some(out_path) = output {
        write_text(&out_path, &md).context("write markdown output")?;
    } else {
        print!("{}", md);
    }

    Ok(())
}

fn cmd_catalog(chapter: Option<&str>) -> anyhow::Result<()> {
    let Some(chapter) = chapter else {
        for lab in labgate_labs::all() {
            println!("{}  {}", lab.chapter, lab.title);
        }
        return Ok(());
    };

    let lab = labgate_labs::lab(chapter).with_context(|| format!("unknown chapter: {chapter}"))?;
    let registry = lab.registry()?;

    println!("{}  {}", lab.chapter, lab.title);
    println!("inputs:");
    for input in lab.inputs() {
        let need = if input.required { "required" } else { "optional" };
        println!(
            "  {}  {} ({}, {})",
            input.name,
            input.path,
            input.format.as_str(),
            need
        );
    }
    println!("checks:");
    for check in registry.checks() {
        if check.required() {
            println!("  {}", check.id());
        } else {
            println!("  {} (informational)", check.id());
        }
    }
    Ok(())
}
