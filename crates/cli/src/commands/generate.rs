//! `restygen generate`: run one round and write, print or check the
//! artifacts.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use restygen_core::{artifact_path, FsSink, Generator, MemorySink, RoundReport};
use similar::{ChangeTag, TextDiff};
use tracing::debug;

use super::{load_model, run_command};
use crate::config::Config;

/// Arguments of `restygen generate`.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Declaration model of the round (JSON)
    #[arg(long, value_name = "MODEL_JSON")]
    pub model: PathBuf,

    /// Root of the generated source tree [default: from config, else `generated`]
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Print the artifacts to stdout instead of writing them
    #[arg(long, conflicts_with = "check")]
    pub dry_run: bool,

    /// Fail if any artifact under the output directory is missing or stale
    #[arg(long)]
    pub check: bool,
}

/// Run `restygen generate`.
pub fn run(args: GenerateArgs, config: &Config) -> i32 {
    run_command(|| run_inner(args, config))
}

fn run_inner(args: GenerateArgs, config: &Config) -> Result<(), String> {
    let model = load_model(&args.model)?;
    let generator = Generator::new(&model);
    let out_dir = config.out_dir(args.out_dir.as_deref());

    if args.dry_run || args.check {
        let mut sink = MemorySink::new();
        generator
            .run_round(&model, &mut sink)
            .map_err(|err| err.to_string())?;
        let artifacts = sink.into_artifacts();

        if args.dry_run {
            for (name, source) in &artifacts {
                println!("// {}", artifact_path(Path::new(""), name).display());
                print!("{source}");
            }
            return Ok(());
        }
        return check(&out_dir, &artifacts);
    }

    let mut sink = FsSink::new(&out_dir);
    let report = generator
        .run_round(&model, &mut sink)
        .map_err(|err| err.to_string())?;
    for path in sink.written() {
        debug!(path = %path.display(), "Artifact file written.");
    }
    print_summary(&report, sink.out_dir());
    Ok(())
}

fn print_summary(report: &RoundReport, out_dir: &Path) {
    if report.artifacts.is_empty() {
        println!("No annotated interfaces found.");
        return;
    }
    for artifact in &report.artifacts {
        println!(
            "{} -> {} ({} operation(s))",
            artifact.subject, artifact.artifact, artifact.operations
        );
    }
    println!(
        "Generated {} artifact(s) in {}",
        report.artifacts.len(),
        out_dir.display()
    );
}

// =============================================================================
// --check
// =============================================================================

/// State of one rendered artifact relative to the file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ArtifactStatus {
    UpToDate,
    Missing,
    /// Carries the rendered diff.
    Stale(String),
}

fn compare(out_dir: &Path, name: &str, rendered: &str) -> ArtifactStatus {
    let path = artifact_path(out_dir, name);
    match fs::read_to_string(&path) {
        Err(_) => ArtifactStatus::Missing,
        Ok(existing) if existing == rendered => ArtifactStatus::UpToDate,
        Ok(existing) => {
            let rel = artifact_path(Path::new(""), name);
            ArtifactStatus::Stale(unified_diff(&rel.display().to_string(), &existing, rendered))
        }
    }
}

fn check(out_dir: &Path, artifacts: &BTreeMap<String, String>) -> Result<(), String> {
    let mut outdated = 0;
    for (name, rendered) in artifacts {
        match compare(out_dir, name, rendered) {
            ArtifactStatus::UpToDate => debug!(artifact = %name, "Artifact is up to date."),
            ArtifactStatus::Missing => {
                outdated += 1;
                println!("missing: {}", artifact_path(out_dir, name).display());
            }
            ArtifactStatus::Stale(diff) => {
                outdated += 1;
                print!("{diff}");
            }
        }
    }

    if outdated > 0 {
        return Err(format!(
            "{outdated} of {} artifact(s) out of date in {}",
            artifacts.len(),
            out_dir.display()
        ));
    }
    println!("All {} artifact(s) up to date.", artifacts.len());
    Ok(())
}

/// Unified diff from the file on disk to the rendered artifact.
fn unified_diff(rel_path: &str, existing: &str, rendered: &str) -> String {
    let diff = TextDiff::from_lines(existing, rendered);
    let mut output = String::new();

    output.push_str(&format!("\x1b[1m--- {rel_path} (on disk)\x1b[0m\n"));
    output.push_str(&format!("\x1b[1m+++ {rel_path} (generated)\x1b[0m\n"));

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            output.push_str("...\n");
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let (sign, color) = match change.tag() {
                    ChangeTag::Delete => ("-", "\x1b[31m"),
                    ChangeTag::Insert => ("+", "\x1b[32m"),
                    ChangeTag::Equal => (" ", ""),
                };
                output.push_str(color);
                output.push_str(sign);
                output.push_str(change.value());
                if change.missing_newline() {
                    output.push('\n');
                }
                if !color.is_empty() {
                    output.push_str("\x1b[0m");
                }
            }
        }
    }

    output
}
