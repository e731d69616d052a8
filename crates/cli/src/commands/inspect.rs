//! `restygen inspect`: show what a round would generate without rendering.

use std::path::PathBuf;

use clap::Args;
use restygen_core::{Generator, ResolvedService};
use serde::Serialize;

use super::{load_model, run_command};

/// Arguments of `restygen inspect`.
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Declaration model of the round (JSON)
    #[arg(long, value_name = "MODEL_JSON")]
    pub model: PathBuf,

    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ServiceReport {
    subject: String,
    artifact: String,
    companion: String,
    package: Option<String>,
    base_url: Option<String>,
    operations: Vec<OperationReport>,
}

#[derive(Debug, Serialize)]
struct OperationReport {
    name: String,
    signature: String,
    declared_in: String,
}

impl From<&ResolvedService> for ServiceReport {
    fn from(resolved: &ResolvedService) -> Self {
        Self {
            subject: resolved.names.subject.clone(),
            artifact: resolved.names.artifact_qualified.clone(),
            companion: resolved.names.companion_qualified.clone(),
            package: resolved.names.package.clone(),
            base_url: resolved.service.configured_url().map(ToString::to_string),
            operations: resolved
                .service
                .operations
                .iter()
                .map(|op| OperationReport {
                    name: op.name.clone(),
                    signature: op.to_string(),
                    declared_in: op.declared_in.clone(),
                })
                .collect(),
        }
    }
}

/// Run `restygen inspect`.
pub fn run(args: InspectArgs) -> i32 {
    run_command(|| run_inner(args))
}

fn run_inner(args: InspectArgs) -> Result<(), String> {
    let model = load_model(&args.model)?;
    let resolved = Generator::new(&model)
        .resolve_round(&model)
        .map_err(|err| err.to_string())?;
    let reports: Vec<ServiceReport> = resolved.iter().map(ServiceReport::from).collect();

    if args.json {
        let json = serde_json::to_string_pretty(&reports)
            .map_err(|err| format!("Failed to serialize report: {err}"))?;
        println!("{json}");
    } else {
        print!("{}", format_text(&reports));
    }
    Ok(())
}

fn format_text(reports: &[ServiceReport]) -> String {
    if reports.is_empty() {
        return "No annotated interfaces found.\n".to_string();
    }

    let mut output = String::new();
    for report in reports {
        output.push_str(&format!("{} -> {}\n", report.subject, report.artifact));
        output.push_str(&format!("  companion: {}\n", report.companion));
        output.push_str(&format!(
            "  base url:  {}\n",
            report.base_url.as_deref().unwrap_or("(none)")
        ));
        output.push_str(&format!("  operations ({}):\n", report.operations.len()));
        for op in &report.operations {
            output.push_str(&format!("    {}  [{}]\n", op.signature, op.declared_in));
        }
    }
    output
}
