// src/cli/commands/run.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use colored::*;
use serde::Serialize;
use std::{env, fs, path::Path, path::PathBuf};
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        config::EnvMatrix,
        execution::{run_matrix, RunOptions},
        models::CaseResult,
        planner,
    },
    infra::{fs as env_fs, t},
    reporting::{console, html},
};

/// Shape of the optional JSON results export.
#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Local>,
    results: &'a [CaseResult],
}

pub async fn execute(
    config: PathBuf,
    env_root_override: Option<PathBuf>,
    html_path: Option<PathBuf>,
    json_path: Option<PathBuf>,
) -> Result<()> {
    let config_path = fs::canonicalize(&config)
        .with_context(|| t!("config.read_failed", path = config.display()).to_string())?;
    let matrix = EnvMatrix::load(&config_path)?;
    rust_i18n::set_locale(&matrix.language);

    println!("{}", t!("run.loading_matrix", path = config_path.display()));

    let env_root = match env_root_override {
        Some(root) => root,
        None => matrix.resolved_env_root()?,
    };
    let env_root = env_fs::prepare_env_root(&env_root)?;
    println!("{}", t!("run.env_root", path = env_root.display()));
    println!("{}", t!("run.current_os", os = env::consts::OS).cyan());

    let plan = planner::plan_execution(matrix.cases);
    if plan.filtered_count > 0 {
        println!(
            "{}",
            t!(
                "run.filtered_cases",
                filtered = plan.filtered_count,
                total = plan.cases_to_run.len()
            )
            .cyan()
        );
    }
    if plan.flaky_cases_count > 0 {
        println!(
            "{}",
            t!("run.flaky_cases_found", count = plan.flaky_cases_count).yellow()
        );
    }
    if plan.cases_to_run.is_empty() {
        // The teardown pass still runs below so stale environments from an
        // earlier, interrupted run get cleaned up.
        println!("{}", t!("run.no_cases_to_run").green());
    }

    let cancel = setup_signal_handler();
    let opts = RunOptions::new(env_root, matrix.output_cap);
    let results = run_matrix(plan.cases_to_run, &opts, &cancel).await;

    let overall_failed = console::print_summary(&results);

    if let Some(path) = &html_path {
        match html::generate_html_report(&results, path) {
            Ok(()) => println!("{}", t!("run.html_report_written", path = path.display())),
            Err(e) => eprintln!("{} {}", t!("run.html_report_failed").red(), e),
        }
    }
    if let Some(path) = &json_path {
        write_json_report(&results, path)?;
        println!("{}", t!("run.json_report_written", path = path.display()));
    }

    if overall_failed {
        let unexpected_failures: Vec<_> = results
            .iter()
            .filter(|r| r.is_unexpected_failure())
            .collect();
        console::print_failure_details(&unexpected_failures);
        anyhow::bail!(t!("run.matrix_failed").to_string());
    }

    println!("\n{}", t!("run.all_cases_passed").green().bold());
    Ok(())
}

/// Installs a Ctrl-C handler that cancels the run. The in-flight case is
/// abandoned, the remaining cases are skipped, and the teardown pass still
/// removes every environment before the process exits.
fn setup_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            println!("\n{}", t!("run.shutdown_signal").yellow());
            token_clone.cancel();
        }
    });

    token
}

fn write_json_report(results: &[CaseResult], path: &Path) -> Result<()> {
    let report = JsonReport {
        generated_at: Local::now(),
        results,
    };
    let payload = serde_json::to_string_pretty(&report)?;
    fs::write(path, payload)
        .with_context(|| format!("Failed to write JSON results to {}", path.display()))?;
    Ok(())
}
