//! # Matrix Execution Engine Module / 矩阵执行引擎模块
//!
//! This module provides the core functionality for executing the
//! compatibility matrix. Cases run strictly sequentially: each one
//! provisions its isolated environment through discrete shell steps, runs
//! the verification command, and is bounded by an optional timeout. After
//! the last case an unconditional teardown pass removes every environment.
//!
//! 此模块为执行兼容性矩阵提供核心功能。
//! 用例严格按顺序运行：每个用例通过独立的 shell 步骤配置其隔离环境，
//! 运行验证命令，并受可选超时的约束。最后一个用例之后，
//! 无条件的清理阶段会移除所有环境。

use colored::*;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        config::{CaseSpec, TEARDOWN_CASE_NAME},
        models::{CaseResult, FailureReason},
    },
    infra::{command, fs, t},
};

/// Settings shared by every case of a run.
/// 一次运行中所有用例共享的设置。
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory under which each case's environment directory is created.
    /// 每个用例的环境目录在其下创建的目录。
    pub env_root: PathBuf,
    /// Cap, in characters, for captured stdout/stderr excerpts.
    /// 捕获的 stdout/stderr 摘要的字符上限。
    pub output_cap: usize,
}

impl RunOptions {
    pub fn new(env_root: PathBuf, output_cap: usize) -> Self {
        Self {
            env_root,
            output_cap,
        }
    }
}

/// Runs the whole matrix and returns one result per case plus a final
/// teardown result, in declaration order.
///
/// Failures never short-circuit the loop; one broken environment must not
/// abort the rest of the matrix. The teardown pass runs unconditionally,
/// even when every case failed or the run was cancelled mid-way.
///
/// 运行整个矩阵，按声明顺序返回每个用例的结果以及最终的清理结果。
///
/// 失败不会使循环短路；一个损坏的环境不能中止矩阵的其余部分。
/// 清理阶段无条件运行，即使所有用例都失败或运行中途被取消。
pub async fn run_matrix(
    cases: Vec<CaseSpec>,
    opts: &RunOptions,
    cancel: &CancellationToken,
) -> Vec<CaseResult> {
    let mut results = Vec::with_capacity(cases.len() + 1);

    for case in cases {
        if cancel.is_cancelled() {
            println!("{}", t!("run.case_skipped", name = &case.name).dimmed());
            results.push(CaseResult::Skipped { case });
            continue;
        }

        print_case_header(&case.name);
        let result = run_case(case, opts, cancel).await;
        results.push(result);
    }

    let teardown_result = run_teardown(&results, opts);
    results.push(teardown_result);
    results
}

/// Runs one case to completion: provisioning steps, then the verification
/// command, bounded by the case's timeout when one is configured. A case
/// that has started is only abandoned by cancellation or timeout; there are
/// no retries.
pub async fn run_case(
    case: CaseSpec,
    opts: &RunOptions,
    cancel: &CancellationToken,
) -> CaseResult {
    let start = Instant::now();
    let timeout_dur = case.timeout_secs.map(Duration::from_secs);

    let inner = run_case_inner(case.clone(), opts);
    let case_for_timeout = case.clone();
    let bounded = async move {
        match timeout_dur {
            Some(limit) => match tokio::time::timeout(limit, inner).await {
                Ok(result) => result,
                Err(_) => {
                    println!(
                        "{}",
                        t!(
                            "run.case_timeout",
                            name = &case_for_timeout.name,
                            timeout = limit.as_secs()
                        )
                        .red()
                    );
                    CaseResult::Failed {
                        case: case_for_timeout,
                        stdout: String::new(),
                        stderr: t!("run.case_timeout_message").to_string(),
                        exit_code: None,
                        reason: FailureReason::Timeout,
                        duration: limit,
                    }
                }
            },
            None => inner.await,
        }
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            println!("{}", t!("run.case_cancelled", name = &case.name).yellow());
            CaseResult::Failed {
                case,
                stdout: String::new(),
                stderr: t!("run.case_cancelled_message").to_string(),
                exit_code: None,
                reason: FailureReason::Cancelled,
                duration: start.elapsed(),
            }
        }
        result = bounded => result,
    }
}

/// The provision-then-verify flow. Every step runs as its own shell process
/// and is exit-checked independently, so a broken install surfaces as a
/// setup failure while a broken check surfaces as a verification failure.
async fn run_case_inner(case: CaseSpec, opts: &RunOptions) -> CaseResult {
    let start = Instant::now();
    let env_dir = fs::env_dir(&opts.env_root, &case.name);

    if !case.setup.is_empty() {
        println!("{}", t!("run.provisioning", name = &case.name).blue());
    }
    for (index, step) in case.setup.iter().enumerate() {
        let (status_res, stdout, stderr) = run_step(step, &case, &env_dir, opts).await;
        match status_res {
            Ok(status) if status.success() => {}
            Ok(status) => {
                let code = status.code();
                println!(
                    "{}",
                    t!(
                        "run.case_failed_setup",
                        name = &case.name,
                        step = index + 1,
                        code = code.unwrap_or(-1)
                    )
                    .red()
                );
                return CaseResult::Failed {
                    case: case.clone(),
                    stdout,
                    stderr,
                    exit_code: code,
                    reason: FailureReason::Setup,
                    duration: start.elapsed(),
                };
            }
            Err(e) => {
                return spawn_failure(case.clone(), step, e, FailureReason::Setup, start, opts);
            }
        }
    }

    println!("{}", t!("run.verifying", name = &case.name).blue());
    let (status_res, stdout, stderr) = run_step(&case.verify, &case, &env_dir, opts).await;
    let duration = start.elapsed();
    match status_res {
        Ok(status) if status.success() => {
            println!(
                "{}",
                t!(
                    "run.case_passed",
                    name = &case.name,
                    duration = format!("{:.2}", duration.as_secs_f64())
                )
                .green()
            );
            CaseResult::Passed {
                case,
                stdout,
                stderr,
                duration,
            }
        }
        Ok(status) => {
            let code = status.code();
            println!(
                "{}",
                t!(
                    "run.case_failed_verify",
                    name = &case.name,
                    code = code.unwrap_or(-1)
                )
                .red()
            );
            CaseResult::Failed {
                case,
                stdout,
                stderr,
                exit_code: code,
                reason: FailureReason::Verify,
                duration,
            }
        }
        Err(e) => {
            let line = case.verify.clone();
            spawn_failure(case, &line, e, FailureReason::Verify, start, opts)
        }
    }
}

/// Expands placeholders in a step line, runs it through the platform shell
/// and returns the exit status plus truncated output excerpts.
async fn run_step(
    line: &str,
    case: &CaseSpec,
    env_dir: &Path,
    opts: &RunOptions,
) -> (std::io::Result<ExitStatus>, String, String) {
    let expanded = expand_step(line, &case.name, env_dir);
    println!("{}", t!("run.step", command = &expanded).dimmed());

    let cmd = command::shell_command(&expanded);
    let (status_res, stdout, stderr) = command::spawn_and_capture(cmd).await;

    let stdout = command::truncate_excerpt(&stdout, opts.output_cap);
    let stderr = command::truncate_excerpt(&stderr, opts.output_cap);
    if !stdout.trim().is_empty() {
        println!("{}", stdout.trim());
    }
    if !stderr.trim().is_empty() {
        eprintln!("{}", stderr.trim());
    }

    (status_res, stdout, stderr)
}

/// Substitutes the `{env}` and `{name}` placeholders and expands `~`/`$VARS`.
///
/// `{env}` is shell quoted on substitution so a path with spaces stays one
/// word. Steps address the environment by path instead of relying on
/// activation state, which would die with the step's process anyway.
///
/// 替换 `{env}` 和 `{name}` 占位符并展开 `~`/`$VARS`。
/// `{env}` 在替换时会进行 shell 引用，使带空格的路径保持为一个词。
/// 步骤通过路径访问环境，而不是依赖会随步骤进程一起消失的激活状态。
pub fn expand_step(line: &str, case_name: &str, env_dir: &Path) -> String {
    let env_path = env_dir.to_string_lossy();
    let quoted_env = shlex::try_quote(env_path.as_ref())
        .map(|q| q.into_owned())
        .unwrap_or_else(|_| env_path.into_owned());

    let substituted = line.replace("{env}", &quoted_env).replace("{name}", case_name);

    // Undefined variables are left for the shell to deal with.
    // 未定义的变量留给 shell 处理。
    match shellexpand::full(&substituted) {
        Ok(expanded) => expanded.into_owned(),
        Err(_) => substituted,
    }
}

/// The unconditional cleanup pass. Removes every environment directory the
/// run may have created, best-effort, and reports the pass itself as a
/// result under the reserved `teardown` name. A removal error is logged to
/// stderr and never affects the other results.
///
/// 无条件的清理阶段。尽力移除运行可能创建的所有环境目录，
/// 并以保留名称 `teardown` 将该阶段本身作为一个结果报告。
/// 移除错误会记录到 stderr，并且永远不会影响其他结果。
pub fn run_teardown(results: &[CaseResult], opts: &RunOptions) -> CaseResult {
    println!("\n{}", t!("run.teardown_banner").cyan());
    let start = Instant::now();
    let mut removed_log = String::new();
    let mut error_log = String::new();

    for result in results {
        let name = result.case_name();
        let dir = fs::env_dir(&opts.env_root, name);
        match fs::remove_env_dir(&dir) {
            Ok(true) => {
                let line = t!("run.teardown_removed", name = name);
                println!("{}", line.dimmed());
                removed_log.push_str(&line);
                removed_log.push('\n');
            }
            // Never created, nothing to do.
            Ok(false) => {}
            Err(e) => {
                let line = t!("run.teardown_failed", name = name, error = e);
                eprintln!("{}", line.red());
                error_log.push_str(&line);
                error_log.push('\n');
            }
        }
    }

    let case = CaseSpec {
        name: TEARDOWN_CASE_NAME.to_string(),
        ..CaseSpec::default()
    };
    let duration = start.elapsed();

    if error_log.is_empty() {
        CaseResult::Passed {
            case,
            stdout: command::truncate_excerpt(&removed_log, opts.output_cap),
            stderr: String::new(),
            duration,
        }
    } else {
        CaseResult::Failed {
            case,
            stdout: command::truncate_excerpt(&removed_log, opts.output_cap),
            stderr: command::truncate_excerpt(&error_log, opts.output_cap),
            exit_code: None,
            reason: FailureReason::Teardown,
            duration,
        }
    }
}

fn spawn_failure(
    case: CaseSpec,
    line: &str,
    error: std::io::Error,
    reason: FailureReason,
    start: Instant,
    opts: &RunOptions,
) -> CaseResult {
    eprintln!("{}", t!("run.spawn_failed", command = line).red());
    CaseResult::Failed {
        case,
        stdout: String::new(),
        stderr: command::truncate_excerpt(&error.to_string(), opts.output_cap),
        exit_code: None,
        reason,
        duration: start.elapsed(),
    }
}

fn print_case_header(name: &str) {
    println!("\n{}", "=".repeat(60).cyan());
    println!("{}", t!("run.case_header", name = name).cyan().bold());
    println!("{}", "=".repeat(60).cyan());
}
