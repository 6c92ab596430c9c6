//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints the categorized summary after all cases have run and
//! the detailed log excerpts for unexpected failures.
//!
//! 此模块在所有用例运行结束后打印分类摘要，
//! 以及意外失败的详细日志摘要。

use colored::*;

use crate::core::models::CaseResult;
use crate::infra::t;

/// Prints the final summary of all results after the run is complete.
/// It categorizes results into successes, allowed failures, cancelled cases
/// and unexpected failures, then prints each category in a formatted list.
/// The teardown result is reported as a trailing note, never as a failure of
/// the matrix itself.
///
/// # Arguments
/// * `results` - A slice of `CaseResult` from all completed cases.
///
/// # Returns
/// Returns `true` if there were any unexpected failures or cancellations,
/// which is used to set the process exit code. Otherwise, returns `false`.
///
/// 在运行结束后打印全部结果的最终摘要。
/// 它将结果分为成功、允许的失败、已取消的用例和意外失败，
/// 然后以格式化列表的形式打印每个类别。
/// 清理结果仅作为结尾备注报告，永远不会作为矩阵本身的失败。
///
/// # Returns
/// 如果存在任何意外失败或取消，则返回 `true`，用于设置进程退出码。
/// 否则返回 `false`。
pub fn print_summary(results: &[CaseResult]) -> bool {
    let mut successes = Vec::new();
    let mut allowed_failures = Vec::new();
    let mut cancelled_cases = Vec::new();
    let mut unexpected_failures = Vec::new();
    let mut teardown_failed = false;

    let current_os = std::env::consts::OS;

    // Categorize each result.
    // 将每个结果分类。
    for result in results {
        if result.is_teardown() {
            teardown_failed = result.is_failure();
            continue;
        }
        if result.succeeded() {
            successes.push(result);
        } else if result.is_cancelled() {
            cancelled_cases.push(result);
        } else if result.is_allowed_failure() {
            allowed_failures.push(result);
        } else {
            unexpected_failures.push(result);
        }
    }

    println!("\n{}", t!("summary.banner").cyan());

    // Print each category if it's not empty.
    // 如果每个类别不为空，则打印它。
    if !successes.is_empty() {
        println!("\n{}", t!("summary.passed").green());
        for result in successes {
            println!("  - {}", result.case_name().green());
        }
    }

    if !allowed_failures.is_empty() {
        println!("\n{}", t!("summary.allowed_failures").yellow());
        for result in allowed_failures {
            println!(
                "  - {}",
                t!(
                    "summary.failed_as_expected",
                    name = result.case_name().yellow(),
                    os = current_os
                )
            );
        }
    }

    if !cancelled_cases.is_empty() {
        println!("\n{}", t!("summary.cancelled").yellow());
        for result in &cancelled_cases {
            println!("  - {}", result.case_name().yellow());
        }
    }

    if !unexpected_failures.is_empty() {
        println!("\n{}", t!("summary.unexpected_failures").red().bold());
        for result in &unexpected_failures {
            let failure_type = match result {
                CaseResult::Failed { reason, .. } => reason.label(),
                _ => String::new(),
            };
            println!("  - {} ({})", result.case_name().red(), failure_type);
        }
    }

    if teardown_failed {
        println!("\n{}", t!("summary.teardown_failed").yellow());
    } else {
        println!("\n{}", t!("summary.teardown_ok").dimmed());
    }

    println!(); // Add a blank line for spacing.

    // An exit code of 1 will be triggered for unexpected failures or
    // cancellations; allowed and teardown failures keep the run green.
    // 对于意外失败或取消，将触发退出码 1；
    // 允许的失败和清理失败不会影响运行结果。
    if !unexpected_failures.is_empty() {
        println!("{}", t!("summary.overall_failure").red().bold());
        true
    } else if !cancelled_cases.is_empty() {
        println!("{}", t!("summary.overall_cancelled").yellow().bold());
        true
    } else {
        println!("{}", t!("summary.overall_success").green().bold());
        false
    }
}

/// Prints the captured excerpts for every unexpected failure, one delimited
/// block per case, so an operator can triage without re-running anything.
///
/// 为每个意外失败打印捕获的输出摘要，每个用例一个分隔块，
/// 使操作者无需重新运行即可排查问题。
pub fn print_failure_details(unexpected_failures: &[&CaseResult]) {
    if unexpected_failures.is_empty() {
        return;
    }

    println!("\n{}", t!("summary.unexpected_failures").red().bold());
    println!("{}", "-".repeat(80));

    for (i, result) in unexpected_failures.iter().enumerate() {
        println!(
            "[{}/{}] {}",
            i + 1,
            unexpected_failures.len(),
            result.case_name().cyan()
        );

        if let CaseResult::Failed {
            stdout,
            stderr,
            reason,
            exit_code,
            ..
        } = result
        {
            match exit_code {
                Some(code) => println!("  {} (exit {})", reason.label().yellow(), code),
                None => println!("  {}", reason.label().yellow()),
            }
            if !stdout.trim().is_empty() {
                println!("\n--- stdout ---\n{}", stdout.trim_end());
            }
            if !stderr.trim().is_empty() {
                println!("\n--- stderr ---\n{}", stderr.trim_end());
            }
            println!("{}", "-".repeat(80));
        }
    }
}
