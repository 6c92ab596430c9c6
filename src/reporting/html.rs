//! # HTML Reporting Module / HTML 报告模块
//!
//! This module renders a self-contained HTML report of a matrix run:
//! summary tiles, a results table and collapsible output excerpts for
//! failed cases. Markup is built with `maud`, which escapes all case
//! output by construction; only the embedded CSS/JS assets are spliced
//! in unescaped.
//!
//! 此模块渲染矩阵运行的独立 HTML 报告：
//! 摘要统计、结果表格以及失败用例的可折叠输出摘要。
//! 标记使用 `maud` 构建，所有用例输出都会被自动转义；
//! 只有内嵌的 CSS/JS 资源以未转义形式插入。

use anyhow::{Context, Result};
use chrono::Local;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::fs;
use std::path::Path;

use crate::core::models::CaseResult;
use crate::infra::t;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = include_str!("assets/report.css");

/// Embedded JavaScript for HTML report interactivity / HTML 报告交互性的嵌入式 JavaScript
const HTML_SCRIPT: &str = include_str!("assets/report.js");

/// Generates a comprehensive HTML report from the run results and writes it
/// to `output_path`.
///
/// 从运行结果生成完整的 HTML 报告并写入 `output_path`。
pub fn generate_html_report(results: &[CaseResult], output_path: &Path) -> Result<()> {
    let markup = render_report(results);
    fs::write(output_path, markup.into_string()).with_context(|| {
        format!("Failed to write HTML report to {}", output_path.display())
    })?;
    Ok(())
}

fn render_report(results: &[CaseResult]) -> Markup {
    let total = results.len();
    let passed = results.iter().filter(|r| r.succeeded()).count();
    let failed = results.iter().filter(|r| r.is_failure()).count();
    let skipped = results
        .iter()
        .filter(|r| matches!(r, CaseResult::Skipped { .. }))
        .count();
    let generated = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (t!("html_report.title")) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (t!("html_report.main_header")) }
                p class="generated-at" { (t!("html_report.generated_at", time = generated)) }

                div class="summary-container" {
                    div class="summary-item" {
                        span class="count" { (total) }
                        span class="label" { (t!("html_report.summary.total")) }
                    }
                    div class="summary-item" {
                        span class="count passed-text" { (passed) }
                        span class="label" { (t!("html_report.summary.passed")) }
                    }
                    div class="summary-item" {
                        span class="count failed-text" { (failed) }
                        span class="label" { (t!("html_report.summary.failed")) }
                    }
                    div class="summary-item" {
                        span class="count skipped-text" { (skipped) }
                        span class="label" { (t!("html_report.summary.skipped")) }
                    }
                }

                table {
                    thead {
                        tr {
                            th { (t!("html_report.table.header.name")) }
                            th class="status-col" { (t!("html_report.table.header.status")) }
                            th class="duration-cell" { (t!("html_report.table.header.duration")) }
                            th class="exit-cell" { (t!("html_report.table.header.exit_code")) }
                        }
                    }
                    tbody {
                        @for (i, result) in results.iter().enumerate() {
                            (render_row(i, result))
                        }
                    }
                }

                script { (PreEscaped(HTML_SCRIPT)) }
            }
        }
    }
}

fn render_row(index: usize, result: &CaseResult) -> Markup {
    let duration_str = result
        .get_duration()
        .map(|d| format!("{:.2}s", d.as_secs_f64()))
        .unwrap_or_else(|| "N/A".to_string());
    let exit_str = result
        .exit_code()
        .map(|code| code.to_string())
        .unwrap_or_default();
    let output_id = format!("output-{}", index);

    html! {
        tr {
            td { (result.case_name()) }
            td class="status-col" {
                div class={ "status-cell " (result.status_class()) } { (result.status_str()) }
                @if result.is_failure() {
                    div class="output-toggle" onclick={ "toggleOutput('" (output_id) "')" } {
                        (t!("html_report.toggle_output"))
                    }
                }
            }
            td class="duration-cell" { (duration_str) }
            td class="exit-cell" { (exit_str) }
        }
        @if let CaseResult::Failed { stdout, stderr, .. } = result {
            tr id=(output_id) style="display:none;" {
                td colspan="4" {
                    @if !stdout.trim().is_empty() {
                        pre class="output-content" { (stdout) }
                    }
                    @if !stderr.trim().is_empty() {
                        pre class="output-content stderr" { (stderr) }
                    }
                }
            }
        }
    }
}
