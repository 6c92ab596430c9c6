//! # Reporting Module / 报告模块
//!
//! This module handles the generation and display of run reports.
//! It provides live per-case progress output, a categorized console summary
//! and a styled HTML report.
//!
//! 此模块处理运行报告的生成和显示。
//! 它提供逐用例的实时进度输出、分类的控制台摘要以及样式化的 HTML 报告。

pub mod console;
pub mod html;

// Re-export common reporting functions
pub use console::{print_failure_details, print_summary};
pub use html::generate_html_report;
