//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures used throughout the matrix
//! runner: per-case results, failure reasons and their report helpers.
//!
//! 此模块定义了整个矩阵运行器中使用的核心数据结构：
//! 逐用例的结果、失败原因及其报告辅助方法。

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::config::{CaseSpec, TEARDOWN_CASE_NAME};
use crate::infra::t;

/// Enumerates the possible reasons for a case failure.
/// Provisioning and verification are tracked separately so that a broken
/// install is distinguishable from a broken check.
/// 枚举用例失败的可能原因。
/// 配置和验证分别记录，以便区分安装失败和检查失败。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum FailureReason {
    /// A provisioning step exited with a non-zero code.
    /// 某个配置步骤以非零退出码结束。
    Setup,
    /// The verification command exited with a non-zero code.
    /// 验证命令以非零退出码结束。
    Verify,
    /// The case exceeded its configured timeout.
    /// 用例超出了其配置的超时时间。
    Timeout,
    /// The case was interrupted by a shutdown signal.
    /// 用例因收到关闭信号而被中断。
    Cancelled,
    /// The teardown pass could not remove one or more environments.
    /// 清理阶段无法移除一个或多个环境。
    Teardown,
}

impl FailureReason {
    /// Human-readable label for summaries and reports.
    pub fn label(&self) -> String {
        match self {
            FailureReason::Setup => t!("reason.setup").to_string(),
            FailureReason::Verify => t!("reason.verify").to_string(),
            FailureReason::Timeout => t!("reason.timeout").to_string(),
            FailureReason::Cancelled => t!("reason.cancelled").to_string(),
            FailureReason::Teardown => t!("reason.teardown").to_string(),
        }
    }
}

/// Represents the final result of a single case execution.
/// The captured stdout/stderr are excerpts already truncated to the
/// configured cap; full output is not retained, only enough for triage.
///
/// 表示单个用例执行的最终结果。
/// 捕获的 stdout/stderr 是已按配置上限截断的摘要；
/// 不保留完整输出，只保留足够用于排查的内容。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CaseResult {
    /// Provisioning and verification both succeeded.
    /// 配置和验证均成功。
    Passed {
        /// The case that was executed / 被执行的用例
        case: CaseSpec,
        /// Truncated stdout excerpt / 截断后的 stdout 摘要
        stdout: String,
        /// Truncated stderr excerpt / 截断后的 stderr 摘要
        stderr: String,
        /// Wall time of the case / 用例的耗时
        duration: Duration,
    },
    /// The case failed; `reason` records the phase it failed in.
    /// 用例失败；`reason` 记录失败发生的阶段。
    Failed {
        case: CaseSpec,
        stdout: String,
        stderr: String,
        /// Exit code of the failing process, if it ran and exited normally.
        /// 失败进程的退出码（如果它运行并正常退出）。
        exit_code: Option<i32>,
        reason: FailureReason,
        duration: Duration,
    },
    /// The case never ran because the run was cancelled before it started.
    /// 用例从未运行，因为在它开始之前运行已被取消。
    Skipped {
        case: CaseSpec,
    },
}

impl CaseResult {
    /// Gets the name of the case this result belongs to.
    pub fn case_name(&self) -> &str {
        match self {
            CaseResult::Passed { case, .. } => &case.name,
            CaseResult::Failed { case, .. } => &case.name,
            CaseResult::Skipped { case } => &case.name,
        }
    }

    /// `true` only for a passed case.
    pub fn succeeded(&self) -> bool {
        matches!(self, CaseResult::Passed { .. })
    }

    /// Checks if the result is any kind of failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, CaseResult::Failed { .. })
    }

    /// Checks if the result is a failure that was explicitly allowed for the
    /// current platform.
    pub fn is_allowed_failure(&self) -> bool {
        match self {
            CaseResult::Failed { case, .. } => {
                case.allow_failure.iter().any(|s| s == std::env::consts::OS)
            }
            _ => false,
        }
    }

    /// Checks if the result is a failure that was not explicitly allowed.
    /// Teardown failures are excluded; they are logged but never fail a run.
    pub fn is_unexpected_failure(&self) -> bool {
        match self {
            CaseResult::Failed { case, reason, .. } => {
                *reason != FailureReason::Teardown
                    && *reason != FailureReason::Cancelled
                    && !case.allow_failure.iter().any(|s| s == std::env::consts::OS)
            }
            _ => false,
        }
    }

    /// Checks if the case was cancelled (or never started) because of a
    /// shutdown signal.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            CaseResult::Failed {
                reason: FailureReason::Cancelled,
                ..
            } | CaseResult::Skipped { .. }
        )
    }

    /// `true` for the synthetic result of the teardown pass.
    pub fn is_teardown(&self) -> bool {
        self.case_name() == TEARDOWN_CASE_NAME
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            CaseResult::Failed {
                reason: FailureReason::Timeout,
                ..
            }
        )
    }

    /// Exit code view of the result: 0 for passed cases, the failing process
    /// exit code for failures, `None` when no process exited (timeout, spawn
    /// error, skipped).
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CaseResult::Passed { .. } => Some(0),
            CaseResult::Failed { exit_code, .. } => *exit_code,
            CaseResult::Skipped { .. } => None,
        }
    }

    /// Gets the duration of the case. Returns `None` for skipped cases.
    /// 获取用例的耗时。对于跳过的用例，返回 `None`。
    pub fn get_duration(&self) -> Option<Duration> {
        match self {
            CaseResult::Passed { duration, .. } => Some(*duration),
            CaseResult::Failed { duration, .. } => Some(*duration),
            CaseResult::Skipped { .. } => None,
        }
    }

    /// The truncated stdout excerpt. Empty for skipped cases.
    pub fn stdout_excerpt(&self) -> &str {
        match self {
            CaseResult::Passed { stdout, .. } => stdout,
            CaseResult::Failed { stdout, .. } => stdout,
            CaseResult::Skipped { .. } => "",
        }
    }

    /// The truncated stderr excerpt. Empty for skipped cases.
    pub fn stderr_excerpt(&self) -> &str {
        match self {
            CaseResult::Passed { stderr, .. } => stderr,
            CaseResult::Failed { stderr, .. } => stderr,
            CaseResult::Skipped { .. } => "",
        }
    }

    /// Gets the status of the result as a string for display.
    /// 以字符串形式获取结果的状态以供显示。
    pub fn status_str(&self) -> String {
        match self {
            CaseResult::Passed { .. } => t!("status.passed").to_string(),
            CaseResult::Failed { reason, .. } => match reason {
                FailureReason::Timeout => t!("status.timeout").to_string(),
                FailureReason::Cancelled => t!("status.cancelled").to_string(),
                _ => {
                    if self.is_allowed_failure() {
                        t!("status.allowed_failure").to_string()
                    } else {
                        t!("status.failed").to_string()
                    }
                }
            },
            CaseResult::Skipped { .. } => t!("status.skipped").to_string(),
        }
    }

    /// Gets the appropriate CSS class for the status in the HTML report.
    pub fn status_class(&self) -> &str {
        match self {
            CaseResult::Passed { .. } => "status-Passed",
            CaseResult::Failed { reason, .. } => match reason {
                FailureReason::Timeout => "status-Timeout",
                FailureReason::Cancelled => "status-Cancelled",
                _ => {
                    if self.is_allowed_failure() {
                        "status-Allowed-Failure"
                    } else {
                        "status-Failed"
                    }
                }
            },
            CaseResult::Skipped { .. } => "status-Skipped",
        }
    }
}
