//! # Models Module Unit Tests / Models 模块单元测试
//!
//! Unit tests for `CaseResult` and `FailureReason`: the predicates driving
//! exit-code aggregation, the accessor methods and JSON serialization.
//!
//! `CaseResult` 和 `FailureReason` 的单元测试：
//! 驱动退出码聚合的谓词、访问器方法以及 JSON 序列化。

use std::time::Duration;

use env_matrix::core::config::{CaseSpec, TEARDOWN_CASE_NAME};
use env_matrix::core::models::{CaseResult, FailureReason};

fn spec(name: &str) -> CaseSpec {
    CaseSpec {
        name: name.to_string(),
        verify: "exit 0".to_string(),
        ..CaseSpec::default()
    }
}

fn passed(name: &str) -> CaseResult {
    CaseResult::Passed {
        case: spec(name),
        stdout: String::new(),
        stderr: String::new(),
        duration: Duration::from_secs(1),
    }
}

fn failed(name: &str, reason: FailureReason, exit_code: Option<i32>) -> CaseResult {
    CaseResult::Failed {
        case: spec(name),
        stdout: "out".to_string(),
        stderr: "err".to_string(),
        exit_code,
        reason,
        duration: Duration::from_secs(1),
    }
}

#[cfg(test)]
mod predicate_tests {
    use super::*;

    #[test]
    fn test_passed_case_is_a_success() {
        let result = passed("ok");

        assert!(result.succeeded());
        assert!(!result.is_failure());
        assert!(!result.is_unexpected_failure());
        assert_eq!(result.exit_code(), Some(0));
    }

    #[test]
    fn test_failed_case_is_an_unexpected_failure_by_default() {
        let result = failed("bad", FailureReason::Verify, Some(3));

        assert!(result.is_failure());
        assert!(result.is_unexpected_failure());
        assert!(!result.is_allowed_failure());
        assert_eq!(result.exit_code(), Some(3));
    }

    #[test]
    fn test_allow_failure_on_current_os_downgrades_the_failure() {
        // 当前平台在 allow_failure 列表中时，失败是预期内的
        let mut case = spec("flaky");
        case.allow_failure = vec![std::env::consts::OS.to_string()];
        let result = CaseResult::Failed {
            case,
            stdout: String::new(),
            stderr: String::new(),
            exit_code: Some(1),
            reason: FailureReason::Verify,
            duration: Duration::from_secs(1),
        };

        assert!(result.is_allowed_failure());
        assert!(!result.is_unexpected_failure());
    }

    #[test]
    fn test_teardown_failure_never_counts_as_unexpected() {
        let result = failed(TEARDOWN_CASE_NAME, FailureReason::Teardown, None);

        assert!(result.is_teardown());
        assert!(result.is_failure());
        assert!(!result.is_unexpected_failure());
    }

    #[test]
    fn test_cancelled_results_are_tracked_separately() {
        let cancelled = failed("late", FailureReason::Cancelled, None);
        let skipped = CaseResult::Skipped { case: spec("never") };

        assert!(cancelled.is_cancelled());
        assert!(skipped.is_cancelled());
        assert!(!cancelled.is_unexpected_failure());
        assert!(!skipped.is_failure());
    }

    #[test]
    fn test_timeout_is_a_distinct_kind() {
        let result = failed("slow", FailureReason::Timeout, None);

        assert!(result.is_timeout());
        assert!(result.is_unexpected_failure());
        assert_eq!(result.exit_code(), None);
    }
}

#[cfg(test)]
mod accessor_tests {
    use super::*;

    #[test]
    fn test_case_name_and_excerpts() {
        let result = failed("named", FailureReason::Setup, Some(1));

        assert_eq!(result.case_name(), "named");
        assert_eq!(result.stdout_excerpt(), "out");
        assert_eq!(result.stderr_excerpt(), "err");
    }

    #[test]
    fn test_skipped_case_has_no_duration_or_output() {
        let result = CaseResult::Skipped { case: spec("never") };

        assert_eq!(result.get_duration(), None);
        assert_eq!(result.exit_code(), None);
        assert_eq!(result.stdout_excerpt(), "");
    }

    #[test]
    fn test_status_classes_for_html_report() {
        assert_eq!(passed("a").status_class(), "status-Passed");
        assert_eq!(
            failed("b", FailureReason::Verify, Some(1)).status_class(),
            "status-Failed"
        );
        assert_eq!(
            failed("c", FailureReason::Timeout, None).status_class(),
            "status-Timeout"
        );
        assert_eq!(
            CaseResult::Skipped { case: spec("d") }.status_class(),
            "status-Skipped"
        );
    }
}

#[cfg(test)]
mod serialization_tests {
    use super::*;

    #[test]
    fn test_results_serialize_to_json() {
        // JSON 导出需要完整的结果可序列化
        let results = vec![
            passed("a"),
            failed("b", FailureReason::Setup, Some(1)),
            CaseResult::Skipped { case: spec("c") },
        ];

        let payload = serde_json::to_string(&results).unwrap();

        assert!(payload.contains("\"Passed\""));
        assert!(payload.contains("\"Failed\""));
        assert!(payload.contains("\"Setup\""));
        assert!(payload.contains("\"Skipped\""));
    }
}
