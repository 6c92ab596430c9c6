//! # Matrix Runner Integration Tests / 矩阵运行器集成测试
//!
//! End-to-end tests for `run_matrix` and the teardown pass: result count and
//! ordering, failure isolation between cases, unconditional teardown and
//! output truncation.
//!
//! `run_matrix` 和清理阶段的端到端测试：结果数量与顺序、
//! 用例之间的失败隔离、无条件清理以及输出截断。

mod common;

use env_matrix::core::config::TEARDOWN_CASE_NAME;
use env_matrix::core::execution::{run_matrix, run_teardown, RunOptions};
use env_matrix::core::models::{CaseResult, FailureReason};
use tokio_util::sync::CancellationToken;

use common::{case, options, sandbox};

#[tokio::test]
async fn test_returns_n_plus_one_results_in_declaration_order() {
    let root = sandbox();
    let cases = vec![
        case("alpha", &[], "exit 0"),
        case("beta", &["exit 0"], "exit 0"),
        case("gamma", &[], "exit 0"),
    ];

    let results = run_matrix(cases, &options(&root), &CancellationToken::new()).await;

    // N 个用例 + 1 个清理结果，按声明顺序
    assert_eq!(results.len(), 4);
    let names: Vec<_> = results.iter().map(|r| r.case_name()).collect();
    assert_eq!(names, vec!["alpha", "beta", "gamma", TEARDOWN_CASE_NAME]);
    assert!(results.iter().all(|r| r.succeeded()));
}

#[tokio::test]
async fn test_setup_failure_is_recorded_and_later_cases_still_run() {
    let root = sandbox();
    let cases = vec![
        case("broken", &["exit 1"], "exit 0"),
        case("healthy", &[], "exit 0"),
    ];

    let results = run_matrix(cases, &options(&root), &CancellationToken::new()).await;

    assert_eq!(results.len(), 3);
    match &results[0] {
        CaseResult::Failed {
            reason, exit_code, ..
        } => {
            assert_eq!(*reason, FailureReason::Setup);
            assert_eq!(*exit_code, Some(1));
        }
        other => panic!("expected a setup failure, got {:?}", other),
    }
    // 失败不会使矩阵短路
    assert!(results[1].succeeded());
    assert!(results[2].succeeded());
}

#[tokio::test]
async fn test_verify_failure_is_distinguished_from_setup_failure() {
    let root = sandbox();
    let cases = vec![case("check", &["exit 0"], "exit 3")];

    let results = run_matrix(cases, &options(&root), &CancellationToken::new()).await;

    match &results[0] {
        CaseResult::Failed {
            reason, exit_code, ..
        } => {
            assert_eq!(*reason, FailureReason::Verify);
            assert_eq!(*exit_code, Some(3));
        }
        other => panic!("expected a verification failure, got {:?}", other),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_teardown_removes_created_environments() {
    let root = sandbox();
    // The setup step actually creates the environment directory.
    let cases = vec![
        case("real-env", &["mkdir -p {env}", "touch {env}/marker"], "test -f {env}/marker"),
        case("failed-env", &["mkdir -p {env}", "exit 1"], "exit 0"),
    ];
    let opts = options(&root);

    let results = run_matrix(cases, &opts, &CancellationToken::new()).await;

    assert!(results[0].succeeded());
    assert!(results[1].is_failure());

    // 清理结果是最后一个，并且成功
    let teardown = results.last().unwrap();
    assert!(teardown.is_teardown());
    assert!(teardown.succeeded());

    // Both environment directories are gone, the failed case's included.
    assert!(!root.path().join("real_env").exists());
    assert!(!root.path().join("failed_env").exists());
}

#[tokio::test]
async fn test_teardown_is_idempotent() {
    let root = sandbox();
    let opts = options(&root);
    let cases = vec![case("once", &[], "exit 0")];

    let results = run_matrix(cases, &opts, &CancellationToken::new()).await;

    // 对同一组名称再次清理不会出错
    let second = run_teardown(&results, &opts);
    assert!(second.succeeded());
}

#[tokio::test]
async fn test_empty_matrix_returns_teardown_only() {
    let root = sandbox();

    let results = run_matrix(vec![], &options(&root), &CancellationToken::new()).await;

    assert_eq!(results.len(), 1);
    assert!(results[0].is_teardown());
    assert!(results[0].succeeded());
}

#[cfg(unix)]
#[tokio::test]
async fn test_excerpts_never_exceed_the_configured_cap() {
    let root = sandbox();
    let opts = RunOptions::new(root.path().to_path_buf(), 100);
    // Prints far more than the cap on both streams.
    let noisy = case(
        "noisy",
        &[],
        "yes loud | head -n 500; yes noisy | head -n 500 >&2; exit 5",
    );

    let results = run_matrix(vec![noisy], &opts, &CancellationToken::new()).await;

    match &results[0] {
        CaseResult::Failed { stdout, stderr, .. } => {
            assert!(stdout.chars().count() <= 100);
            assert!(stderr.chars().count() <= 100);
            assert!(stdout.starts_with("loud"));
        }
        other => panic!("expected a failure with captured output, got {:?}", other),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_timeout_produces_a_distinct_result_kind() {
    let root = sandbox();
    let mut slow = case("slow", &[], "sleep 5");
    slow.timeout_secs = Some(1);

    let results = run_matrix(vec![slow], &options(&root), &CancellationToken::new()).await;

    assert!(results[0].is_timeout());
    // 超时后清理仍然运行
    assert!(results[1].is_teardown());
}

#[tokio::test]
async fn test_cancelled_run_skips_cases_but_still_tears_down() {
    let root = sandbox();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let cases = vec![case("a", &[], "exit 0"), case("b", &[], "exit 0")];

    let results = run_matrix(cases, &options(&root), &cancel).await;

    assert_eq!(results.len(), 3);
    assert!(matches!(results[0], CaseResult::Skipped { .. }));
    assert!(matches!(results[1], CaseResult::Skipped { .. }));
    assert!(results[2].is_teardown());
}

#[tokio::test]
async fn test_teardown_runs_even_when_every_case_failed() {
    let root = sandbox();
    let cases = vec![
        case("bad-1", &["exit 1"], "exit 0"),
        case("bad-2", &[], "exit 2"),
    ];

    let results = run_matrix(cases, &options(&root), &CancellationToken::new()).await;

    assert!(results[0].is_failure());
    assert!(results[1].is_failure());
    let teardown = results.last().unwrap();
    assert!(teardown.is_teardown());
    assert!(teardown.succeeded());
}

#[test]
fn test_expand_step_substitutes_env_and_name() {
    let expanded = env_matrix::core::execution::expand_step(
        "{env}/bin/pip install {name}",
        "proto5",
        std::path::Path::new("/tmp/envs/proto5"),
    );

    assert_eq!(expanded, "/tmp/envs/proto5/bin/pip install proto5");
}

#[test]
fn test_expand_step_quotes_paths_with_spaces() {
    // 带空格的环境路径在替换后仍是一个 shell 词
    let expanded = env_matrix::core::execution::expand_step(
        "ls {env}",
        "spacey",
        std::path::Path::new("/tmp/env root/spacey"),
    );

    assert_eq!(expanded, "ls \"/tmp/env root/spacey\"");
}

#[cfg(unix)]
#[tokio::test]
async fn test_env_placeholder_points_each_case_at_its_own_directory() {
    let root = sandbox();
    let cases = vec![
        case("writer", &["mkdir -p {env}", "echo {name} > {env}/owner"], "grep -q writer {env}/owner"),
    ];
    let opts = options(&root);

    let results = run_matrix(cases, &opts, &CancellationToken::new()).await;

    assert!(results[0].succeeded());
}
