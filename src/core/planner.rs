//! # Execution Planner Module / 执行计划模块
//!
//! This module decides which cases of the matrix apply to the current host,
//! filtering by operating system and CPU architecture constraints.
//!
//! 此模块决定矩阵中的哪些用例适用于当前主机，
//! 按操作系统和 CPU 架构约束进行过滤。

use std::env;

use crate::core::config::CaseSpec;

/// The subset of the matrix that applies to the current host.
/// 适用于当前主机的矩阵子集。
#[derive(Debug)]
pub struct ExecutionPlan {
    /// The cases to be executed, in the order they were declared.
    /// Declaration order is part of the report contract, so the planner
    /// never reorders.
    /// 要执行的用例，按声明顺序排列。
    /// 声明顺序是报告约定的一部分，因此计划器从不重新排序。
    pub cases_to_run: Vec<CaseSpec>,
    /// The number of cases filtered out by os/arch constraints.
    /// 由于 os/arch 约束而被过滤掉的用例数量。
    pub filtered_count: usize,
    /// The number of cases that are allowed to fail on the current platform.
    /// 在当前平台上允许失败的用例数量。
    pub flaky_cases_count: usize,
}

/// Creates an execution plan for the given cases by dropping the ones whose
/// `os`/`arch` constraints exclude the current host.
///
/// 通过丢弃其 `os`/`arch` 约束排除当前主机的用例，为给定用例创建执行计划。
pub fn plan_execution(cases: Vec<CaseSpec>) -> ExecutionPlan {
    let current_os = env::consts::OS;
    let current_arch = env::consts::ARCH;

    let (cases_to_run, filtered): (Vec<_>, Vec<_>) = cases.into_iter().partition(|case| {
        (case.os.is_empty() || case.os.iter().any(|o| o == current_os))
            && (case.arch.is_empty() || case.arch.iter().any(|a| a == current_arch))
    });

    let flaky_cases_count = cases_to_run
        .iter()
        .filter(|case| case.allow_failure.iter().any(|os| os == current_os))
        .count();

    ExecutionPlan {
        cases_to_run,
        filtered_count: filtered.len(),
        flaky_cases_count,
    }
}
