//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides utilities for environment directory handling:
//! mapping case names to directories, preparing the environment root and
//! removing environments during teardown.
//!
//! 此模块提供环境目录管理的实用功能：
//! 将用例名称映射到目录、准备环境根目录以及在清理阶段移除环境。

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Maps a case name to the directory its environment lives in.
///
/// Non-alphanumeric characters are flattened to `_` so the name stays a safe
/// single path component on every platform.
///
/// # Arguments
/// * `env_root` - Root directory for all environments of a run
/// * `case_name` - Name of the case, doubles as the environment identifier
pub fn env_dir(env_root: &Path, case_name: &str) -> PathBuf {
    let sanitized_name = case_name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>();

    env_root.join(sanitized_name)
}

/// Creates the environment root if it is missing and returns its absolute
/// path, so later joins are stable against working-directory changes.
pub fn prepare_env_root(root: &Path) -> Result<PathBuf> {
    fs::create_dir_all(root).with_context(|| {
        format!("Failed to create environment root: {}", root.display())
    })?;
    fs::canonicalize(root).with_context(|| {
        format!("Failed to resolve environment root: {}", root.display())
    })
}

/// Removes a single environment directory.
///
/// Removing an absent directory is a no-op, not an error, so a second
/// teardown pass over the same names never fails. Returns whether anything
/// was actually removed.
///
/// 移除单个环境目录。
/// 移除不存在的目录是空操作而不是错误，因此对同一组名称的第二次清理
/// 永远不会失败。返回是否真的移除了内容。
pub fn remove_env_dir(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(path).with_context(|| {
        format!(
            "Failed to remove environment directory: {}",
            path.display()
        )
    })?;
    Ok(true)
}
