//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for env-matrix,
//! including shell command execution and environment directory handling.
//!
//! 此模块为 env-matrix 提供基础设施服务，
//! 包括 shell 命令执行和环境目录管理。

pub mod command;
pub mod fs;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
