//! # Core Module / 核心模块
//!
//! This module contains the core functionality of env-matrix,
//! including data models, configuration and the matrix execution engine.
//!
//! 此模块包含 env-matrix 的核心功能，
//! 包括数据模型、配置和矩阵执行引擎。

pub mod config;
pub mod execution;
pub mod models;
pub mod planner;

// Re-exports
pub use config::EnvMatrix;
pub use execution::run_matrix;
pub use models::CaseResult;
