//! # Env Matrix Library / Env Matrix 库
//!
//! This library provides the core functionality for the env-matrix tool,
//! a configuration-driven compatibility matrix runner that provisions
//! isolated, disposable environments and verifies package setups inside them.
//!
//! 此库为 env-matrix 工具提供核心功能，
//! 这是一个配置驱动的兼容性矩阵运行器，负责创建隔离的一次性环境并在其中验证包的安装。
//!
//! ## Modules / 模块
//!
//! - `core` - Core data models, configuration and the matrix execution engine
//! - `infra` - Infrastructure services like command execution and file system operations
//! - `reporting` - Run result reporting and visualization
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 核心数据模型、配置和矩阵执行引擎
//! - `infra` - 基础设施服务，如命令执行和文件系统操作
//! - `reporting` - 运行结果报告和可视化
//! - `cli` - 命令行接口和命令

use once_cell::sync::OnceCell;

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use core::config;
pub use core::execution;
pub use core::models;

static ACTIVE_LOCALE: OnceCell<String> = OnceCell::new();

/// Initializes the application's internationalization (i18n) based on the system locale.
///
/// This function detects the user's system locale and sets the appropriate
/// language for the application's user interface. It attempts to match the full
/// locale (e.g., "zh-CN"), then just the language code (e.g., "en"), and
/// finally falls back to the default language ("en"). The resolved locale is
/// cached so later lookups do not query the system again.
pub fn init() {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    // Try to match the full locale first (e.g., "zh-CN")
    // Then try to match the language part only (e.g., "en" from "en-US")
    // Finally, fall back to "en"
    let lang = if available_locales.contains(&locale.as_str()) {
        locale.clone()
    } else {
        locale
            .split('-')
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
            .to_string()
    };

    rust_i18n::set_locale(&lang);
    let _ = ACTIVE_LOCALE.set(lang);
}

/// The locale resolved by [`init`]; defaults to "en" when `init` has not run.
pub fn active_locale() -> &'static str {
    ACTIVE_LOCALE.get().map(String::as_str).unwrap_or("en")
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
