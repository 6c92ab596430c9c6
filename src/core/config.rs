use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::infra::t;

/// Name reserved for the synthetic result of the teardown pass that is
/// appended after the last case.
/// 为清理阶段的合成结果保留的名称，该结果会附加在最后一个用例之后。
pub const TEARDOWN_CASE_NAME: &str = "teardown";

/// Default cap, in characters, for captured stdout/stderr excerpts.
/// 捕获的 stdout/stderr 摘要的默认字符上限。
pub const DEFAULT_OUTPUT_CAP: usize = 500;

/// Directory used for environments when the configuration does not name one.
const DEFAULT_ENV_ROOT: &str = ".env-matrix";

/// Represents a single case of the compatibility matrix.
/// Each `CaseSpec` names an isolated environment, the shell steps that
/// provision it and the command that verifies it.
///
/// 代表兼容性矩阵中的单个用例。
/// 每个 `CaseSpec` 命名一个隔离环境、配置该环境的 shell 步骤以及验证它的命令。
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CaseSpec {
    /// The unique name for the case. It doubles as the identifier of the
    /// environment directory created under the environment root.
    /// 用例的唯一名称。它同时作为在环境根目录下创建的环境目录的标识符。
    pub name: String,
    /// Ordered provisioning steps. Each step is one shell command line and
    /// runs as its own process; `{env}` expands to the environment directory.
    /// 有序的配置步骤。每个步骤是一行 shell 命令并在独立进程中运行；
    /// `{env}` 会展开为环境目录。
    #[serde(default)]
    pub setup: Vec<String>,
    /// The verification command. Exit code 0 marks the case as passed.
    /// 验证命令。退出码为 0 表示用例通过。
    pub verify: String,
    /// An optional timeout in seconds for the whole case. If provisioning
    /// plus verification run longer, the case is marked as a timeout failure.
    /// 用例整体的可选超时时间（秒）。如果配置加验证超过该时间，
    /// 用例将被标记为超时失败。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// A list of operating systems (e.g., "windows", "linux") on which this
    /// case is allowed to fail without causing the overall run to fail.
    /// 一个操作系统列表（例如 "windows", "linux"），在此列表中的系统上，
    /// 该用例允许失败，而不会导致整个运行失败。
    #[serde(default)]
    pub allow_failure: Vec<String>,
    /// A list of operating systems on which this case should run at all.
    /// If empty, the case runs everywhere.
    /// 此用例应当运行的操作系统列表。如果为空，则在所有系统上运行。
    #[serde(default)]
    pub os: Vec<String>,
    /// A list of CPU architectures (e.g., "x86_64", "aarch64") on which this
    /// case should be run. If empty, the case runs on all architectures.
    /// 一个 CPU 架构列表（例如 "x86_64", "aarch64"），此用例应在这些架构上运行。
    /// 如果为空，则该用例在所有架构上运行。
    #[serde(default)]
    pub arch: Vec<String>,
}

impl Default for CaseSpec {
    fn default() -> Self {
        Self {
            name: "unknown".to_string(),
            setup: vec![],
            verify: String::new(),
            timeout_secs: None,
            allow_failure: vec![],
            os: vec![],
            arch: vec![],
        }
    }
}

/// Represents the entire compatibility matrix, loaded from a TOML file.
/// It contains global settings and the list of all cases.
/// 代表从 TOML 文件加载的整个兼容性矩阵。
/// 它包含全局设置和所有用例的列表。
#[derive(Debug, Deserialize, Serialize)]
pub struct EnvMatrix {
    /// The language for the runner's output messages (e.g., "en", "zh-CN").
    /// Defaults to "en" if not specified.
    ///
    /// 运行器输出消息的语言（例如 "en", "zh-CN"）。
    /// 如果未指定，则默认为 "en"。
    #[serde(default = "default_language")]
    pub language: String,

    /// Root directory under which environment directories are created.
    /// Tilde and environment variables are expanded. Defaults to
    /// `.env-matrix` in the working directory.
    /// 环境目录的根目录。波浪号和环境变量会被展开。
    /// 默认为工作目录下的 `.env-matrix`。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_root: Option<String>,

    /// Cap, in characters, for the stdout/stderr excerpts stored on results.
    /// 结果中保存的 stdout/stderr 摘要的字符上限。
    #[serde(default = "default_output_cap")]
    pub output_cap: usize,

    /// A vector containing all the cases to be potentially executed.
    /// 一个包含所有可能被执行的用例的向量。
    pub cases: Vec<CaseSpec>,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_output_cap() -> usize {
    DEFAULT_OUTPUT_CAP
}

impl EnvMatrix {
    /// Reads and validates a matrix configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| t!("config.read_failed", path = path.display()).to_string())?;
        let matrix: EnvMatrix =
            toml::from_str(&content).with_context(|| t!("config.parse_failed").to_string())?;
        matrix.validate()?;
        Ok(matrix)
    }

    /// Case names double as environment directory names, so they must be
    /// non-empty, unique and must not collide with the reserved teardown name.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for case in &self.cases {
            if case.name.trim().is_empty() {
                bail!(t!("config.empty_case_name").to_string());
            }
            if case.name == TEARDOWN_CASE_NAME {
                bail!(t!("config.reserved_case_name", name = &case.name).to_string());
            }
            if !seen.insert(case.name.as_str()) {
                bail!(t!("config.duplicate_case_name", name = &case.name).to_string());
            }
        }
        Ok(())
    }

    /// Resolves the configured environment root, expanding `~` and `$VARS`.
    pub fn resolved_env_root(&self) -> Result<PathBuf> {
        match &self.env_root {
            Some(raw) => {
                let expanded = shellexpand::full(raw).with_context(|| {
                    t!("config.env_root_expand_failed", path = raw).to_string()
                })?;
                Ok(PathBuf::from(expanded.into_owned()))
            }
            None => Ok(PathBuf::from(DEFAULT_ENV_ROOT)),
        }
    }
}
