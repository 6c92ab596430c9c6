use tokio::io::{AsyncBufReadExt, BufReader};

use crate::infra::t;

/// Marker appended to an excerpt when output was dropped at the cap.
const TRUNCATION_MARKER: char = '…';

/// Builds a command that runs `line` through the platform shell.
/// Setup and verification lines are shell command lines, so quoting,
/// pipes and redirections inside them keep working.
///
/// 构建一个通过平台 shell 运行 `line` 的命令。
/// 配置和验证行都是 shell 命令行，因此其中的引号、管道和重定向仍然有效。
pub fn shell_command(line: &str) -> tokio::process::Command {
    #[cfg(target_os = "windows")]
    let mut cmd = {
        let mut cmd = tokio::process::Command::new("cmd");
        cmd.arg("/C").arg(line);
        cmd
    };

    #[cfg(not(target_os = "windows"))]
    let mut cmd = {
        let mut cmd = tokio::process::Command::new("sh");
        cmd.arg("-c").arg(line);
        cmd
    };

    cmd.kill_on_drop(true);
    cmd
}

/// Spawns a command and captures its stdout and stderr.
/// The two streams are read concurrently into separate buffers; the result
/// model keeps them apart so reports can show where a diagnostic came from.
///
/// # Arguments
/// * `cmd` - The `tokio::process::Command` to execute.
///
/// # Returns
/// A tuple containing:
/// - The `ExitStatus` of the process wrapped in an `io::Result`.
/// - The captured stdout as a `String`.
/// - The captured stderr as a `String`.
///
/// 派生一个命令，捕获其 stdout 和 stderr。
/// 两个流被并发读取到独立的缓冲区中；结果模型将它们分开保存，
/// 以便报告能够显示诊断信息的来源。
pub async fn spawn_and_capture(
    mut cmd: tokio::process::Command,
) -> (std::io::Result<std::process::ExitStatus>, String, String) {
    // Configure the command to capture stdout and stderr.
    // 配置命令以捕获 stdout 和 stderr。
    let mut child = match cmd
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            // If spawning fails, we return the error and empty output.
            // 如果派生失败，我们返回错误和空输出。
            return (Err(e), String::new(), String::new());
        }
    };

    let stdout = match child.stdout.take() {
        Some(stdout) => stdout,
        None => {
            return (
                Err(std::io::Error::other(
                    t!("command.capture_stdout_failed").to_string(),
                )),
                String::new(),
                String::new(),
            );
        }
    };
    let stderr = match child.stderr.take() {
        Some(stderr) => stderr,
        None => {
            return (
                Err(std::io::Error::other(
                    t!("command.capture_stderr_failed").to_string(),
                )),
                String::new(),
                String::new(),
            );
        }
    };

    // Read each stream line by line in its own task.
    // 在各自的任务中逐行读取每个流。
    let stdout_handle = tokio::spawn(async move {
        let reader = BufReader::new(stdout);
        let mut lines = reader.lines();
        let mut buf = String::new();
        while let Ok(Some(line)) = lines.next_line().await {
            buf.push_str(&line);
            buf.push('\n');
        }
        buf
    });
    let stderr_handle = tokio::spawn(async move {
        let reader = BufReader::new(stderr);
        let mut lines = reader.lines();
        let mut buf = String::new();
        while let Ok(Some(line)) = lines.next_line().await {
            buf.push_str(&line);
            buf.push('\n');
        }
        buf
    });

    // Wait for the process to exit.
    // 等待进程退出。
    let status = child.wait().await;

    // Join the reader tasks so all output is captured before returning.
    // 等待读取任务结束，确保返回前捕获了全部输出。
    let stdout_buf = match stdout_handle.await {
        Ok(buf) => buf,
        Err(e) => {
            eprintln!("Failed to join stdout task: {}", e);
            String::new()
        }
    };
    let stderr_buf = match stderr_handle.await {
        Ok(buf) => buf,
        Err(e) => {
            eprintln!("Failed to join stderr task: {}", e);
            String::new()
        }
    };

    (status, stdout_buf, stderr_buf)
}

/// Truncates `text` to at most `cap` characters, cutting on a character
/// boundary and ending with a marker when anything was dropped. Reports only
/// need a bounded prefix for triage, not the full output.
///
/// 将 `text` 截断为最多 `cap` 个字符，在字符边界处截断，
/// 并在有内容被丢弃时以标记结尾。报告只需要一个有界的前缀用于排查，
/// 不需要完整输出。
pub fn truncate_excerpt(text: &str, cap: usize) -> String {
    if cap == 0 {
        return String::new();
    }
    if text.chars().count() <= cap {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(cap - 1).collect();
    truncated.push(TRUNCATION_MARKER);
    truncated
}
