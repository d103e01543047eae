//! Synchronous external tool execution.
//!
//! All toolchain, packager, and device-enumeration invocations in stagehand
//! are blocking calls. A non-zero exit code is surfaced as
//! [`PlatformError::ExternalTool`] carrying the code; termination without a
//! code is a distinct error.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::error::PlatformError;

/// Run a shell command string and map its exit status into the error
/// taxonomy. Returns the trimmed stdout on success.
pub fn run_shell(cmd: &str, cwd: Option<&Path>) -> Result<String, PlatformError> {
    info!(cmd = %cmd, "running shell command");

    let (shell, shell_arg) = default_shell();
    let mut command = Command::new(shell);
    command.arg(shell_arg).arg(cmd);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    capture(command, cmd)
}

/// Run a program directly with arguments, without shell interpretation.
/// Returns the trimmed stdout on success.
pub fn run_tool<I, S>(program: &str, args: I) -> Result<String, PlatformError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    info!(tool = %program, "running external tool");

    let mut command = Command::new(program);
    command.args(args);

    capture(command, program)
}

fn capture(mut command: Command, label: &str) -> Result<String, PlatformError> {
    let output = command.output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            debug!(stderr = %stderr, "tool stderr");
        }
        return match output.status.code() {
            Some(code) => Err(PlatformError::ExternalTool {
                tool: label.to_string(),
                code,
            }),
            None => Err(PlatformError::ToolTerminated {
                tool: label.to_string(),
            }),
        };
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !stdout.is_empty() {
        debug!(stdout = %stdout, "tool output");
    }
    Ok(stdout)
}

/// The shell used for command-string execution.
///
/// Always the system shell rather than `$SHELL`: interactive shells source
/// profile files that change the environment between build agents.
fn default_shell() -> (&'static str, &'static str) {
    #[cfg(unix)]
    {
        ("/bin/sh", "-c")
    }

    #[cfg(windows)]
    {
        ("cmd.exe", "/C")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn run_shell_captures_stdout() {
        let out = run_shell("echo hello", None).unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    #[cfg(unix)]
    fn run_shell_maps_exit_code() {
        let err = run_shell("exit 3", None).unwrap_err();
        assert!(matches!(err, PlatformError::ExternalTool { code: 3, .. }));
    }

    #[test]
    #[cfg(unix)]
    fn run_shell_respects_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let out = run_shell("pwd", Some(temp.path())).unwrap();
        let canonical = temp.path().canonicalize().unwrap();
        assert_eq!(std::path::PathBuf::from(out), canonical);
    }

    #[test]
    #[cfg(unix)]
    fn run_tool_spawns_directly() {
        let out = run_tool("echo", ["direct"]).unwrap();
        assert_eq!(out, "direct");
    }

    #[test]
    fn missing_tool_is_io_error() {
        let err = run_tool("stagehand-no-such-tool", Vec::<&str>::new()).unwrap_err();
        assert!(matches!(err, PlatformError::Io(_)));
    }
}
