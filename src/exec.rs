//! # External Tool Invocation
//!
//! Every expensive step (discovery, clone, pull, configure, build, install)
//! is a blocking child-process call. This module is the single place where
//! those processes are spawned, so the output policy and error reporting
//! stay uniform.
//!
//! The caller picks what happens to the child's output:
//!
//! - [`ExecOutput::Capture`]: stdout and stderr are collected and returned;
//!   on failure they are attached to the [`Error::Tool`] for diagnostics.
//! - [`ExecOutput::Stream`]: the child inherits the parent's stdio, for
//!   long-running steps whose progress the user wants to watch.
//! - [`ExecOutput::Discard`]: output goes to the null device; used for
//!   noisy steps that only matter by their exit code.
//!
//! Timeouts are deliberately not enforced: a hung tool blocks the current
//! instance's reconciliation until it exits.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// What to do with a spawned child's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecOutput {
    /// Collect combined stdout/stderr and return it.
    Capture,
    /// Let the child write straight to the terminal.
    Stream,
    /// Send everything to the null device.
    Discard,
}

/// Run an external command to completion.
///
/// Returns the captured output for [`ExecOutput::Capture`], `None`
/// otherwise. A non-zero exit maps to [`Error::Tool`] with the command line
/// and any captured output attached.
pub fn execute(program: &str, args: &[&str], cwd: Option<&Path>, output: ExecOutput) -> Result<Option<String>> {
    let mut cmd = Command::new(program);
    cmd.args(args);

    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    log::debug!("executing: {} {}", program, args.join(" "));

    match output {
        ExecOutput::Capture => {
            let out = cmd
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output()
                .map_err(|e| spawn_error(program, args, e))?;

            let mut combined = String::from_utf8_lossy(&out.stdout).into_owned();
            let stderr = String::from_utf8_lossy(&out.stderr);
            if !stderr.is_empty() {
                combined.push_str(&stderr);
            }

            if !out.status.success() {
                return Err(Error::Tool {
                    command: command_line(program, args),
                    output: Some(combined),
                });
            }

            Ok(Some(combined))
        }
        ExecOutput::Stream | ExecOutput::Discard => {
            if output == ExecOutput::Discard {
                cmd.stdout(Stdio::null()).stderr(Stdio::null());
            }

            let status = cmd
                .status()
                .map_err(|e| spawn_error(program, args, e))?;

            if !status.success() {
                return Err(Error::Tool {
                    command: command_line(program, args),
                    output: None,
                });
            }

            Ok(None)
        }
    }
}

/// Like [`execute`], but a failed invocation yields `None` instead of an
/// error. Used for probes (current branch, tag lookup) and for steps whose
/// failure must not block reconciliation (distclean on a broken tree).
pub fn try_execute(program: &str, args: &[&str], cwd: Option<&Path>, output: ExecOutput) -> Option<String> {
    match execute(program, args, cwd, output) {
        Ok(out) => out,
        Err(e) => {
            log::debug!("ignored failure: {}", e);
            None
        }
    }
}

fn command_line(program: &str, args: &[&str]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

fn spawn_error(program: &str, args: &[&str], e: std::io::Error) -> Error {
    Error::Tool {
        command: command_line(program, args),
        output: Some(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_returns_stdout() {
        let out = execute("echo", &["hello"], None, ExecOutput::Capture).unwrap();
        assert_eq!(out.unwrap().trim(), "hello");
    }

    #[test]
    fn test_discard_returns_none() {
        let out = execute("true", &[], None, ExecOutput::Discard).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn test_nonzero_exit_is_tool_error() {
        let err = execute("false", &[], None, ExecOutput::Discard).unwrap_err();
        match err {
            Error::Tool { command, output } => {
                assert_eq!(command, "false");
                assert!(output.is_none());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_program_is_tool_error() {
        let err = execute("pgforge-no-such-tool", &[], None, ExecOutput::Capture).unwrap_err();
        assert!(matches!(err, Error::Tool { .. }));
    }

    #[test]
    fn test_try_execute_swallows_failure() {
        assert!(try_execute("false", &[], None, ExecOutput::Discard).is_none());
        assert_eq!(
            try_execute("echo", &["ok"], None, ExecOutput::Capture)
                .unwrap()
                .trim(),
            "ok"
        );
    }
}
