//! [`GitCli`] — shells out to `git` and captures stdout.
//!
//! | Operation        | Command                                      |
//! |------------------|----------------------------------------------|
//! | `changed_paths`  | `git diff --name-only <from> <to> -- <path>` |
//! | `short_revision` | `git rev-parse --short <rev>`                |

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use flowsync_core::ChangeSet;

use crate::{RevisionDiff, VcsError};

/// `git` invoked as a child process.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: OsString,
    work_dir: Option<PathBuf>,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    /// `git` from `PATH`, run in the current directory.
    pub fn new() -> Self {
        Self {
            program: OsString::from("git"),
            work_dir: None,
        }
    }

    /// Run every command inside `dir` instead of the current directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: Some(dir.into()),
            ..Self::new()
        }
    }

    /// Use a different executable (e.g. an absolute path to `git`).
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    fn run(&self, args: &[OsString]) -> Result<String, VcsError> {
        let command = describe(&self.program, args);

        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        if let Some(dir) = &self.work_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|source| VcsError::Spawn {
            command: command.clone(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::info!(
            "git command: {command}\nstdout: {}\nstderr: {stderr}",
            stdout.trim()
        );

        if !output.status.success() {
            return Err(VcsError::CommandFailed {
                command,
                status: output.status.code(),
                stderr,
            });
        }
        Ok(stdout)
    }
}

impl RevisionDiff for GitCli {
    fn changed_paths(&self, from: &str, to: &str, path: &Path) -> Result<ChangeSet, VcsError> {
        let args = [
            OsString::from("diff"),
            OsString::from("--name-only"),
            OsString::from(from),
            OsString::from(to),
            OsString::from("--"),
            path.as_os_str().to_owned(),
        ];
        let stdout = self.run(&args)?;
        Ok(ChangeSet::from_output(&stdout))
    }

    fn short_revision(&self, rev: &str) -> Result<String, VcsError> {
        let args = [
            OsString::from("rev-parse"),
            OsString::from("--short"),
            OsString::from(rev),
        ];
        Ok(self.run(&args)?.trim().to_string())
    }
}

fn describe(program: &OsString, args: &[OsString]) -> String {
    let mut parts = vec![program.to_string_lossy().to_string()];
    parts.extend(args.iter().map(|a| a.to_string_lossy().to_string()));
    parts.join(" ")
}
