//! Subprocess invocation helpers.
//!
//! Every external tool is run to completion before the next step; a
//! non-zero exit aborts the calling task with the rendered command line in
//! the error. No timeouts: a hung tool hangs the run.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::error::{Error, Result};

/// One external tool invocation.
///
/// Thin wrapper over [`tokio::process::Command`] that keeps a rendered
/// command line around for error reporting and logging.
pub struct Tool {
    command: Command,
    rendered: String,
}

impl Tool {
    /// Start building an invocation of `program`.
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        let rendered = program.as_ref().to_string_lossy().into_owned();
        Self {
            command: Command::new(program),
            rendered,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.rendered.push(' ');
        self.rendered
            .push_str(&arg.as_ref().to_string_lossy());
        self.command.arg(arg);
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }

    /// Run with the given working directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.command.current_dir(dir);
        self
    }

    /// Add one environment variable.
    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.command.env(key, value);
        self
    }

    /// Rendered command line, for logging.
    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    /// Run to completion, inheriting stdio. Non-zero exit is an error.
    pub async fn status(mut self) -> Result<()> {
        log::info!("running: {}", self.rendered);
        let status = self
            .command
            .status()
            .await
            .map_err(|e| Error::CommandSpawn {
                command: self.rendered.clone(),
                source: e,
            })?;
        if !status.success() {
            return Err(Error::CommandFailed {
                command: self.rendered,
                status,
            });
        }
        Ok(())
    }

    /// Run to completion capturing stdout. Non-zero exit is an error;
    /// stderr is inherited so tool diagnostics stay visible.
    pub async fn stdout(mut self) -> Result<Vec<u8>> {
        log::info!("running: {}", self.rendered);
        let output = self
            .command
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .await
            .map_err(|e| Error::CommandSpawn {
                command: self.rendered.clone(),
                source: e,
            })?;
        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: self.rendered,
                status: output.status,
            });
        }
        Ok(output.stdout)
    }
}
