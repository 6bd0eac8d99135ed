//! Error types for release task runs.
//!
//! There is no retry or recovery machinery here: a failing external tool
//! aborts the whole task chain, and already-completed steps are not rolled
//! back.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Result type alias for release tasks
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for all release operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file parsing errors
    #[error("config error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A task name that is not in the registry
    #[error("unknown task: {0}")]
    UnknownTask(String),

    /// A task reachable from its own prerequisite chain
    #[error("dependency cycle involving task '{0}'")]
    DependencyCycle(String),

    /// Invalid command line usage
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// An external tool could not be started
    #[error("failed to spawn `{command}`: {source}")]
    CommandSpawn {
        /// Rendered command line
        command: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// An external tool ran but exited non-zero
    #[error("`{command}` exited with {status}")]
    CommandFailed {
        /// Rendered command line
        command: String,
        /// Exit status reported by the OS
        status: ExitStatus,
    },

    /// A required external tool is not installed
    #[error("required tool not found on PATH: {0}")]
    ToolNotFound(String),

    /// A file or directory a task needs as input, or expected an external
    /// tool to produce, does not exist
    #[error("{context}: {}", path.display())]
    MissingPath {
        /// What the path was needed for
        context: &'static str,
        /// The path that does not exist
        path: PathBuf,
    },

    /// No interpreter configured for the requested Python version
    #[error("no {kind} interpreter configured for Python {pyver}")]
    UnknownInterpreter {
        /// Interpreter table the lookup went through ("Wine" or "framework")
        kind: &'static str,
        /// Requested Python minor version, e.g. "2.6"
        pyver: String,
    },

    /// `sw_vers` output did not contain a parseable product version
    #[error("could not parse macOS version from sw_vers output")]
    MacosVersion,

    /// Neither `version` nor a readable `version_file` is configured
    #[error("no release version configured: set `version` or `version_file` in the config file")]
    MissingVersion,

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}
