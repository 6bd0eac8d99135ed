//! Release task runner for a scientific Python package.
//!
//! This library provides the machinery behind the `superpack` binary:
//! - a task registry with prerequisite chains, run strictly in order
//! - the Windows "superpack" installer pipeline (per-arch Wine builds,
//!   NSIS script rendering, makensis invocation)
//! - documentation builds (HTML, LaTeX, PDF) and their relocation
//! - release bookkeeping (checksum manifest, notes, changelog)
//! - the macOS mpkg/dmg packaging pipeline
//!
//! Every task is a linear sequence of filesystem operations and blocking
//! subprocess invocations; there is no concurrency and no retry.

pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod tasks;
pub mod util;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use runner::{Context, Runner, TaskOptions};
