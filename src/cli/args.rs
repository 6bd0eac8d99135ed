//! Command line argument parsing and validation.

use clap::Parser;
use std::path::PathBuf;

/// Release task runner for a scientific Python package
#[derive(Parser, Debug)]
#[command(
    name = "superpack",
    version,
    about = "Release task runner: installers, docs, checksums and release notes",
    long_about = "Runs named release tasks with their prerequisite chains.

The Windows superpack (three CPU-arch-specific builds packed into one
self-extracting NSIS installer) is built under Wine; configure the Wine
Python locations in release.toml ([windows.python]) first:

  superpack bdist_superpack
  superpack bdist_wininst_simple --pyver 2.5

Changelog and notes, with the checksum manifest over release/installers:

  superpack write_release write_log
  superpack write_note_changelog

Tasks run strictly in order; the first failure aborts the run."
)]
pub struct Args {
    /// Task names to run, in order
    #[arg(value_name = "TASK")]
    pub tasks: Vec<String>,

    /// Path to the release configuration file (default: ./release.toml
    /// when present, built-in defaults otherwise)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Python minor version the installers target
    #[arg(long, value_name = "VER", default_value = "2.6")]
    pub pyver: String,

    /// Keep the build directory between arch-specific installer builds
    #[arg(long)]
    pub no_scratch: bool,

    /// List available tasks and exit
    #[arg(long)]
    pub list: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.tasks.is_empty() && !self.list {
            return Err("no tasks given (try --list)".to_string());
        }
        Ok(())
    }
}
