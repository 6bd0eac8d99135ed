//! superpack - release task runner for a scientific Python package.
//!
//! This binary drives release builds: platform installers (Windows
//! superpack via Wine + NSIS, macOS mpkg/dmg), documentation, checksums,
//! and release notes, as a set of named tasks with prerequisite chains.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match superpack::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
