//! Shared filesystem and subprocess helpers.

pub mod fs;
pub mod process;
