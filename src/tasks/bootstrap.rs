//! Virtualenv bootstrap.
//!
//! The docs are built against the freshly built package, not whatever is
//! installed system-wide, so the doc toolchain lives in an isolated
//! environment under `bootstrap/`.

use crate::runner::Context;
use crate::util::{fs, process::Tool};
use crate::Result;

/// Create the bootstrap virtualenv and install the pinned doc toolchain.
pub async fn bootstrap(ctx: &Context) -> Result<()> {
    let cfg = &ctx.config;
    fs::create_dir_all(&cfg.bootstrap_dir).await?;

    Tool::new("virtualenv")
        .arg(&cfg.bootstrap_dir)
        .status()
        .await?;

    let pip = cfg.bootstrap_dir.join("bin").join("pip");
    Tool::new(pip)
        .arg("install")
        .args(&cfg.doc_requirements)
        .status()
        .await
}
