//! Documentation build tasks.
//!
//! The actual building is delegated to the doc tree's Makefile; these
//! tasks only invoke it and relocate the output trees to where the release
//! packaging picks them up. Destinations are recreated from empty each
//! time, never merged.

use crate::runner::Context;
use crate::util::{fs, process::Tool};
use crate::Result;

/// Build the HTML documentation and relocate it into `build/html`.
pub async fn html(ctx: &Context) -> Result<()> {
    let cfg = &ctx.config;
    Tool::new("make")
        .arg("html")
        .current_dir(&cfg.doc_root)
        .status()
        .await?;

    let built = cfg.doc_build().join("html");
    let dest = cfg.html_dest();
    fs::remove_dir_all(&dest).await?;
    fs::copy_dir(&built, &dest).await
}

/// Build the LaTeX documentation.
pub async fn latex(ctx: &Context) -> Result<()> {
    Tool::new("make")
        .arg("latex")
        .current_dir(&ctx.config.doc_root)
        .status()
        .await
}

/// Compile the LaTeX output to PDF and stage the user guide and reference
/// manual into `build/pdf`. The `latex` task has already run.
pub async fn pdf(ctx: &Context) -> Result<()> {
    let cfg = &ctx.config;
    let latex_dir = cfg.doc_build().join("latex");
    Tool::new("make")
        .arg("all-pdf")
        .current_dir(&latex_dir)
        .status()
        .await?;

    let dest = cfg.pdf_dest();
    fs::recreate_dir(&dest).await?;

    let user = latex_dir.join(format!("{}-user.pdf", cfg.project));
    fs::copy_file(&user, &dest.join("userguide.pdf")).await?;
    let reference = latex_dir.join(format!("{}-ref.pdf", cfg.project));
    fs::copy_file(&reference, &dest.join("reference.pdf")).await
}
