//! Windows installer pipeline, run under Wine.
//!
//! The superpack is a single self-extracting installer bundling three
//! CPU-architecture-specific builds; the NSIS installer picks the right
//! one at install time. Each variant is built by the Wine Python with
//! BLAS/LAPACK pointed at arch-specific library trees, staged under
//! `build-superpack/binaries`, then packed by `makensis` from a rendered
//! superinstaller script.

pub mod script;

use std::fmt;
use std::path::PathBuf;

use crate::config::{Config, SiteCfg};
use crate::runner::Context;
use crate::util::{fs, process::Tool};
use crate::{Error, Result};

/// CPU architecture variant of one wininst build.
///
/// The set is closed: the superpack bundles exactly these three.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Arch {
    /// Plain x87 build, no SIMD
    Nosse,
    /// SSE2-optimized build
    Sse2,
    /// SSE3-optimized build
    Sse3,
}

impl Arch {
    /// All variants, in superpack bundling order.
    pub const ALL: [Arch; 3] = [Arch::Nosse, Arch::Sse2, Arch::Sse3];

    /// Short tag embedded in staged filenames.
    pub fn tag(self) -> &'static str {
        match self {
            Arch::Nosse => "nosse",
            Arch::Sse2 => "sse2",
            Arch::Sse3 => "sse3",
        }
    }

    /// Placeholder token this variant's binary name replaces in the
    /// superinstaller template.
    pub fn token(self) -> &'static str {
        match self {
            Arch::Nosse => "@NOSSE_BINARY@",
            Arch::Sse2 => "@SSE2_BINARY@",
            Arch::Sse3 => "@SSE3_BINARY@",
        }
    }

    /// BLAS/LAPACK locations for this variant. Total over the enum by
    /// construction.
    pub fn site_cfg(self, config: &Config) -> &SiteCfg {
        let site = &config.windows.site;
        match self {
            Arch::Nosse => &site.nosse,
            Arch::Sse2 => &site.sse2,
            Arch::Sse3 => &site.sse3,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Name of the installer as the packaging toolchain drops it in `dist/`.
/// The toolchain hardcodes this shape; it is reproduced here.
pub fn wininst_name(config: &Config, pyver: &str) -> String {
    format!(
        "{}-{}.win32-py{}.exe",
        config.project, config.version, pyver
    )
}

/// Name of a wininst as staged inside the superpack, arch encoded.
pub fn internal_name(config: &Config, arch: Arch) -> String {
    format!("{}-{}-{}.exe", config.project, config.version, arch.tag())
}

/// Filename of the combined superpack installer.
pub fn superpack_name(config: &Config, pyver: &str) -> String {
    format!(
        "{}-{}-win32-superpack-python{}.exe",
        config.project, config.version, pyver
    )
}

fn wine_python(ctx: &Context) -> Result<&Vec<String>> {
    let pyver = &ctx.opts.pyver;
    ctx.config
        .windows
        .python
        .get(pyver)
        .filter(|cmd| !cmd.is_empty())
        .ok_or_else(|| Error::UnknownInterpreter {
            kind: "Wine",
            pyver: pyver.clone(),
        })
}

/// Invoke the Wine Python build, optionally with BLAS/LAPACK overrides.
async fn run_wininst_build(ctx: &Context, site: Option<&SiteCfg>) -> Result<()> {
    let command = wine_python(ctx)?;
    let mut tool = Tool::new(&command[0])
        .args(&command[1..])
        .args(["setup.py", "build", "-c", "mingw32", "bdist_wininst"]);
    if let Some(site) = site {
        tool = tool.env("BLAS", &site.blas).env("LAPACK", &site.lapack);
    }
    tool.status().await
}

/// Build one arch-specific wininst and stage it under the superpack
/// binaries directory, overwriting any previous staging of that arch.
pub async fn build_variant(ctx: &Context, arch: Arch) -> Result<()> {
    let cfg = &ctx.config;
    if ctx.opts.scratch {
        fs::remove_dir_all(&cfg.build_dir).await?;
    }
    fs::create_dir_all(&cfg.superpack_bindir()).await?;

    run_wininst_build(ctx, Some(arch.site_cfg(cfg))).await?;

    let source = cfg.dist_dir.join(wininst_name(cfg, &ctx.opts.pyver));
    if !source.is_file() {
        return Err(Error::MissingPath {
            context: "wininst build did not produce the expected installer",
            path: source,
        });
    }
    let target = cfg.superpack_bindir().join(internal_name(cfg, arch));
    fs::remove_file(&target).await?;
    tokio::fs::rename(&source, &target).await?;
    log::info!("staged {} installer as {}", arch, target.display());
    Ok(())
}

/// Build the nosse wininst installer.
pub async fn bdist_wininst_nosse(ctx: &Context) -> Result<()> {
    build_variant(ctx, Arch::Nosse).await
}

/// Build the sse2 wininst installer.
pub async fn bdist_wininst_sse2(ctx: &Context) -> Result<()> {
    build_variant(ctx, Arch::Sse2).await
}

/// Build the sse3 wininst installer.
pub async fn bdist_wininst_sse3(ctx: &Context) -> Result<()> {
    build_variant(ctx, Arch::Sse3).await
}

/// Pack the three staged variants into the superpack installer and copy it
/// into the installers directory. The variant builds have already run
/// through the prerequisite chain.
pub async fn bdist_superpack(ctx: &Context) -> Result<()> {
    let cfg = &ctx.config;
    let nsi = script::render(ctx).await?;

    which::which("makensis").map_err(|_| Error::ToolNotFound("makensis".to_string()))?;
    let nsi_name: PathBuf = nsi
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| nsi.clone());
    Tool::new("makensis")
        .arg(nsi_name)
        .current_dir(&cfg.superpack_build)
        .status()
        .await?;

    let installers = cfg.installers_dir();
    fs::create_dir_all(&installers).await?;
    let name = superpack_name(cfg, &ctx.opts.pyver);
    let built = cfg.superpack_build.join(&name);
    fs::copy_file(&built, &installers.join(&name)).await
}

/// Single-architecture installer without the site overrides; the artifact
/// stays in `dist/`. Runs after `clean` via the prerequisite chain.
pub async fn bdist_wininst_simple(ctx: &Context) -> Result<()> {
    run_wininst_build(ctx, None).await
}
