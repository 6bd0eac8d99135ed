//! macOS packaging pipeline: mpkg build and dmg assembly.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::Config;
use crate::runner::Context;
use crate::util::{fs, process::Tool};
use crate::{Error, Result};

static PRODUCT_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ProductVersion:\s+([0-9]+)\.([0-9]+)\.([0-9]+)")
        .unwrap_or_else(|e| panic!("invalid ProductVersion regex: {e}"))
});

/// Extract `(major, minor, patch)` from `sw_vers` output.
///
/// A non-matching output is an explicit error rather than a silent
/// absence; every caller needs the version to name its artifacts.
pub fn parse_product_version(output: &str) -> Result<(u32, u32, u32)> {
    for line in output.lines() {
        if let Some(caps) = PRODUCT_VERSION.captures(line) {
            let part = |i: usize| -> Result<u32> {
                caps[i].parse::<u32>().map_err(|_| Error::MacosVersion)
            };
            return Ok((part(1)?, part(2)?, part(3)?));
        }
    }
    Err(Error::MacosVersion)
}

/// Ask the running system for its macOS version.
pub async fn macos_version() -> Result<(u32, u32, u32)> {
    let out = Tool::new("sw_vers").stdout().await?;
    parse_product_version(&String::from_utf8_lossy(&out))
}

/// Name of the mpkg bundle produced by the packaging toolchain.
pub fn mpkg_name(config: &Config, pyver: &str, osx: (u32, u32)) -> String {
    format!(
        "{}-{}-py{}-macosx{}.{}.mpkg",
        config.project, config.version, pyver, osx.0, osx.1
    )
}

/// Filename of the disk image, tied to the python.org Python it targets.
pub fn dmg_name(config: &Config, pyver: &str) -> String {
    format!(
        "{}-{}-py{}-python.org.dmg",
        config.project, config.version, pyver
    )
}

fn framework_python<'a>(ctx: &'a Context) -> Result<&'a std::path::PathBuf> {
    let pyver = &ctx.opts.pyver;
    ctx.config
        .macos
        .python
        .get(pyver)
        .ok_or_else(|| Error::UnknownInterpreter {
            kind: "framework",
            pyver: pyver.clone(),
        })
}

/// Copy the static gfortran runtime into the build tree so the linker
/// picks the static archive over the dynamic library.
async fn prepare_static_gfortran_runtime(ctx: &Context) -> Result<()> {
    let cfg = &ctx.config;
    fs::create_dir_all(&cfg.build_dir).await?;
    let runtime = &cfg.macos.gfortran_runtime;
    let name = runtime.file_name().ok_or_else(|| Error::MissingPath {
        context: "gfortran runtime path has no filename",
        path: runtime.clone(),
    })?;
    fs::copy_file(runtime, &cfg.build_dir.join(name)).await
}

/// Build the mpkg installer with the framework Python. Runs after `clean`
/// through the prerequisite chain.
pub async fn bdist_mpkg(ctx: &Context) -> Result<()> {
    let cfg = &ctx.config;
    prepare_static_gfortran_runtime(ctx).await?;

    let build_dir = std::fs::canonicalize(&cfg.build_dir)?;
    let ldflags = format!(
        "-undefined dynamic_lookup -bundle -arch i386 -arch ppc \
         -Wl,-search_paths_first -L{}",
        build_dir.display()
    );

    let python = framework_python(ctx)?;
    Tool::new(python)
        .args(["setupegg.py", "bdist_mpkg"])
        .env("LDFLAGS", ldflags)
        .status()
        .await
}

/// Assemble the disk image: mpkg plus the PDF documentation, laid out by
/// the third-party `create-dmg` script. The mpkg and PDF builds have
/// already run through the prerequisite chain.
pub async fn dmg(ctx: &Context) -> Result<()> {
    let cfg = &ctx.config;
    let pyver = &ctx.opts.pyver;
    let (maj, min, _) = macos_version().await?;

    let installer_dir = cfg.macos_installer_dir();
    let image_name = dmg_name(cfg, pyver);
    fs::remove_file(&installer_dir.join(&image_name)).await?;

    // Clean the image source
    let content = installer_dir.join("content");
    fs::recreate_dir(&content).await?;

    // Copy mpkg into image source, under a name without the OS version
    let mpkg_source = cfg.dist_dir.join(mpkg_name(cfg, pyver, (maj, min)));
    let mpkg_target = format!("{}-{}-py{}.mpkg", cfg.project, cfg.version, pyver);
    fs::copy_dir(&mpkg_source, &content.join(&mpkg_target)).await?;

    // Copy docs into image source
    let docs = content.join("Documentation");
    fs::recreate_dir(&docs).await?;
    let pdf = cfg.pdf_dest();
    fs::copy_file(&pdf.join("userguide.pdf"), &docs.join("userguide.pdf")).await?;
    fs::copy_file(&pdf.join("reference.pdf"), &docs.join("reference.pdf")).await?;

    // Build the dmg
    Tool::new("./create-dmg")
        .args(["--window-size", "500", "500"])
        .arg("--background")
        .arg(&cfg.macos.dmg_background)
        .args(["--icon-size", "128"])
        .args(["--icon", mpkg_target.as_str(), "125", "320"])
        .args(["--icon", "Documentation", "375", "320"])
        .args(["--volname", cfg.project.as_str()])
        .arg(&image_name)
        .arg("./content")
        .current_dir(&installer_dir)
        .status()
        .await
}

/// Bare disk image over `dist/`, no layout, no background art.
pub async fn simple_dmg(ctx: &Context) -> Result<()> {
    let cfg = &ctx.config;
    let image_name = dmg_name(cfg, &ctx.opts.pyver);
    fs::remove_file(std::path::Path::new(&image_name)).await?;

    which::which("hdiutil").map_err(|_| Error::ToolNotFound("hdiutil".to_string()))?;
    Tool::new("hdiutil")
        .args(["create", image_name.as_str(), "-srcdir"])
        .arg(&cfg.dist_dir)
        .status()
        .await
}
