//! Release bookkeeping: checksum manifest, release notes, changelog and
//! the source distribution.

use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::runner::Context;
use crate::util::{fs, process::Tool};
use crate::{Error, Result};

/// Source tarball flavors produced by `sdist`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TarballKind {
    /// Gzipped tar archive
    Gztar,
    /// Zip archive
    Zip,
}

impl TarballKind {
    const ALL: [TarballKind; 2] = [TarballKind::Gztar, TarballKind::Zip];

    fn extension(self) -> &'static str {
        match self {
            TarballKind::Gztar => ".tar.gz",
            TarballKind::Zip => ".zip",
        }
    }
}

/// Name of the source tarball for one flavor.
pub fn tarball_name(project: &str, version: &str, kind: TarballKind) -> String {
    format!("{project}-{version}{}", kind.extension())
}

/// SHA-256 of a single file, hex encoded, read in 8KB chunks.
async fn sha256_file(path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];
    loop {
        let n = file.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Checksum manifest over every regular file directly inside `dir`, one
/// `<hash>  <filename>` line per file.
///
/// Entries are sorted by filename so the manifest is stable across
/// platforms and runs; directory enumeration order is not.
pub async fn compute_checksums(dir: &Path) -> Result<Vec<String>> {
    let mut names: Vec<String> = Vec::new();
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::MissingPath {
                context: "installers directory does not exist",
                path: dir.to_path_buf(),
            });
        }
        Err(e) => return Err(e.into()),
    };
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();

    let mut lines = Vec::with_capacity(names.len());
    for name in names {
        let hash = sha256_file(&dir.join(&name)).await?;
        lines.push(format!("{hash}  {name}"));
    }
    Ok(lines)
}

/// Copy the release notes over `target` and append the checksum manifest.
pub async fn write_release_to(ctx: &Context, target: &Path) -> Result<()> {
    let cfg = &ctx.config;
    fs::copy_file(&cfg.notes_source, target).await?;

    let mut out = tokio::fs::OpenOptions::new()
        .append(true)
        .open(target)
        .await?;
    out.write_all(b"\nChecksums\n=========\n\n").await?;
    for line in compute_checksums(&cfg.installers_dir()).await? {
        out.write_all(line.as_bytes()).await?;
        out.write_all(b"\n").await?;
    }
    out.flush().await?;
    Ok(())
}

/// Write the changelog for the configured revision range to `target`,
/// verbatim as the VCS reports it.
pub async fn write_log_to(ctx: &Context, target: &Path) -> Result<()> {
    let cfg = &ctx.config;
    let range = format!("{}..{}", cfg.log_start, cfg.log_end);
    let out = Tool::new("git").args(["log", range.as_str()]).stdout().await?;
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(target, out).await?;
    Ok(())
}

/// Write `NOTES.txt` with the checksum manifest into the working directory.
pub async fn write_release(ctx: &Context) -> Result<()> {
    write_release_to(ctx, Path::new("NOTES.txt")).await
}

/// Write `Changelog` into the working directory.
pub async fn write_log(ctx: &Context) -> Result<()> {
    write_log_to(ctx, Path::new("Changelog")).await
}

/// Write both notes and changelog into the release directory.
pub async fn write_note_changelog(ctx: &Context) -> Result<()> {
    let release_dir = &ctx.config.release_dir;
    fs::create_dir_all(release_dir).await?;
    write_release_to(ctx, &release_dir.join("NOTES.txt")).await?;
    write_log_to(ctx, &release_dir.join("Changelog")).await
}

/// Build the source distribution and stage the tarballs next to the
/// installers.
pub async fn sdist(ctx: &Context) -> Result<()> {
    let cfg = &ctx.config;
    Tool::new("python")
        .args(["setup.py", "sdist", "--formats=gztar,zip"])
        .status()
        .await?;

    let installers = cfg.installers_dir();
    fs::create_dir_all(&installers).await?;
    for kind in TarballKind::ALL {
        let name = tarball_name(&cfg.project, &cfg.version, kind);
        let source = cfg.dist_dir.join(&name);
        fs::copy_file(&source, &installers.join(&name)).await?;
    }
    Ok(())
}
