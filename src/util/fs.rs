//! Filesystem helpers for release staging.
//!
//! Removals are idempotent (a missing path is not an error) because the
//! clean tasks run against whatever state the previous run left behind.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{Error, Result};

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Removes the file if it exists.
pub async fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Creates all of the directories of the specified path.
pub async fn create_dir_all(path: &Path) -> Result<()> {
    Ok(fs::create_dir_all(path).await?)
}

/// Recreates the directory from empty: removes it if present, then
/// creates it and any missing parents.
pub async fn recreate_dir(path: &Path) -> Result<()> {
    remove_dir_all(path).await?;
    create_dir_all(path).await
}

/// Copies a regular file, creating any parent directories of the
/// destination as necessary. Overwrites an existing destination.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.is_file() {
        return Err(Error::MissingPath {
            context: "file to copy does not exist",
            path: from.to_path_buf(),
        });
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir).await?;
    }
    fs::copy(from, to).await?;
    Ok(())
}

/// Recursively copies a directory tree, creating any parent directories of
/// the destination as necessary. Symlinks are preserved.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.is_dir() {
        return Err(Error::MissingPath {
            context: "directory to copy does not exist",
            path: from.to_path_buf(),
        });
    }

    let from: PathBuf = from.to_path_buf();
    let to: PathBuf = to.to_path_buf();

    // Blocking walk, offloaded off the runtime threads
    tokio::task::spawn_blocking(move || -> Result<()> {
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent)?;
        }
        for entry in walkdir::WalkDir::new(&from) {
            let entry = entry.map_err(|e| {
                Error::Io(e.into_io_error().unwrap_or_else(|| {
                    io::Error::new(io::ErrorKind::Other, "walkdir loop")
                }))
            })?;
            let rel_path = entry
                .path()
                .strip_prefix(&from)
                .map_err(|e| Error::Anyhow(anyhow::anyhow!(e)))?;
            let dest_path = to.join(rel_path);

            if entry.file_type().is_symlink() {
                let target = std::fs::read_link(entry.path())?;
                symlink(&target, &dest_path)?;
            } else if entry.file_type().is_dir() {
                std::fs::create_dir_all(dest_path)?;
            } else {
                std::fs::copy(entry.path(), dest_path)?;
            }
        }
        Ok(())
    })
    .await
    .map_err(|e| Error::Anyhow(anyhow::anyhow!("directory copy task panicked: {e}")))?
}

#[cfg(unix)]
fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    if src.is_dir() {
        std::os::windows::fs::symlink_dir(src, dst)
    } else {
        std::os::windows::fs::symlink_file(src, dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn remove_dir_all_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("gone");
        remove_dir_all(&target).await.unwrap();
        fs::create_dir(&target).await.unwrap();
        remove_dir_all(&target).await.unwrap();
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn recreate_dir_empties_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("dest");
        fs::create_dir(&target).await.unwrap();
        fs::write(target.join("stale.exe"), b"old").await.unwrap();
        recreate_dir(&target).await.unwrap();
        assert!(target.exists());
        assert!(!target.join("stale.exe").exists());
    }

    #[tokio::test]
    async fn copy_file_overwrites_and_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("notes.rst");
        fs::write(&src, b"notes").await.unwrap();
        let dst = dir.path().join("release/NOTES.txt");
        fs::create_dir_all(dst.parent().unwrap()).await.unwrap();
        fs::write(&dst, b"stale").await.unwrap();
        copy_file(&src, &dst).await.unwrap();
        assert_eq!(fs::read(&dst).await.unwrap(), b"notes");
    }

    #[tokio::test]
    async fn copy_missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_file(&dir.path().join("nope"), &dir.path().join("out"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingPath { .. }));
    }

    #[tokio::test]
    async fn copy_dir_copies_the_tree() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("html");
        fs::create_dir_all(src.join("static")).await.unwrap();
        fs::write(src.join("index.html"), b"<html>").await.unwrap();
        fs::write(src.join("static/style.css"), b"body{}").await.unwrap();
        let dst = dir.path().join("build/html");
        copy_dir(&src, &dst).await.unwrap();
        assert_eq!(fs::read(dst.join("index.html")).await.unwrap(), b"<html>");
        assert_eq!(
            fs::read(dst.join("static/style.css")).await.unwrap(),
            b"body{}"
        );
    }
}
