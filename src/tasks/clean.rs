//! Cleanup tasks.

use crate::runner::Context;
use crate::util::fs;
use crate::Result;

/// Remove build, dist and egg-info garbage, plus the doc build tree.
pub async fn clean(ctx: &Context) -> Result<()> {
    let cfg = &ctx.config;
    let egg_info = cfg.egg_info();
    for dir in [&cfg.build_dir, &cfg.dist_dir, &egg_info] {
        fs::remove_dir_all(dir).await?;
    }
    fs::remove_dir_all(&cfg.doc_build()).await?;
    Ok(())
}

/// Remove the virtualenv bootstrap directory.
pub async fn clean_bootstrap(ctx: &Context) -> Result<()> {
    fs::remove_dir_all(&ctx.config.bootstrap_dir).await
}

/// Remove everything else: superpack build dir and staged installers.
/// The ordinary cleanups run first through the prerequisite chain.
pub async fn nuke(ctx: &Context) -> Result<()> {
    let cfg = &ctx.config;
    fs::remove_dir_all(&cfg.superpack_build).await?;
    fs::remove_dir_all(&cfg.installers_dir()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::TaskOptions;
    use std::path::PathBuf;

    fn ctx_in(dir: &std::path::Path) -> Context {
        let cfg_path = dir.join("release.toml");
        std::fs::write(&cfg_path, "version = \"0.8.0\"").unwrap();
        let mut config = crate::config::Config::load(Some(&cfg_path)).unwrap();
        // point every path into the temp dir
        config.build_dir = dir.join("build");
        config.dist_dir = dir.join("dist");
        config.doc_root = dir.join("doc");
        config.release_dir = dir.join("release");
        config.bootstrap_dir = dir.join("bootstrap");
        config.superpack_build = dir.join("build-superpack");
        Context {
            config,
            opts: TaskOptions::default(),
        }
    }

    #[tokio::test]
    async fn clean_removes_build_state_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ctx_in(dir.path());
        std::fs::create_dir_all(ctx.config.build_dir.join("lib")).unwrap();
        std::fs::create_dir_all(ctx.config.doc_build().join("html")).unwrap();

        clean(&ctx).await.unwrap();
        assert!(!ctx.config.build_dir.exists());
        assert!(!ctx.config.doc_build().exists());

        // second run over the already-clean tree succeeds
        clean(&ctx).await.unwrap();
    }

    #[tokio::test]
    async fn nuke_removes_installers_and_superpack_build() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ctx_in(dir.path());
        std::fs::create_dir_all(ctx.config.superpack_bindir()).unwrap();
        std::fs::create_dir_all(ctx.config.installers_dir()).unwrap();

        nuke(&ctx).await.unwrap();
        assert!(!ctx.config.superpack_build.exists());
        assert!(!ctx.config.installers_dir().exists());
        assert!(PathBuf::from(dir.path()).exists());
    }
}
