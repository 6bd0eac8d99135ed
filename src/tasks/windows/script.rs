//! Superinstaller NSIS script rendering.
//!
//! The template carries placeholder tokens for the installer filename and
//! the three arch-specific binaries. Rendering is literal substring
//! replacement, with no escaping or validation of the substituted values;
//! for fixed inputs it is deterministic and a second pass over rendered
//! output is a no-op because the tokens are gone.

use std::path::PathBuf;

use crate::runner::Context;
use crate::tasks::windows::{internal_name, superpack_name, Arch};
use crate::util::fs;
use crate::{Error, Result};

/// Token replaced by the superpack installer filename.
pub const INSTALLER_TOKEN: &str = "@INSTALLER_NAME@";

/// Replace every placeholder token in `template`.
pub fn render_script(
    template: &str,
    installer_name: &str,
    binary_name: impl Fn(Arch) -> String,
) -> String {
    let mut content = template.replace(INSTALLER_TOKEN, installer_name);
    for arch in Arch::ALL {
        content = content.replace(arch.token(), &binary_name(arch));
    }
    content
}

/// Render the superinstaller script into the superpack build directory
/// and return its path.
pub async fn render(ctx: &Context) -> Result<PathBuf> {
    let cfg = &ctx.config;
    fs::create_dir_all(&cfg.superpack_build).await?;

    let template_path = cfg.nsis_template();
    let template = match tokio::fs::read_to_string(&template_path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::MissingPath {
                context: "NSIS template does not exist",
                path: template_path,
            });
        }
        Err(e) => return Err(e.into()),
    };

    let rendered = render_script(
        &template,
        &superpack_name(cfg, &ctx.opts.pyver),
        |arch| internal_name(cfg, arch),
    );

    let target = cfg
        .superpack_build
        .join(format!("{}-superinstaller.nsi", cfg.project));
    tokio::fs::write(&target, rendered).await?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "\
Name @INSTALLER_NAME@
OutFile \"@INSTALLER_NAME@\"
File \"binaries\\@NOSSE_BINARY@\"
File \"binaries\\@SSE2_BINARY@\"
File \"binaries\\@SSE3_BINARY@\"
";

    fn binary(arch: Arch) -> String {
        format!("scipy-0.8.0-{}.exe", arch.tag())
    }

    #[test]
    fn substitution_is_total() {
        let out = render_script(TEMPLATE, "scipy-superpack.exe", binary);
        assert!(!out.contains('@'));
        assert!(out.contains("File \"binaries\\scipy-0.8.0-sse2.exe\""));
        assert!(out.contains("OutFile \"scipy-superpack.exe\""));
    }

    #[test]
    fn rendering_is_deterministic_and_idempotent() {
        let once = render_script(TEMPLATE, "scipy-superpack.exe", binary);
        let again = render_script(TEMPLATE, "scipy-superpack.exe", binary);
        assert_eq!(once, again);
        // a second pass over rendered output changes nothing
        let twice = render_script(&once, "scipy-superpack.exe", binary);
        assert_eq!(once, twice);
    }

    #[test]
    fn values_are_substituted_literally() {
        // no escaping: a value containing a token corrupts the output,
        // exactly as the literal-replacement contract says
        let out = render_script("x @NOSSE_BINARY@ y", "unused", |_| "@SSE2_BINARY@".into());
        assert_eq!(out, "x @SSE2_BINARY@ y");
    }
}
