//! Process-wide release configuration.
//!
//! Loaded once at startup from an optional TOML file and never mutated
//! afterwards. Every field has a default mirroring the historical release
//! layout of the project tree (`build/`, `dist/`, `release/installers/`,
//! `doc/`), so an empty config file is a valid one — only the
//! machine-specific interpreter locations genuinely need configuring.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Config file looked for in the working directory when `--config` is not
/// given.
pub const DEFAULT_CONFIG_FILE: &str = "release.toml";

/// BLAS/LAPACK locations for one CPU architecture variant, as Wine paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteCfg {
    /// BLAS library directory
    pub blas: String,
    /// LAPACK library directory
    pub lapack: String,
}

impl SiteCfg {
    fn same(dir: &str) -> Self {
        Self {
            blas: dir.to_string(),
            lapack: dir.to_string(),
        }
    }
}

/// Per-architecture site table.
///
/// One entry per supported variant, as struct fields rather than a map: the
/// mapping is total over the architecture set by construction, and no other
/// architecture tags can be configured.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteTable {
    /// Plain x87 build, no SIMD
    pub nosse: SiteCfg,
    /// SSE2-optimized build
    pub sse2: SiteCfg,
    /// SSE3-optimized build
    pub sse3: SiteCfg,
}

impl Default for SiteTable {
    fn default() -> Self {
        Self {
            nosse: SiteCfg::same(r"C:\local\lib\yop\nosse"),
            sse2: SiteCfg::same(r"C:\local\lib\yop\sse2"),
            sse3: SiteCfg::same(r"C:\local\lib\yop\sse3"),
        }
    }
}

/// Windows (Wine) build configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowsConfig {
    /// BLAS/LAPACK locations per architecture variant
    pub site: SiteTable,
    /// Wine Python command per Python minor version, e.g.
    /// `"2.6" = ["/home/user/.wine/drive_c/Python26/python.exe"]`.
    /// On hosts where Wine itself must be named, the command is the wine
    /// binary followed by the Windows-side interpreter path.
    pub python: BTreeMap<String, Vec<String>>,
    /// NSIS superinstaller template; defaults to
    /// `tools/win32build/nsis_scripts/<project>-superinstaller.nsi.in`
    pub nsis_template: Option<PathBuf>,
}

/// macOS packaging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MacosConfig {
    /// Framework Python per Python minor version
    pub python: BTreeMap<String, PathBuf>,
    /// Directory holding the dmg art and the `create-dmg` script;
    /// defaults to `<project>-macosx-installer`
    pub installer_dir: Option<PathBuf>,
    /// Full path to the static gfortran runtime staged into the build tree
    pub gfortran_runtime: PathBuf,
    /// Background image passed to `create-dmg`, relative to `installer_dir`
    pub dmg_background: PathBuf,
}

impl Default for MacosConfig {
    fn default() -> Self {
        let python = ["2.5", "2.6"]
            .into_iter()
            .map(|v| {
                let path = format!(
                    "/Library/Frameworks/Python.framework/Versions/{v}/bin/python"
                );
                (v.to_string(), PathBuf::from(path))
            })
            .collect();
        Self {
            python,
            installer_dir: None,
            gfortran_runtime: PathBuf::from("/usr/local/lib/libgfortran.a"),
            dmg_background: PathBuf::from("art/dmgbackground.png"),
        }
    }
}

/// On-disk shape of the config file. All fields optional; resolved into
/// [`Config`] by [`Config::load`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    project: Option<String>,
    version: Option<String>,
    version_file: Option<PathBuf>,
    build_dir: Option<PathBuf>,
    dist_dir: Option<PathBuf>,
    release_dir: Option<PathBuf>,
    doc_root: Option<PathBuf>,
    bootstrap_dir: Option<PathBuf>,
    superpack_build: Option<PathBuf>,
    notes_source: Option<PathBuf>,
    log_start: Option<String>,
    log_end: Option<String>,
    doc_requirements: Option<Vec<String>>,
    windows: WindowsConfig,
    macos: MacosConfig,
}

/// Resolved release configuration, immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct Config {
    /// Package name embedded in every artifact filename
    pub project: String,
    /// Full release version string
    pub version: String,
    /// Scratch build tree
    pub build_dir: PathBuf,
    /// Where the packaging toolchain drops its artifacts
    pub dist_dir: PathBuf,
    /// Root of the release staging area
    pub release_dir: PathBuf,
    /// Documentation source root
    pub doc_root: PathBuf,
    /// Virtualenv bootstrap directory
    pub bootstrap_dir: PathBuf,
    /// Superpack assembly directory
    pub superpack_build: PathBuf,
    /// Release notes source file
    pub notes_source: PathBuf,
    /// Changelog range start revision
    pub log_start: String,
    /// Changelog range end revision
    pub log_end: String,
    /// Packages installed into the bootstrap environment
    pub doc_requirements: Vec<String>,
    /// Windows (Wine) build configuration
    pub windows: WindowsConfig,
    /// macOS packaging configuration
    pub macos: MacosConfig,
}

impl Config {
    /// Load the configuration.
    ///
    /// An explicitly given path must exist and parse; with no path, a
    /// `release.toml` in the working directory is used if present, and
    /// built-in defaults otherwise. The release version is resolved here,
    /// once, and is immutable afterwards.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let file = match path {
            Some(p) => {
                let text = std::fs::read_to_string(p)?;
                toml::from_str(&text)?
            }
            None => match std::fs::read_to_string(DEFAULT_CONFIG_FILE) {
                Ok(text) => toml::from_str(&text)?,
                Err(e) if e.kind() == io::ErrorKind::NotFound => ConfigFile::default(),
                Err(e) => return Err(e.into()),
            },
        };
        file.resolve()
    }

    /// Final installer drop directory, `<release_dir>/installers`.
    pub fn installers_dir(&self) -> PathBuf {
        self.release_dir.join("installers")
    }

    /// Staging directory for the per-arch wininst binaries.
    pub fn superpack_bindir(&self) -> PathBuf {
        self.superpack_build.join("binaries")
    }

    /// Documentation build output root, `<doc_root>/build`.
    pub fn doc_build(&self) -> PathBuf {
        self.doc_root.join("build")
    }

    /// Where built HTML docs are relocated for release pickup.
    pub fn html_dest(&self) -> PathBuf {
        self.build_dir.join("html")
    }

    /// Where built PDF docs are relocated for release pickup.
    pub fn pdf_dest(&self) -> PathBuf {
        self.build_dir.join("pdf")
    }

    /// NSIS superinstaller template path.
    pub fn nsis_template(&self) -> PathBuf {
        self.windows.nsis_template.clone().unwrap_or_else(|| {
            PathBuf::from("tools/win32build/nsis_scripts")
                .join(format!("{}-superinstaller.nsi.in", self.project))
        })
    }

    /// Directory holding the dmg assembly assets.
    pub fn macos_installer_dir(&self) -> PathBuf {
        self.macos
            .installer_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}-macosx-installer", self.project)))
    }

    /// The egg-info directory removed by `clean`.
    pub fn egg_info(&self) -> PathBuf {
        PathBuf::from(format!("{}.egg-info", self.project))
    }
}

impl ConfigFile {
    fn resolve(self) -> Result<Config> {
        let version = match self.version {
            Some(v) => v,
            None => {
                let file = self
                    .version_file
                    .unwrap_or_else(|| PathBuf::from("version.txt"));
                match std::fs::read_to_string(&file) {
                    Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
                    Ok(_) => return Err(Error::MissingVersion),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {
                        return Err(Error::MissingVersion);
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };

        let doc_root = self.doc_root.unwrap_or_else(|| PathBuf::from("doc"));
        let notes_source = self.notes_source.unwrap_or_else(|| {
            doc_root
                .join("release")
                .join(format!("{version}-notes.rst"))
        });

        Ok(Config {
            project: self.project.unwrap_or_else(|| "scipy".to_string()),
            version,
            build_dir: self.build_dir.unwrap_or_else(|| PathBuf::from("build")),
            dist_dir: self.dist_dir.unwrap_or_else(|| PathBuf::from("dist")),
            release_dir: self.release_dir.unwrap_or_else(|| PathBuf::from("release")),
            doc_root,
            bootstrap_dir: self
                .bootstrap_dir
                .unwrap_or_else(|| PathBuf::from("bootstrap")),
            superpack_build: self
                .superpack_build
                .unwrap_or_else(|| PathBuf::from("build-superpack")),
            notes_source,
            log_start: self.log_start.unwrap_or_else(|| "svn/tags/0.7.0".to_string()),
            log_end: self.log_end.unwrap_or_else(|| "master".to_string()),
            doc_requirements: self
                .doc_requirements
                .unwrap_or_else(|| vec!["sphinx==0.6.1".to_string()]),
            windows: self.windows,
            macos: self.macos,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(text: &str) -> Config {
        let file: ConfigFile = toml::from_str(text).unwrap();
        file.resolve().unwrap()
    }

    #[test]
    fn defaults_resolve_with_explicit_version() {
        let cfg = from_toml("version = \"0.8.0\"");
        assert_eq!(cfg.project, "scipy");
        assert_eq!(cfg.version, "0.8.0");
        assert_eq!(cfg.installers_dir(), PathBuf::from("release/installers"));
        assert_eq!(
            cfg.superpack_bindir(),
            PathBuf::from("build-superpack/binaries")
        );
        assert_eq!(
            cfg.notes_source,
            PathBuf::from("doc/release/0.8.0-notes.rst")
        );
        assert_eq!(
            cfg.nsis_template(),
            PathBuf::from("tools/win32build/nsis_scripts/scipy-superinstaller.nsi.in")
        );
        assert_eq!(
            cfg.macos_installer_dir(),
            PathBuf::from("scipy-macosx-installer")
        );
    }

    #[test]
    fn missing_version_is_an_error() {
        let file: ConfigFile = toml::from_str("project = \"yop\"").unwrap();
        // no version key and no version.txt in a fresh temp dir
        let dir = tempfile::tempdir().unwrap();
        let file = ConfigFile {
            version_file: Some(dir.path().join("version.txt")),
            ..file
        };
        assert!(matches!(file.resolve(), Err(Error::MissingVersion)));
    }

    #[test]
    fn version_file_is_read_and_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let vfile = dir.path().join("version.txt");
        std::fs::write(&vfile, "0.8.0.dev6120\n").unwrap();
        let file = ConfigFile {
            version_file: Some(vfile),
            ..ConfigFile::default()
        };
        let cfg = file.resolve().unwrap();
        assert_eq!(cfg.version, "0.8.0.dev6120");
    }

    #[test]
    fn site_table_is_total_with_defaults() {
        let cfg = from_toml("version = \"0.8.0\"");
        assert_eq!(cfg.windows.site.nosse.blas, r"C:\local\lib\yop\nosse");
        assert_eq!(cfg.windows.site.sse2.lapack, r"C:\local\lib\yop\sse2");
        assert_eq!(cfg.windows.site.sse3.blas, r"C:\local\lib\yop\sse3");
    }

    #[test]
    fn overrides_take_effect() {
        let cfg = from_toml(
            r#"
            project = "yop"
            version = "1.2.3"
            release_dir = "rel"
            log_start = "v1.2.2"

            [windows.python]
            "2.6" = ["wine", "C:\\Python26\\python.exe"]

            [windows.site.sse2]
            blas = 'C:\opt\blas\sse2'
            lapack = 'C:\opt\lapack\sse2'
            "#,
        );
        assert_eq!(cfg.installers_dir(), PathBuf::from("rel/installers"));
        assert_eq!(cfg.log_start, "v1.2.2");
        assert_eq!(
            cfg.windows.python["2.6"],
            vec!["wine".to_string(), "C:\\Python26\\python.exe".to_string()]
        );
        assert_eq!(cfg.windows.site.sse2.blas, r"C:\opt\blas\sse2");
        // untouched entries keep their defaults
        assert_eq!(cfg.windows.site.nosse.blas, r"C:\local\lib\yop\nosse");
        assert_eq!(
            cfg.notes_source,
            PathBuf::from("doc/release/1.2.3-notes.rst")
        );
    }
}
