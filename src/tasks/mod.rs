//! Task definitions and the registry wiring names to bodies.
//!
//! Prerequisite chains mirror how the artifacts actually depend on each
//! other: the superpack needs all three arch builds staged, the dmg needs
//! the mpkg and the PDF docs, the destructive `nuke` runs the ordinary
//! cleanups first.

pub mod bootstrap;
pub mod clean;
pub mod docs;
pub mod macos;
pub mod release;
pub mod windows;

use crate::runner::{Runner, TaskDef};

/// Build the full task registry.
pub fn registry() -> Runner {
    Runner::new(vec![
        TaskDef {
            name: "bootstrap",
            about: "create the doc-build virtualenv in ./bootstrap",
            needs: &[],
            run: |ctx| Box::pin(async move { bootstrap::bootstrap(&ctx).await }),
        },
        TaskDef {
            name: "clean",
            about: "remove build, dist and egg-info garbage",
            needs: &[],
            run: |ctx| Box::pin(async move { clean::clean(&ctx).await }),
        },
        TaskDef {
            name: "clean_bootstrap",
            about: "remove the bootstrap virtualenv",
            needs: &[],
            run: |ctx| Box::pin(async move { clean::clean_bootstrap(&ctx).await }),
        },
        TaskDef {
            name: "nuke",
            about: "remove everything: build dirs, installers, bootstrap",
            needs: &["clean", "clean_bootstrap"],
            run: |ctx| Box::pin(async move { clean::nuke(&ctx).await }),
        },
        TaskDef {
            name: "html",
            about: "build the HTML documentation into build/html",
            needs: &[],
            run: |ctx| Box::pin(async move { docs::html(&ctx).await }),
        },
        TaskDef {
            name: "latex",
            about: "build the documentation in LaTeX format",
            needs: &[],
            run: |ctx| Box::pin(async move { docs::latex(&ctx).await }),
        },
        TaskDef {
            name: "pdf",
            about: "compile the LaTeX docs and stage the PDFs into build/pdf",
            needs: &["latex"],
            run: |ctx| Box::pin(async move { docs::pdf(&ctx).await }),
        },
        TaskDef {
            name: "sdist",
            about: "build the source tarballs and stage them with the installers",
            needs: &[],
            run: |ctx| Box::pin(async move { release::sdist(&ctx).await }),
        },
        TaskDef {
            name: "write_release",
            about: "write NOTES.txt with the checksum manifest",
            needs: &[],
            run: |ctx| Box::pin(async move { release::write_release(&ctx).await }),
        },
        TaskDef {
            name: "write_log",
            about: "write the Changelog from the VCS history",
            needs: &[],
            run: |ctx| Box::pin(async move { release::write_log(&ctx).await }),
        },
        TaskDef {
            name: "write_note_changelog",
            about: "write NOTES.txt and Changelog into the release dir",
            needs: &[],
            run: |ctx| Box::pin(async move { release::write_note_changelog(&ctx).await }),
        },
        TaskDef {
            name: "bdist_wininst_nosse",
            about: "build the nosse wininst installer",
            needs: &[],
            run: |ctx| Box::pin(async move { windows::bdist_wininst_nosse(&ctx).await }),
        },
        TaskDef {
            name: "bdist_wininst_sse2",
            about: "build the sse2 wininst installer",
            needs: &[],
            run: |ctx| Box::pin(async move { windows::bdist_wininst_sse2(&ctx).await }),
        },
        TaskDef {
            name: "bdist_wininst_sse3",
            about: "build the sse3 wininst installer",
            needs: &[],
            run: |ctx| Box::pin(async move { windows::bdist_wininst_sse3(&ctx).await }),
        },
        TaskDef {
            name: "bdist_superpack",
            about: "pack the three arch installers into the superpack",
            needs: &[
                "bdist_wininst_nosse",
                "bdist_wininst_sse2",
                "bdist_wininst_sse3",
            ],
            run: |ctx| Box::pin(async move { windows::bdist_superpack(&ctx).await }),
        },
        TaskDef {
            name: "bdist_wininst_simple",
            about: "simple wininst-based installer, no site overrides",
            needs: &["clean"],
            run: |ctx| Box::pin(async move { windows::bdist_wininst_simple(&ctx).await }),
        },
        TaskDef {
            name: "bdist_mpkg",
            about: "build the macOS mpkg installer",
            needs: &["clean"],
            run: |ctx| Box::pin(async move { macos::bdist_mpkg(&ctx).await }),
        },
        TaskDef {
            name: "dmg",
            about: "assemble the macOS disk image with docs",
            needs: &["bdist_mpkg", "pdf"],
            run: |ctx| Box::pin(async move { macos::dmg(&ctx).await }),
        },
        TaskDef {
            name: "simple_dmg",
            about: "bare disk image over dist/",
            needs: &[],
            run: |ctx| Box::pin(async move { macos::simple_dmg(&ctx).await }),
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superpack_needs_all_three_variants_in_order() {
        let runner = registry();
        let order = runner.resolve(&["bdist_superpack"]).unwrap();
        let names: Vec<_> = order.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                "bdist_wininst_nosse",
                "bdist_wininst_sse2",
                "bdist_wininst_sse3",
                "bdist_superpack",
            ]
        );
    }

    #[test]
    fn dmg_pulls_in_mpkg_and_pdf_chains() {
        let runner = registry();
        let order = runner.resolve(&["dmg"]).unwrap();
        let names: Vec<_> = order.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["clean", "bdist_mpkg", "latex", "pdf", "dmg"]);
    }

    #[test]
    fn shared_clean_prerequisite_runs_once() {
        let runner = registry();
        let order = runner
            .resolve(&["bdist_wininst_simple", "bdist_mpkg"])
            .unwrap();
        let names: Vec<_> = order.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec!["clean", "bdist_wininst_simple", "bdist_mpkg"]
        );
    }

    #[test]
    fn every_declared_prerequisite_is_registered() {
        let runner = registry();
        for task in runner.tasks() {
            for dep in task.needs {
                assert!(
                    runner.get(dep).is_some(),
                    "task {} needs unregistered {}",
                    task.name,
                    dep
                );
            }
        }
    }
}
