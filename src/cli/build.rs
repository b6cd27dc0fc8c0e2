//! `build`: scan content, build both tables, write `routes.json`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::config::SiteConfig;
use crate::content::scan_documents;
use crate::core::UrlPath;
use crate::embed::build::{REDIRECT_HTML, RedirectVars};
use crate::route::{BuildWarning, RouteError, RouteSnapshot, print_conflicts};
use crate::utils::{plural_count, plural_s};
use crate::{debug, debug_do, log};

/// Scan and build a fresh snapshot. Shared by every command.
///
/// Canonical conflicts are printed in full before the error is returned.
pub fn build_snapshot(config: &SiteConfig) -> Result<(RouteSnapshot, Vec<BuildWarning>)> {
    let documents = scan_documents(&config.build).with_context(|| {
        format!(
            "failed to scan {}",
            config.root_relative(&config.build.content).display()
        )
    })?;
    debug!("build"; "scanned {}", plural_count(documents.len(), "document"));

    let specs = config.redirect_specs();
    match RouteSnapshot::build(&documents, &specs, &config.build.not_found_url()) {
        Ok(built) => Ok(built),
        Err(RouteError::DuplicateCanonical(conflicts)) => {
            print_conflicts(&conflicts);
            bail!(
                "{} canonical path conflict{}, build aborted",
                conflicts.len(),
                plural_s(conflicts.len())
            )
        }
        Err(e) => Err(e.into()),
    }
}

/// Print build warnings through the standard log format.
pub fn print_warnings(warnings: &[BuildWarning]) {
    for warning in warnings {
        log!("warning"; "{}", warning);
    }
}

/// Run the `build` command.
pub fn run_build(config: &SiteConfig) -> Result<()> {
    let (snapshot, warnings) = build_snapshot(config)?;
    print_warnings(&warnings);

    debug_do! {
        for (old, new) in snapshot.redirects.iter() {
            log!("redirect"; "{} -> {}", old, new);
        }
    }

    let path = config.build.snapshot_path();
    snapshot
        .save(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    if config.build.stubs {
        let written = write_redirect_stubs(&snapshot, config)?;
        log!("build"; "{}", plural_count(written, "redirect stub"));
    }

    log!("build"; "{}, {} -> {}",
        plural_count(snapshot.routes.len(), "route"),
        plural_count(snapshot.redirects.len(), "redirect"),
        config.root_relative(&path).display());
    Ok(())
}

/// Write one HTML redirect stub per redirect into the output directory.
fn write_redirect_stubs(snapshot: &RouteSnapshot, config: &SiteConfig) -> Result<usize> {
    let output = &config.build.output;
    let mut written = 0;

    for (old, new) in snapshot.redirects.iter() {
        let file = stub_output_path(old, output);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let target = new.with_base(&config.site.base);
        let html = REDIRECT_HTML.render(&RedirectVars {
            target_url: &target,
            lang: &config.site.lang,
        });
        fs::write(&file, html).with_context(|| format!("failed to write {}", file.display()))?;
        written += 1;
    }

    Ok(written)
}

/// `/old/` -> `{output}/old/index.html`, `/old.html` -> `{output}/old.html`
fn stub_output_path(old: &UrlPath, output: &Path) -> PathBuf {
    let relative = old.as_str().trim_start_matches('/');
    if old.is_dir() {
        output.join(relative).join("index.html")
    } else {
        output.join(relative)
    }
}
