//! `resolve`: show how request paths resolve against the route tables.

use anyhow::{Context, Result};
use owo_colors::Style;
use serde::Serialize;

use crate::collection::CollectionRegistry;
use crate::config::SiteConfig;
use crate::route::{Resolution, RouteSnapshot};
use crate::debug;
use crate::logger::paint;

use super::build::{build_snapshot, print_warnings};

/// One resolved path, as printed with `--json`.
#[derive(Debug, Serialize)]
struct ResolveOutput<'a> {
    request: &'a str,
    #[serde(flatten)]
    resolution: Resolution<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    collection: Option<&'a str>,
}

/// Run the `resolve` command.
pub fn run_resolve(config: &SiteConfig, paths: &[String], fresh: bool, json: bool) -> Result<()> {
    let snapshot = load_snapshot(config, fresh)?;
    let registry = CollectionRegistry::new(config.collections.clone(), config.navbar.clone());

    for raw in paths {
        let resolution = snapshot.resolve(raw);
        let collection = registry
            .collection_for(resolution.path())
            .map(|c| c.title.as_str());

        if json {
            let output = ResolveOutput {
                request: raw,
                resolution,
                collection,
            };
            println!("{}", serde_json::to_string(&output)?);
        } else {
            println!("{}", describe(raw, &resolution, collection));
        }
    }
    Ok(())
}

/// Read `routes.json`, or rebuild from content when `fresh` or nothing was built yet.
fn load_snapshot(config: &SiteConfig, fresh: bool) -> Result<RouteSnapshot> {
    let path = config.build.snapshot_path();
    if !fresh && path.exists() {
        debug!("resolve"; "reading {}", config.root_relative(&path).display());
        return RouteSnapshot::load(&path, &config.build.not_found_url())
            .with_context(|| format!("failed to load {}", path.display()));
    }

    debug!("resolve"; "building tables from content");
    let (snapshot, warnings) = build_snapshot(config)?;
    print_warnings(&warnings);
    Ok(snapshot)
}

fn describe(raw: &str, resolution: &Resolution<'_>, collection: Option<&str>) -> String {
    let outcome = match resolution {
        Resolution::Redirect { to, .. } => {
            format!("{} {}", paint("301 →", Style::new().yellow()), to)
        }
        Resolution::Page { path, entry } => {
            let loader = paint(&entry.loader_ref, Style::new().dimmed());
            format!("{} {} {}", paint("200", Style::new().green()), path, loader)
        }
        Resolution::NotFound { path, not_found, .. } => {
            let note = paint(format!("(serving {not_found})"), Style::new().dimmed());
            format!("{} {} {}", paint("404", Style::new().red()), path, note)
        }
    };
    match collection {
        Some(title) => {
            let title = paint(format!("[{title}]"), Style::new().cyan());
            format!("{raw}  {outcome} {title}")
        }
        None => format!("{raw}  {outcome}"),
    }
}
