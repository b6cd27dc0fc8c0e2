//! `check`: build the tables and verify sidebar and navbar links.

use anyhow::{Result, bail};

use crate::collection::CollectionRegistry;
use crate::config::SiteConfig;
use crate::log;
use crate::utils::plural_count;

use super::build::{build_snapshot, print_warnings};

/// Run the `check` command. Link issues fail the command only when `strict`.
pub fn run_check(config: &SiteConfig, strict: bool) -> Result<()> {
    let (snapshot, warnings) = build_snapshot(config)?;
    print_warnings(&warnings);

    let registry = CollectionRegistry::new(config.collections.clone(), config.navbar.clone());
    let report = registry.validate_links(&snapshot);
    report.print();

    log!("check"; "{}, {}: {}",
        plural_count(snapshot.routes.len(), "route"),
        plural_count(registry.len(), "collection"),
        report);

    if strict && !report.is_clean() {
        bail!("{} in strict mode", plural_count(report.issue_count(), "link issue"));
    }
    Ok(())
}
