//! Content watcher: rebuild the route tables and swap them in on change.
//!
//! ```text
//! notify → channel → debounce (300ms) → build_snapshot → RouteStore::rebuild
//! ```
//!
//! Edits to the config file reload its `[redirects]` table before the
//! rebuild. A failed rebuild keeps the previous snapshot serving.

use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossbeam::channel::{self, Receiver, select};
use notify::{EventKind, RecursiveMode, Watcher};

use crate::cli::build::{build_snapshot, print_warnings};
use crate::config::SiteConfig;
use crate::content::is_document;
use crate::core::{begin_rebuild, end_rebuild};
use crate::logger::WatchStatus;
use crate::route::{RouteStore, SwapOutcome};
use crate::utils::plural_count;
use crate::{debug, log};

/// Quiet period after the last event before rebuilding.
const DEBOUNCE_MS: u64 = 300;

/// Wake-up interval while nothing is pending.
const IDLE: Duration = Duration::from_secs(3600);

/// Check if path is a temp/backup file (editor artifacts)
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// Whether an event under `content` can change the route tables.
///
/// Directory events count: moving a folder moves every page under it.
fn is_relevant(event: &notify::Event, content: &Path) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    event.paths.iter().any(|path| {
        path.starts_with(content)
            && !is_temp_file(path)
            && (is_document(path) || path.extension().is_none())
    })
}

/// Whether an event touches the config file itself.
fn touches_config(event: &notify::Event, config_path: &Path) -> bool {
    !matches!(event.kind, EventKind::Access(_))
        && event.paths.iter().any(|path| path == config_path)
}

/// Directory to watch for config edits, unless the content watch covers it.
///
/// The directory is watched instead of the file: editors that save by
/// renaming would otherwise detach a file watch.
fn config_watch_dir(config: &SiteConfig) -> Option<&Path> {
    let dir = config.config_path.parent()?;
    (!dir.as_os_str().is_empty() && !dir.starts_with(&config.build.content)).then_some(dir)
}

/// Start watching the content directory.
///
/// The watcher is created before this returns, so changes made while the
/// caller is still binding are not lost.
pub fn spawn_watcher(
    config: Arc<SiteConfig>,
    store: Arc<RouteStore>,
    shutdown_rx: Receiver<()>,
) -> Result<JoinHandle<()>> {
    let (event_tx, event_rx) = channel::unbounded();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = event_tx.send(res);
    })
    .context("failed to create file watcher")?;
    watcher
        .watch(&config.build.content, RecursiveMode::Recursive)
        .with_context(|| format!("failed to watch {}", config.build.content.display()))?;

    if let Some(dir) = config_watch_dir(&config) {
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("failed to watch {}", dir.display()))?;
    }

    debug!("watch"; "{}", config.root_relative(&config.build.content).display());

    Ok(thread::spawn(move || {
        // keep the watcher alive for the lifetime of the loop
        let _watcher = watcher;
        let mut config = config;
        let mut deadline: Option<Instant> = None;
        let mut config_changed = false;

        loop {
            let timeout = deadline
                .map(|d| d.saturating_duration_since(Instant::now()))
                .unwrap_or(IDLE);

            select! {
                recv(shutdown_rx) -> _ => break,
                recv(event_rx) -> msg => match msg {
                    Ok(Ok(event)) => {
                        let touches = touches_config(&event, &config.config_path);
                        if touches || is_relevant(&event, &config.build.content) {
                            config_changed |= touches;
                            deadline = Some(Instant::now() + Duration::from_millis(DEBOUNCE_MS));
                        }
                    }
                    Ok(Err(e)) => log!("watch"; "notify error: {}", e),
                    Err(_) => break,
                },
                default(timeout) => {
                    if deadline.take().is_some() {
                        if std::mem::take(&mut config_changed) {
                            config = reload_redirects(&config);
                        }
                        on_change(&config, &store);
                    }
                }
            }
        }
        debug!("watch"; "stopped");
    }))
}

/// Pick up `[redirects]` edits. A broken config keeps the previous redirects.
fn reload_redirects(config: &Arc<SiteConfig>) -> Arc<SiteConfig> {
    match config.reload_redirects() {
        Ok(fresh) => {
            debug!("watch"; "reloaded redirects from {}", config.config_path.display());
            Arc::new(fresh)
        }
        Err(e) => {
            WatchStatus::error("config reload failed, previous redirects kept", &format!("{e:#}"));
            Arc::clone(config)
        }
    }
}

/// Rebuild after a debounced change and report the outcome.
fn on_change(config: &SiteConfig, store: &RouteStore) {
    if !begin_rebuild() {
        return;
    }
    let started = Instant::now();
    let result = rebuild_routes(config, store);
    end_rebuild();

    match result {
        Ok(SwapOutcome::Swapped) => {
            let snapshot = store.load();
            WatchStatus::success(&format!(
                "routes rebuilt ({}, {}) in {:.0?}",
                plural_count(snapshot.routes.len(), "route"),
                plural_count(snapshot.redirects.len(), "redirect"),
                started.elapsed()
            ));
        }
        Ok(SwapOutcome::Unchanged) => WatchStatus::unchanged("routes unchanged"),
        Err(e) => WatchStatus::error("rebuild failed, previous routes still serving", &format!("{e:#}")),
    }
}

fn rebuild_routes(config: &SiteConfig, store: &RouteStore) -> Result<SwapOutcome> {
    store.rebuild(|| {
        let (snapshot, warnings) = build_snapshot(config)?;
        print_warnings(&warnings);
        Ok(snapshot)
    })
}
