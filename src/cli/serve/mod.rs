//! Route service: answer lookups over HTTP from an atomically swapped snapshot.
//!
//! Every request resolves against one snapshot from [`RouteStore::load`],
//! so a rebuild landing mid-request never mixes old and new tables.

mod lifecycle;
mod response;
mod watch;

use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam::channel;
use tiny_http::{Request, Server};

use super::build::{build_snapshot, print_warnings};
use crate::config::cfg;
use crate::core::{UrlPath, is_rebuilding, is_shutdown, register_server};
use crate::route::RouteStore;
use crate::utils::plural_count;
use crate::{debug, log};

/// Path (under the site base) serving the whole current snapshot.
pub const SNAPSHOT_ENDPOINT: &str = "/routes.json";

/// Run the `serve` command (blocking until Ctrl+C).
pub fn run_serve() -> Result<()> {
    let config = cfg();
    let (snapshot, warnings) = build_snapshot(&config)?;
    print_warnings(&warnings);
    log!("serve"; "{}, {}",
        plural_count(snapshot.routes.len(), "route"),
        plural_count(snapshot.redirects.len(), "redirect"));
    let store = Arc::new(RouteStore::new(snapshot));

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    let watcher = if config.serve.watch {
        Some(watch::spawn_watcher(Arc::clone(&config), Arc::clone(&store), shutdown_rx)?)
    } else {
        None
    };

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    register_server(Arc::clone(&server), shutdown_tx);

    log!("serve"; "http://{}{}", addr, config.site.base);
    run_request_loop(&server, &store, &config.site.base)?;
    lifecycle::wait_for_shutdown(watcher);
    Ok(())
}

fn run_request_loop(server: &Server, store: &Arc<RouteStore>, base: &str) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .context("failed to create request thread pool")?;

    for request in server.incoming_requests() {
        let store = Arc::clone(store);
        let base = base.to_string();
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &store, &base) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, store: &RouteStore, base: &str) -> Result<()> {
    if is_shutdown() {
        return response::respond_unavailable(request);
    }
    if !response::is_readable_request(&request) {
        return response::respond_method_not_allowed(request);
    }

    let snapshot = store.load();
    if is_snapshot_request(request.url(), base) {
        return response::respond_snapshot(request, &snapshot);
    }

    let resolution = snapshot.resolve_under(request.url(), base);
    debug!("serve"; "{} -> {}{}",
        request.url(),
        resolution.path(),
        if is_rebuilding() { " (rebuild pending)" } else { "" });
    response::respond_resolution(request, &resolution, base)
}

fn is_snapshot_request(url: &str, base: &str) -> bool {
    UrlPath::from_browser(url)
        .strip_base(base)
        .is_some_and(|path| path.as_str() == SNAPSHOT_ENDPOINT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{BUILTIN_NOT_FOUND_SOURCE, Document};
    use crate::route::{RedirectSpec, RouteSnapshot};
    use std::io::{Read, Write};
    use std::net::TcpStream;
    use std::thread;

    fn store() -> Arc<RouteStore> {
        let not_found = UrlPath::from_page("/404.html");
        let docs = vec![
            Document::new("blog/README.md", UrlPath::from_page("/blog/"), "博客"),
            Document::new(BUILTIN_NOT_FOUND_SOURCE, not_found.clone(), ""),
        ];
        let specs = vec![RedirectSpec::from_config("/old/path.html", "/blog/")];
        let (snapshot, _) = RouteSnapshot::build(&docs, &specs, &not_found).unwrap();
        Arc::new(RouteStore::new(snapshot))
    }

    /// Serve exactly one request and return the raw response.
    fn roundtrip(store: &Arc<RouteStore>, request_line: &str) -> String {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let store = Arc::clone(store);
        let handle = thread::spawn(move || {
            let request = server.recv().unwrap();
            handle_request(request, &store, "/notes/").unwrap();
        });

        let mut stream = TcpStream::connect(addr).unwrap();
        write!(stream, "{request_line} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n").unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).unwrap();
        handle.join().unwrap();
        raw
    }

    #[test]
    fn test_redirect_response() {
        let raw = roundtrip(&store(), "GET /notes/old/path.html?from=feed");
        assert!(raw.starts_with("HTTP/1.1 301"), "{raw}");
        assert!(raw.contains("Location: /notes/blog/"), "{raw}");
        assert!(raw.contains(r#""kind":"redirect""#));
    }

    #[test]
    fn test_page_and_not_found_responses() {
        let store = store();
        let raw = roundtrip(&store, "GET /notes/blog/");
        assert!(raw.starts_with("HTTP/1.1 200"), "{raw}");
        assert!(raw.contains("pages/blog/index.html.js"));

        let raw = roundtrip(&store, "GET /notes/missing/");
        assert!(raw.starts_with("HTTP/1.1 404"), "{raw}");
        assert!(raw.contains(r#""notFound":"/404.html""#));

        let raw = roundtrip(&store, "POST /notes/blog/");
        assert!(raw.starts_with("HTTP/1.1 405"), "{raw}");
    }

    #[test]
    fn test_is_snapshot_request() {
        assert!(is_snapshot_request("/routes.json", "/"));
        assert!(is_snapshot_request("/notes/routes.json?t=1", "/notes/"));
        assert!(!is_snapshot_request("/routes.json", "/notes/"));
        assert!(!is_snapshot_request("/notes/blog/", "/notes/"));
    }
}
