//! Request-time resolution.
//!
//! Redirects are consulted before routes. Lookup is total: anything that is
//! neither a redirect source nor a route resolves to the not-found entry.

use serde::Serialize;

use super::redirect::RedirectTable;
use super::table::{RouteEntry, RouteTable};
use crate::core::UrlPath;

/// Outcome of resolving one request path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Resolution<'a> {
    /// Answer with a single redirect hop to the final target.
    Redirect { from: UrlPath, to: &'a UrlPath },
    /// Serve a page.
    Page { path: UrlPath, entry: &'a RouteEntry },
    /// Serve the not-found page. `path` is the unmatched request path.
    NotFound {
        path: UrlPath,
        #[serde(rename = "notFound")]
        not_found: &'a UrlPath,
        entry: &'a RouteEntry,
    },
}

impl Resolution<'_> {
    /// The normalized request path.
    pub fn path(&self) -> &UrlPath {
        match self {
            Self::Redirect { from, .. } => from,
            Self::Page { path, .. } | Self::NotFound { path, .. } => path,
        }
    }
}

/// Resolve an already normalized path against a route/redirect pair.
pub fn resolve<'a>(
    routes: &'a RouteTable,
    redirects: &'a RedirectTable,
    path: UrlPath,
) -> Resolution<'a> {
    if let Some(to) = redirects.get(&path) {
        return Resolution::Redirect { from: path, to };
    }
    if let Some(entry) = routes.get(&path) {
        return Resolution::Page { path, entry };
    }
    let (not_found, entry) = routes.not_found();
    Resolution::NotFound {
        path,
        not_found,
        entry,
    }
}
