//! Immutable route + redirect pair and its persisted JSON form.
//!
//! ```json
//! {
//!   "redirects": { "/old/path.html": "/blog/" },
//!   "routes": [
//!     ["/blog/", { "loaderRef": "pages/blog/index.html.js", "meta": { "title": "博客" } }],
//!     ["/404.html", { "loaderRef": "pages/404.html.js", "meta": { "title": "" } }]
//!   ]
//! }
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use super::error::{RouteError, SnapshotError};
use super::redirect::{BuildWarning, RedirectSpec, RedirectTable};
use super::resolve::{Resolution, resolve};
use super::table::{RouteEntry, RouteTable};
use crate::content::Document;
use crate::core::UrlPath;

/// A complete, consistent pair of tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSnapshot {
    pub routes: RouteTable,
    pub redirects: RedirectTable,
}

impl RouteSnapshot {
    /// Build both tables. Aliases of `documents` are appended to `specs`.
    pub fn build(
        documents: &[Document],
        specs: &[RedirectSpec],
        not_found: &UrlPath,
    ) -> Result<(Self, Vec<BuildWarning>), RouteError> {
        let routes = RouteTable::build(documents, not_found)?;

        let mut all_specs = specs.to_vec();
        all_specs.extend(RedirectSpec::from_aliases(documents));
        let (redirects, warnings) = RedirectTable::build(&all_specs, &routes)?;

        Ok((Self { routes, redirects }, warnings))
    }

    /// Resolve a raw request path (percent-encoded, may carry a query).
    pub fn resolve(&self, raw: &str) -> Resolution<'_> {
        self.resolve_path(UrlPath::from_browser(raw))
    }

    /// Resolve an already normalized path.
    pub fn resolve_path(&self, path: UrlPath) -> Resolution<'_> {
        resolve(&self.routes, &self.redirects, path)
    }

    /// Resolve a raw request path served under a deployment `base`.
    ///
    /// Paths outside `base` resolve to not-found without a table lookup.
    pub fn resolve_under(&self, raw: &str, base: &str) -> Resolution<'_> {
        let path = UrlPath::from_browser(raw);
        match path.strip_base(base) {
            Some(path) => self.resolve_path(path),
            None => {
                let (not_found, entry) = self.routes.not_found();
                Resolution::NotFound {
                    path,
                    not_found,
                    entry,
                }
            }
        }
    }

    // ========================================================================
    // persistence
    // ========================================================================

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&PersistedRef {
            redirects: &self.redirects,
            routes: self.routes.entries(),
        })
    }

    /// Parse the persisted form. Both tables are loaded verbatim; the
    /// not-found path comes from configuration.
    pub fn from_json(json: &str, not_found: &UrlPath) -> Result<Self, PersistError> {
        let persisted: Persisted = serde_json::from_str(json)?;
        let routes = RouteTable::from_entries(persisted.routes, not_found)?;
        let redirects = RedirectTable::from_entries(persisted.redirects.0);
        Ok(Self { routes, redirects })
    }

    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let json = self
            .to_json()
            .map_err(|e| SnapshotError::Json(path.to_path_buf(), e))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| SnapshotError::Io(parent.to_path_buf(), e))?;
        }
        fs::write(path, json).map_err(|e| SnapshotError::Io(path.to_path_buf(), e))
    }

    pub fn load(path: &Path, not_found: &UrlPath) -> Result<Self, SnapshotError> {
        let json = fs::read_to_string(path).map_err(|e| SnapshotError::Io(path.to_path_buf(), e))?;
        Self::from_json(&json, not_found).map_err(|e| match e {
            PersistError::Json(e) => SnapshotError::Json(path.to_path_buf(), e),
            PersistError::Route(e) => SnapshotError::Route(e),
        })
    }

    /// Content fingerprint, used to skip no-op swaps after a rebuild.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut hasher = blake3::Hasher::new();
        for (path, entry) in self.routes.iter() {
            hasher.update(path.as_str().as_bytes());
            hasher.update(&[0]);
            hasher.update(entry.loader_ref.as_str().as_bytes());
            hasher.update(&[0]);
            hasher.update(entry.meta.title.as_bytes());
            hasher.update(&[1]);
        }
        hasher.update(&[2]);
        for (old, new) in self.redirects.iter() {
            hasher.update(old.as_str().as_bytes());
            hasher.update(&[0]);
            hasher.update(new.as_str().as_bytes());
            hasher.update(&[1]);
        }
        Fingerprint(*hasher.finalize().as_bytes())
    }
}

/// Errors parsing the persisted form (path-free, see `SnapshotError`).
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Route(#[from] RouteError),
}

/// A 256-bit snapshot hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // first 16 hex chars are plenty for logs
        write!(f, "{}", &self.to_hex()[..16])
    }
}

// ============================================================================
// serde glue
// ============================================================================

#[derive(Serialize)]
struct PersistedRef<'a> {
    redirects: &'a RedirectTable,
    routes: &'a [(UrlPath, RouteEntry)],
}

#[derive(Deserialize)]
struct Persisted {
    redirects: PairList,
    routes: Vec<(UrlPath, RouteEntry)>,
}

/// A JSON object read back as pairs, keeping document order.
struct PairList(Vec<(UrlPath, UrlPath)>);

impl<'de> Deserialize<'de> for PairList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PairVisitor;

        impl<'de> Visitor<'de> for PairVisitor {
            type Value = PairList;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of old path -> new path")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<PairList, A::Error> {
                let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((old, new)) = map.next_entry::<UrlPath, UrlPath>()? {
                    pairs.push((old, new));
                }
                Ok(PairList(pairs))
            }
        }

        deserializer.deserialize_map(PairVisitor)
    }
}
