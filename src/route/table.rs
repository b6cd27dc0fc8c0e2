//! Route table: canonical path -> loader reference and metadata.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::conflict::detect_conflicts;
use super::error::RouteError;
use crate::content::Document;
use crate::core::UrlPath;

/// Opaque reference to the page chunk that renders a route.
///
/// Derived from the canonical path in chunk naming:
/// `/` -> `pages/index.html.js`, `/demo/x/` -> `pages/demo/x/index.html.js`,
/// `/404.html` -> `pages/404.html.js`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoaderRef(String);

impl LoaderRef {
    pub fn for_path(path: &UrlPath) -> Self {
        let rel = path.as_str().trim_start_matches('/');
        if path.is_dir() {
            Self(format!("pages/{rel}index.html.js"))
        } else {
            Self(format!("pages/{rel}.js"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoaderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Route metadata exposed to the serving layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMeta {
    #[serde(default)]
    pub title: String,
}

/// A single route: how to load the page and what to show about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    pub loader_ref: LoaderRef,
    #[serde(default)]
    pub meta: RouteMeta,
}

impl RouteEntry {
    pub fn for_document(doc: &Document) -> Self {
        Self {
            loader_ref: LoaderRef::for_path(&doc.canonical),
            meta: RouteMeta {
                title: doc.title.clone(),
            },
        }
    }
}

/// Insertion-ordered route table with exact-match lookup.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<(UrlPath, RouteEntry)>,
    index: FxHashMap<UrlPath, usize>,
    not_found: UrlPath,
}

impl RouteTable {
    /// Build from scanned documents, preserving their order.
    ///
    /// Fails if two documents share a canonical path (every claimant is
    /// reported) or if no document provides `not_found`.
    pub fn build(documents: &[Document], not_found: &UrlPath) -> Result<Self, RouteError> {
        let conflicts = detect_conflicts(documents);
        if !conflicts.is_empty() {
            return Err(RouteError::DuplicateCanonical(conflicts));
        }

        let entries = documents
            .iter()
            .map(|doc| (doc.canonical.clone(), RouteEntry::for_document(doc)))
            .collect();
        Self::from_entries(entries, not_found)
    }

    /// Rebuild from persisted `(path, entry)` pairs.
    pub fn from_entries(
        entries: Vec<(UrlPath, RouteEntry)>,
        not_found: &UrlPath,
    ) -> Result<Self, RouteError> {
        let mut index = FxHashMap::default();
        index.reserve(entries.len());

        let mut duplicates: Vec<UrlPath> = Vec::new();
        for (i, (path, _)) in entries.iter().enumerate() {
            if index.insert(path.clone(), i).is_some() && !duplicates.contains(path) {
                duplicates.push(path.clone());
            }
        }
        if !duplicates.is_empty() {
            let conflicts = duplicates
                .into_iter()
                .map(|url| super::conflict::UrlConflict {
                    sources: entries
                        .iter()
                        .filter(|(path, _)| *path == url)
                        .map(|(_, entry)| entry.loader_ref.as_str().into())
                        .collect(),
                    url,
                })
                .collect();
            return Err(RouteError::DuplicateCanonical(conflicts));
        }

        if !index.contains_key(not_found) {
            return Err(RouteError::MissingNotFound(not_found.clone()));
        }

        Ok(Self {
            entries,
            index,
            not_found: not_found.clone(),
        })
    }

    /// Exact-match lookup.
    pub fn get(&self, path: &UrlPath) -> Option<&RouteEntry> {
        self.index.get(path).map(|&i| &self.entries[i].1)
    }

    /// Exact-match lookup by an already canonical string.
    pub fn get_str(&self, path: &str) -> Option<&RouteEntry> {
        self.index.get(path).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, path: &UrlPath) -> bool {
        self.index.contains_key(path)
    }

    /// The not-found route. Always present by construction.
    pub fn not_found(&self) -> (&UrlPath, &RouteEntry) {
        let (path, entry) = &self.entries[self.index[&self.not_found]];
        (path, entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UrlPath, &RouteEntry)> {
        self.entries.iter().map(|(path, entry)| (path, entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(super) fn entries(&self) -> &[(UrlPath, RouteEntry)] {
        &self.entries
    }
}

impl PartialEq for RouteTable {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries && self.not_found == other.not_found
    }
}

impl Eq for RouteTable {}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(source: &str, canonical: &str, title: &str) -> Document {
        Document::new(source, UrlPath::from_page(canonical), title)
    }

    fn not_found() -> UrlPath {
        UrlPath::from_page("/404.html")
    }

    #[test]
    fn test_loader_ref_naming() {
        let cases = [
            ("/", "pages/index.html.js"),
            ("/demo/x/", "pages/demo/x/index.html.js"),
            ("/404.html", "pages/404.html.js"),
            ("/vue/guide.html", "pages/vue/guide.html.js"),
        ];
        for (path, expected) in cases {
            assert_eq!(LoaderRef::for_path(&UrlPath::from_page(path)).as_str(), expected);
        }
    }

    #[test]
    fn test_one_entry_per_document_in_order() {
        let docs = vec![
            doc("blog/README.md", "/blog/", "博客"),
            doc("a.md", "/a.html", "A"),
            doc("404.md", "/404.html", ""),
        ];
        let table = RouteTable::build(&docs, &not_found()).unwrap();

        assert_eq!(table.len(), docs.len());
        let paths: Vec<_> = table.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(paths, vec!["/blog/", "/a.html", "/404.html"]);
        assert_eq!(table.get_str("/blog/").unwrap().meta.title, "博客");
        assert_eq!(
            table.get(&UrlPath::from_page("/blog")).unwrap().loader_ref.as_str(),
            "pages/blog/index.html.js"
        );
        assert!(table.get_str("/blog").is_none());
        assert_eq!(table.not_found().0.as_str(), "/404.html");
    }

    #[test]
    fn test_duplicate_canonical_is_fatal() {
        let docs = vec![
            doc("go.md", "/go/", ""),
            doc("go/README.md", "/go/", ""),
            doc("404.md", "/404.html", ""),
        ];
        let err = RouteTable::build(&docs, &not_found()).unwrap_err();
        let RouteError::DuplicateCanonical(conflicts) = err else {
            panic!("expected duplicate error, got {err}");
        };
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].sources.len(), 2);
    }

    #[test]
    fn test_missing_not_found_is_fatal() {
        let docs = vec![doc("a.md", "/a/", "")];
        let err = RouteTable::build(&docs, &not_found()).unwrap_err();
        assert!(matches!(err, RouteError::MissingNotFound(ref p) if p.as_str() == "/404.html"));
    }

    #[test]
    fn test_from_entries_checks_duplicates() {
        let entry = RouteEntry::for_document(&doc("x.md", "/x/", ""));
        let entries = vec![
            (UrlPath::from_page("/x/"), entry.clone()),
            (not_found(), entry.clone()),
            (UrlPath::from_page("/x/"), entry),
        ];
        assert!(matches!(
            RouteTable::from_entries(entries, &not_found()),
            Err(RouteError::DuplicateCanonical(_))
        ));
    }

    #[test]
    fn test_entry_json_shape() {
        let entry = RouteEntry::for_document(&doc("blog/README.md", "/blog/", "博客"));
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            json,
            r#"{"loaderRef":"pages/blog/index.html.js","meta":{"title":"博客"}}"#
        );
    }
}
