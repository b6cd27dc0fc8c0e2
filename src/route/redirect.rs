//! Redirect table: old path -> final canonical target.
//!
//! Built in four passes:
//!
//! 1. Collapse exact duplicates; reject one source with two targets.
//! 2. Drop sources that are live documents (the document wins).
//! 3. Flatten chains to their final hop, failing on any cycle.
//! 4. Flag targets that are not routes.

use std::fmt;
use std::path::PathBuf;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::error::RouteError;
use super::table::RouteTable;
use crate::content::Document;
use crate::core::UrlPath;

/// Where a redirect was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOrigin {
    /// `[redirects]` in the site config
    Config,
    /// `aliases` frontmatter of a document
    Alias(PathBuf),
}

impl fmt::Display for RedirectOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config => f.write_str("[redirects]"),
            Self::Alias(source) => write!(f, "aliases of {}", source.display()),
        }
    }
}

/// One authored `old -> new` redirect, already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectSpec {
    pub old: UrlPath,
    pub new: UrlPath,
    pub origin: RedirectOrigin,
}

impl RedirectSpec {
    pub fn new(old: &str, new: &str, origin: RedirectOrigin) -> Self {
        Self {
            old: UrlPath::from_page(old),
            new: UrlPath::from_page(new),
            origin,
        }
    }

    pub fn from_config(old: &str, new: &str) -> Self {
        Self::new(old, new, RedirectOrigin::Config)
    }

    /// Every alias of every document, pointing at the document.
    pub fn from_aliases(documents: &[Document]) -> Vec<Self> {
        documents
            .iter()
            .flat_map(|doc| {
                doc.aliases.iter().map(|alias| Self {
                    old: alias.clone(),
                    new: doc.canonical.clone(),
                    origin: RedirectOrigin::Alias(doc.source.clone()),
                })
            })
            .collect()
    }
}

/// Non-fatal problems found while building the redirect table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildWarning {
    /// A redirect source is a live document; the redirect was dropped.
    RedirectShadowed {
        old: UrlPath,
        new: UrlPath,
        origin: RedirectOrigin,
    },
    /// A redirect's final target is not a route; the redirect was kept.
    RedirectDangling { old: UrlPath, target: UrlPath },
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedirectShadowed { old, new, origin } => write!(
                f,
                "redirect `{old}` -> `{new}` ({origin}) dropped: `{old}` is a live page"
            ),
            Self::RedirectDangling { old, target } => {
                write!(f, "redirect `{old}` points to `{target}`, which is not a page")
            }
        }
    }
}

/// Flattened single-hop redirect table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectTable {
    entries: Vec<(UrlPath, UrlPath)>,
    index: FxHashMap<UrlPath, usize>,
}

impl RedirectTable {
    /// Build from authored specs against the route table they redirect into.
    pub fn build(
        specs: &[RedirectSpec],
        routes: &RouteTable,
    ) -> Result<(Self, Vec<BuildWarning>), RouteError> {
        let mut warnings = Vec::new();

        let mut seen: FxHashMap<&UrlPath, &UrlPath> = FxHashMap::default();
        let mut unique: Vec<&RedirectSpec> = Vec::new();
        for spec in specs {
            match seen.get(&spec.old) {
                Some(&existing) if *existing == spec.new => {}
                Some(&existing) => {
                    return Err(RouteError::ConflictingRedirect {
                        old: spec.old.clone(),
                        first: existing.clone(),
                        second: spec.new.clone(),
                    });
                }
                None => {
                    seen.insert(&spec.old, &spec.new);
                    unique.push(spec);
                }
            }
        }

        let mut order: Vec<&UrlPath> = Vec::new();
        let mut direct: FxHashMap<&UrlPath, &UrlPath> = FxHashMap::default();
        for spec in unique {
            if routes.contains(&spec.old) {
                warnings.push(BuildWarning::RedirectShadowed {
                    old: spec.old.clone(),
                    new: spec.new.clone(),
                    origin: spec.origin.clone(),
                });
                continue;
            }
            direct.insert(&spec.old, &spec.new);
            order.push(&spec.old);
        }

        let mut resolved: FxHashMap<&UrlPath, &UrlPath> = FxHashMap::default();
        let mut entries = Vec::with_capacity(order.len());
        for old in order {
            let target = flatten(old, &direct, &mut resolved)?;
            if !routes.contains(target) {
                warnings.push(BuildWarning::RedirectDangling {
                    old: old.clone(),
                    target: target.clone(),
                });
            }
            entries.push((old.clone(), target.clone()));
        }

        Ok((Self::from_entries(entries), warnings))
    }

    /// Load persisted pairs verbatim. A repeated source keeps its first target.
    pub fn from_entries(entries: Vec<(UrlPath, UrlPath)>) -> Self {
        let mut index = FxHashMap::default();
        let mut kept = Vec::with_capacity(entries.len());
        for (old, new) in entries {
            if index.contains_key(&old) {
                continue;
            }
            index.insert(old.clone(), kept.len());
            kept.push((old, new));
        }
        Self {
            entries: kept,
            index,
        }
    }

    /// Exact-match lookup of the final target.
    pub fn get(&self, old: &UrlPath) -> Option<&UrlPath> {
        self.index.get(old).map(|&i| &self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UrlPath, &UrlPath)> {
        self.entries.iter().map(|(old, new)| (old, new))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Serialized as a JSON object in table order.
impl Serialize for RedirectTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (old, new) in &self.entries {
            map.serialize_entry(old, new)?;
        }
        map.end()
    }
}

/// Follow `old` to its final target, memoizing every hop on the way.
fn flatten<'a>(
    old: &'a UrlPath,
    direct: &FxHashMap<&'a UrlPath, &'a UrlPath>,
    resolved: &mut FxHashMap<&'a UrlPath, &'a UrlPath>,
) -> Result<&'a UrlPath, RouteError> {
    let mut chain: Vec<&UrlPath> = vec![old];
    let mut on_chain: FxHashSet<&UrlPath> = FxHashSet::default();
    on_chain.insert(old);

    let mut current = old;
    let target = loop {
        if let Some(&done) = resolved.get(current) {
            break done;
        }
        let Some(&next) = direct.get(current) else {
            break current;
        };
        if !on_chain.insert(next) {
            let start = chain.iter().position(|hop| *hop == next).unwrap_or(0);
            let mut cycle: Vec<UrlPath> = chain[start..].iter().map(|&hop| hop.clone()).collect();
            cycle.push(next.clone());
            return Err(RouteError::RedirectCycle(cycle));
        }
        chain.push(next);
        current = next;
    };

    for hop in chain {
        if direct.contains_key(hop) {
            resolved.insert(hop, target);
        }
    }
    Ok(target)
}
