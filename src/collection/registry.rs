//! Collection lookup and link integrity checks.

use crate::config::{CollectionConfig, NavItem, SidebarItem};
use crate::core::{LinkKind, UrlPath};
use crate::route::{Resolution, RouteSnapshot};

use super::report::{LinkIssue, LinkReport};

/// Report group for navbar links.
pub const NAVBAR_GROUP: &str = "navbar";

/// Declared collections and navbar, indexed by URL prefix.
#[derive(Debug, Clone, Default)]
pub struct CollectionRegistry {
    /// `(prefix, collection)`, longest prefix first
    collections: Vec<(UrlPath, CollectionConfig)>,
    navbar: Vec<NavItem>,
}

impl CollectionRegistry {
    pub fn new(collections: Vec<CollectionConfig>, navbar: Vec<NavItem>) -> Self {
        let mut collections: Vec<_> = collections.into_iter().map(|c| (c.prefix(), c)).collect();
        // stable: equal-length prefixes keep declaration order
        collections.sort_by_key(|(prefix, _)| std::cmp::Reverse(prefix.as_str().len()));
        Self {
            collections,
            navbar,
        }
    }

    /// The collection owning `path`: the one with the longest matching prefix.
    pub fn collection_for(&self, path: &UrlPath) -> Option<&CollectionConfig> {
        self.collections
            .iter()
            .find(|(prefix, _)| path.starts_with(prefix.as_str()))
            .map(|(_, collection)| collection)
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Check every sidebar and navbar link against `snapshot`.
    ///
    /// External links and bare anchors are skipped. Relative sidebar links
    /// are joined under their collection's prefix; relative navbar links
    /// under the site root.
    pub fn validate_links(&self, snapshot: &RouteSnapshot) -> LinkReport {
        let mut report = LinkReport::default();

        for (prefix, collection) in &self.collections {
            let group = prefix.as_str();
            for item in collection.sidebar.items() {
                item.walk(&mut |node: &SidebarItem| {
                    let leaf = node.items.is_empty();
                    check_link(&mut report, snapshot, group, prefix, &node.text, node.link.as_deref(), leaf);
                });
            }
        }

        let root = UrlPath::root();
        for item in &self.navbar {
            item.walk(&mut |node: &NavItem| {
                let leaf = node.items.is_empty();
                check_link(&mut report, snapshot, NAVBAR_GROUP, &root, &node.text, node.link.as_deref(), leaf);
            });
        }

        report
    }
}

/// Classify one authored link. Groups without a link are fine; leaves are not.
fn check_link(
    report: &mut LinkReport,
    snapshot: &RouteSnapshot,
    group: &str,
    base: &UrlPath,
    text: &str,
    link: Option<&str>,
    leaf: bool,
) {
    let link = match link.map(str::trim) {
        Some(link) if !link.is_empty() => link,
        Some(_) => return report.add(group, text, "", LinkIssue::Empty),
        None if leaf => return report.add(group, text, "", LinkIssue::Empty),
        None => return,
    };

    let path = match LinkKind::parse(link) {
        LinkKind::External(_) | LinkKind::Fragment(_) => return,
        LinkKind::SiteRoot(link) => UrlPath::from_link(link),
        LinkKind::Relative(link) => base.join_link(link),
    };

    match snapshot.resolve_path(path) {
        Resolution::Page { .. } => {}
        Resolution::Redirect { to, .. } => {
            report.add(group, text, link, LinkIssue::Redirected { target: to.clone() })
        }
        Resolution::NotFound { path, .. } => {
            report.add(group, text, link, LinkIssue::Dangling { resolved: path })
        }
    }
}
