//! `[[collections]]` configuration: document groups with sidebar trees.
//!
//! # Example
//!
//! ```toml
//! [[collections]]
//! kind = "doc"
//! dir = "vue"
//! title = "Vue"
//!
//! [[collections.sidebar]]
//! text = "Basics"
//! collapsed = false
//! items = [
//!     { text = "Template syntax", link = "/vue/iorgmo8s/" },
//!     { text = "State", link = "state" },   # relative to the collection prefix
//! ]
//!
//! [[collections]]
//! dir = "browser"
//! title = "Browser"
//! link_prefix = "/browser/"
//! sidebar = "auto"
//! ```

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::UrlPath;

/// Kind of collection, as the theme distinguishes them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    /// Documentation notes with a sidebar.
    #[default]
    Doc,
    /// Blog posts (listed, no sidebar).
    Post,
}

/// A named group of documents under one content directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    #[serde(default)]
    pub kind: CollectionKind,

    /// Content directory, relative to `build.content`.
    pub dir: String,

    /// Display title.
    pub title: String,

    /// URL prefix for the collection's pages; relative sidebar links are
    /// joined under it. Defaults to `/<dir>/`.
    #[serde(default)]
    pub link_prefix: Option<String>,

    #[serde(default)]
    pub sidebar: Sidebar,
}

impl CollectionConfig {
    pub const DIR: FieldPath = FieldPath::new("collections.dir");
    pub const LINK_PREFIX: FieldPath = FieldPath::new("collections.link_prefix");

    /// URL prefix owning this collection's pages.
    pub fn prefix(&self) -> UrlPath {
        match &self.link_prefix {
            Some(prefix) => UrlPath::from_page(&format!("{}/", prefix.trim_end_matches('/'))),
            None => UrlPath::from_page(&format!("/{}/", self.dir.trim_matches('/'))),
        }
    }
}

/// Sidebar definition: generated from the directory or authored explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sidebar {
    Mode(SidebarMode),
    Items(Vec<SidebarItem>),
}

impl Default for Sidebar {
    fn default() -> Self {
        Self::Items(Vec::new())
    }
}

impl Sidebar {
    /// Authored items (empty for `"auto"`).
    pub fn items(&self) -> &[SidebarItem] {
        match self {
            Self::Mode(_) => &[],
            Self::Items(items) => items,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidebarMode {
    Auto,
}

/// One node of a sidebar tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidebarItem {
    pub text: String,

    #[serde(default)]
    pub link: Option<String>,

    #[serde(default)]
    pub collapsed: Option<bool>,

    #[serde(default)]
    pub items: Vec<SidebarItem>,
}

impl SidebarItem {
    /// Visit this node and its descendants depth-first, in authored order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a SidebarItem)) {
        visit(self);
        for child in &self.items {
            child.walk(visit);
        }
    }
}

/// Validate collection definitions.
pub fn validate_collections(collections: &[CollectionConfig], diag: &mut ConfigDiagnostics) {
    let mut seen = FxHashSet::default();

    for (index, collection) in collections.iter().enumerate() {
        let dir = collection.dir.trim_matches('/');
        if dir.is_empty() {
            diag.error(
                CollectionConfig::DIR,
                format!("collection #{index} (`{}`) has an empty dir", collection.title),
            );
        } else if !seen.insert(dir) {
            diag.error(
                CollectionConfig::DIR,
                format!("dir `{dir}` is used by more than one collection"),
            );
        }

        if let Some(prefix) = &collection.link_prefix
            && !prefix.starts_with('/')
        {
            diag.error_with_hint(
                CollectionConfig::LINK_PREFIX,
                format!("link_prefix `{prefix}` of `{}` is not absolute", collection.title),
                format!("did you mean `/{prefix}`?"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_collection_with_nested_sidebar() {
        let config = test_parse_config(
            r#"
[[collections]]
dir = "vue"
title = "Vue"

[[collections.sidebar]]
text = "Basics"
collapsed = false
items = [
    { text = "Syntax", collapsed = true, items = [{ text = "Reactivity", link = "/vue/lnalkeew/" }] },
    { text = "Router", link = "/vue/pc7wxaew/" },
]
"#,
        );

        let vue = &config.collections[0];
        assert_eq!(vue.kind, CollectionKind::Doc);
        assert_eq!(vue.prefix().as_str(), "/vue/");

        let mut links = Vec::new();
        for item in vue.sidebar.items() {
            item.walk(&mut |node| {
                if let Some(link) = &node.link {
                    links.push(link.as_str());
                }
            });
        }
        assert_eq!(links, vec!["/vue/lnalkeew/", "/vue/pc7wxaew/"]);
    }

    #[test]
    fn test_auto_sidebar() {
        let config = test_parse_config(
            "[[collections]]\ndir = \"browser\"\ntitle = \"Browser\"\nlink_prefix = \"/browser\"\nsidebar = \"auto\"",
        );
        let browser = &config.collections[0];
        assert_eq!(browser.sidebar, Sidebar::Mode(SidebarMode::Auto));
        assert!(browser.sidebar.items().is_empty());
        assert_eq!(browser.prefix().as_str(), "/browser/");
    }

    #[test]
    fn test_post_collection() {
        let config =
            test_parse_config("[[collections]]\nkind = \"post\"\ndir = \"blog\"\ntitle = \"Blog\"");
        assert_eq!(config.collections[0].kind, CollectionKind::Post);
    }

    #[test]
    fn test_validate_duplicate_and_relative_prefix() {
        let config = test_parse_config(
            r#"
[[collections]]
dir = "go"
title = "Go"

[[collections]]
dir = "/go/"
title = "Go again"
link_prefix = "golang"
"#,
        );
        let mut diag = ConfigDiagnostics::new();
        validate_collections(&config.collections, &mut diag);
        assert_eq!(diag.len(), 2);
        assert!(diag.errors()[0].message.contains("more than one"));
        assert_eq!(diag.errors()[1].field.as_str(), "collections.link_prefix");
    }
}
