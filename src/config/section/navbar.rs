//! `[[navbar]]` configuration.
//!
//! ```toml
//! [[navbar]]
//! text = "Home"
//! link = "/"
//!
//! [[navbar]]
//! text = "Languages"
//! items = [
//!     { text = "Go", link = "/go/index.md", icon = "material-icon-theme:go-gopher" },
//!     { text = "Rust", link = "rust/index.md" },
//! ]
//! ```

use serde::{Deserialize, Serialize};

/// Navbar entry; either a link or a dropdown of nested entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    pub text: String,

    #[serde(default)]
    pub link: Option<String>,

    #[serde(default)]
    pub icon: Option<String>,

    #[serde(default)]
    pub items: Vec<NavItem>,
}

impl NavItem {
    /// Visit this entry and its descendants depth-first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a NavItem)) {
        visit(self);
        for child in &self.items {
            child.walk(visit);
        }
    }
}
