//! `[build]` section configuration.
//!
//! Contains content scanning and route table output settings.
//!
//! # Example
//!
//! ```toml
//! [build]
//! content = "docs"              # Markdown content directory (relative to site root)
//! output = ".notemap"           # Where routes.json (and redirect stubs) are written
//! not_found = "/404.html"       # Route served for unmatched paths
//! builtin_not_found = true      # Provide the not-found route when no page claims it
//! ignore = [".vuepress", "node_modules"]
//! stubs = false                 # Write HTML redirect stubs next to routes.json
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::UrlPath;

/// File name of the persisted route snapshot inside `output`.
pub const SNAPSHOT_FILE: &str = "routes.json";

/// Build settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// Markdown content directory.
    pub content: PathBuf,

    /// Output directory for `routes.json` and redirect stubs.
    pub output: PathBuf,

    /// Canonical path of the not-found route.
    pub not_found: String,

    /// Add a synthetic not-found document when no page claims `not_found`.
    pub builtin_not_found: bool,

    /// Directory names skipped while scanning (matched per path segment).
    pub ignore: Vec<String>,

    /// Write an HTML redirect stub for every redirect.
    pub stubs: bool,
}

impl BuildSectionConfig {
    pub const NOT_FOUND: FieldPath = FieldPath::new("build.not_found");
    pub const CONTENT: FieldPath = FieldPath::new("build.content");

    /// Canonical not-found path.
    pub fn not_found_url(&self) -> UrlPath {
        UrlPath::from_page(&self.not_found)
    }

    /// Path of the persisted route snapshot.
    pub fn snapshot_path(&self) -> PathBuf {
        self.output.join(SNAPSHOT_FILE)
    }

    /// Whether a directory name is excluded from scanning.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore.iter().any(|ignored| ignored == name)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.not_found.starts_with('/') {
            diag.error_with_hint(
                Self::NOT_FOUND,
                format!("`{}` is not an absolute path", self.not_found),
                "write it as a URL path, e.g. `/404.html`",
            );
        }
        if !self.content.is_dir() {
            diag.error(
                Self::CONTENT,
                format!("content directory `{}` not found", self.content.display()),
            );
        }
    }
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            content: "docs".into(),
            output: ".notemap".into(),
            not_found: "/404.html".to_string(),
            builtin_not_found: true,
            ignore: vec![".vuepress".to_string(), "node_modules".to_string()],
            stubs: false,
        }
    }
}
