//! Scanned document records.

use std::path::PathBuf;

use crate::core::UrlPath;

/// A markdown document discovered in the content tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Source path, relative to the content directory
    pub source: PathBuf,
    /// Canonical path the document is served at
    pub canonical: UrlPath,
    /// Display title (may be empty)
    pub title: String,
    /// Old paths that should redirect here
    pub aliases: Vec<UrlPath>,
}

impl Document {
    pub fn new(source: impl Into<PathBuf>, canonical: UrlPath, title: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            canonical,
            title: title.into(),
            aliases: Vec::new(),
        }
    }

    pub fn with_aliases(mut self, aliases: Vec<UrlPath>) -> Self {
        self.aliases = aliases;
        self
    }
}
