//! Config field path used in diagnostics.

use owo_colors::Style;
use std::fmt;

use crate::logger::paint;

/// Dotted path of a config field, e.g. `build.not_found`.
///
/// Sections declare their paths as associated constants so diagnostics
/// always name a field that exists:
///
/// ```ignore
/// impl BuildSectionConfig {
///     pub const NOT_FOUND: FieldPath = FieldPath::new("build.not_found");
/// }
///
/// diag.error(BuildSectionConfig::NOT_FOUND, "must be absolute");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&paint(format_args!("`{}`", self.0), Style::new().bright_blue()))
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        self.0
    }
}
