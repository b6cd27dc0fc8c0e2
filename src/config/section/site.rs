//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! title = "My Notes"
//! description = "Personal notes"
//! lang = "zh-CN"
//! base = "/short-note/"       # Deployment base, stripped before route lookup
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Site metadata and deployment base.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Site title (display only).
    pub title: String,

    /// Site description (display only).
    pub description: String,

    /// Content language.
    pub lang: String,

    /// URL base the site is deployed under. Must start and end with `/`.
    pub base: String,
}

impl SiteSectionConfig {
    pub const BASE: FieldPath = FieldPath::new("site.base");

    /// Validate the base path.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.base.starts_with('/') || !self.base.ends_with('/') {
            diag.error_with_hint(
                Self::BASE,
                format!("base `{}` must start and end with `/`", self.base),
                "use `/` for a site served from the domain root",
            );
        }
    }
}

impl Default for SiteSectionConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            lang: "en-US".to_string(),
            base: "/".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_site_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.site.base, "/");
        assert_eq!(config.site.lang, "en-US");
    }

    #[test]
    fn test_site_base_validation() {
        let config = test_parse_config("[site]\nbase = \"/short-note/\"");
        let mut diag = ConfigDiagnostics::new();
        config.site.validate(&mut diag);
        assert!(diag.is_empty());

        let config = test_parse_config("[site]\nbase = \"short-note\"");
        let mut diag = ConfigDiagnostics::new();
        config.site.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field.as_str(), "site.base");
    }
}
