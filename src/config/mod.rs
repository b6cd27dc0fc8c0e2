//! Site configuration management for `notemap.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   ├── collection # [[collections]]
//! │   ├── navbar     # [[navbar]]
//! │   ├── serve      # [serve]
//! │   └── site       # [site]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   ├── field      # FieldPath
//! │   └── handle     # Global config handle
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section            | Purpose                                          |
//! |--------------------|--------------------------------------------------|
//! | `[site]`           | Site metadata and deployment base                |
//! | `[build]`          | Content dir, output dir, not-found route         |
//! | `[serve]`          | Route service (port, interface, watch)           |
//! | `[redirects]`      | Author-maintained `old = new` redirects          |
//! | `[[navbar]]`       | Top navigation links                             |
//! | `[[collections]]`  | Document groups with sidebar trees               |

pub mod section;
pub mod types;
mod util;

use util::{find_config_file, resolve_against};

pub use section::{
    BuildSectionConfig, CollectionConfig, NavItem, ServeConfig, SidebarItem, SiteSectionConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config};

use crate::{
    cli::{Cli, Commands},
    log,
    route::RedirectSpec,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing notemap.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Site metadata
    #[serde(default)]
    pub site: SiteSectionConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildSectionConfig,

    /// Route service settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Author-maintained redirects (`old = new`)
    #[serde(default)]
    pub redirects: BTreeMap<String, String>,

    /// Top navigation
    #[serde(default)]
    pub navbar: Vec<NavItem>,

    /// Document collections with sidebars
    #[serde(default)]
    pub collections: Vec<CollectionConfig>,
}

impl SiteConfig {
    pub const REDIRECTS: FieldPath = FieldPath::new("redirects");

    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file. The project root is
    /// the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let config_path = find_config_file(&cwd, &cli.config)
            .ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;

        let mut config = Self::from_path(&config_path)?;
        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(cwd);

        config.config_path = config_path;
        config.apply_cli_paths(cli);
        config.apply_command_options(cli);
        config.finalize(&root);
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Resolve paths against `root`.
    ///
    /// Public so tests and embedders can build a config without a CLI.
    pub fn finalize(&mut self, root: &Path) {
        self.root = resolve_against(Path::new("/"), root);
        self.build.content = resolve_against(&self.root, &self.build.content);
        self.build.output = resolve_against(&self.root, &self.build.output);
    }

    /// Get path relative to the site root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    /// Author-maintained redirects as builder input, in key order.
    pub fn redirect_specs(&self) -> Vec<RedirectSpec> {
        self.redirects
            .iter()
            .map(|(old, new)| RedirectSpec::from_config(old, new))
            .collect()
    }

    /// Re-read `[redirects]` from the config file, keeping every other setting.
    ///
    /// Other sections need a restart: CLI overrides were applied on top of
    /// them at load time.
    pub fn reload_redirects(&self) -> Result<Self> {
        let content = fs::read_to_string(&self.config_path)
            .map_err(|err| ConfigError::Io(self.config_path.clone(), err))?;
        let fresh = Self::from_str(&content)?;

        let mut config = self.clone();
        config.redirects = fresh.redirects;

        let mut diag = ConfigDiagnostics::new();
        config.validate_redirects(&mut diag);
        diag.into_result().map_err(ConfigError::Diagnostics)?;
        Ok(config)
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    fn apply_cli_paths(&mut self, cli: &Cli) {
        Self::update_option(&mut self.build.content, cli.content.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());
    }

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Build { stubs } => {
                self.build.stubs |= *stubs;
            }
            Commands::Serve {
                interface,
                port,
                watch,
            } => {
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
                Self::update_option(&mut self.serve.watch, watch.as_ref());
            }
            Commands::Check { .. } | Commands::Resolve { .. } => {}
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(&mut diag);
        self.build.validate(&mut diag);
        self.serve.validate(&mut diag);
        section::validate_collections(&self.collections, &mut diag);
        self.validate_redirects(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    fn validate_redirects(&self, diag: &mut ConfigDiagnostics) {
        for (old, new) in &self.redirects {
            if old.trim().is_empty() {
                diag.error(Self::REDIRECTS, format!("empty redirect source -> `{new}`"));
            }
            if new.trim().is_empty() {
                diag.error_with_hint(
                    Self::REDIRECTS,
                    format!("redirect `{old}` has an empty target"),
                    "remove the entry or point it at the page's new path",
                );
            }
        }
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config with minimal `[site]` fields.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SiteConfig {
    let config = if extra.contains("[site]") {
        extra.to_string()
    } else {
        format!("[site]\ntitle = \"Test\"\n{extra}")
    };
    let (parsed, ignored) = SiteConfig::parse_with_ignored(&config).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_str_invalid_toml() {
        let result = SiteConfig::from_str("[site\ntitle = \"Notes\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_fields_are_collected() {
        let (_, ignored) =
            SiteConfig::parse_with_ignored("[site]\ntitle = \"x\"\ncolour = \"red\"").unwrap();
        assert_eq!(ignored, vec!["site.colour".to_string()]);
    }

    #[test]
    fn test_redirect_specs_in_key_order() {
        let config = test_parse_config(
            "[redirects]\n\"/notes/demo/\" = \"/demo/\"\n\"/a\" = \"/b\"",
        );
        let specs = config.redirect_specs();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].old.as_str(), "/a/");
        assert_eq!(specs[0].new.as_str(), "/b/");
        assert_eq!(specs[1].old.as_str(), "/notes/demo/");
    }

    #[test]
    fn test_reload_redirects_keeps_other_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notemap.toml");
        fs::write(&path, "[site]\ntitle = \"Notes\"\n[redirects]\n\"/a/\" = \"/b/\"").unwrap();

        let mut config = test_parse_config("[build]\ncontent = \"notes\"");
        config.finalize(dir.path());
        config.config_path = path.clone();

        let reloaded = config.reload_redirects().unwrap();
        assert_eq!(reloaded.redirects.get("/a/").map(String::as_str), Some("/b/"));
        assert_eq!(reloaded.build.content, config.build.content);
        assert!(reloaded.build.content.ends_with("notes"));

        fs::write(&path, "[redirects]\n\"/a/\" = \"\"").unwrap();
        assert!(config.reload_redirects().is_err());
        fs::write(&path, "[redirects\n").unwrap();
        assert!(config.reload_redirects().is_err());
    }

    #[test]
    fn test_finalize_resolves_paths() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();

        let mut config = test_parse_config("");
        config.finalize(dir.path());

        assert!(config.build.content.is_absolute());
        assert!(config.build.content.ends_with("docs"));
        assert!(config.build.output.ends_with(".notemap"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let dir = TempDir::new().unwrap();
        let mut config = test_parse_config(
            "[site]\nbase = \"notes\"\n[build]\nnot_found = \"404.html\"\n[redirects]\n\"/old/\" = \"\"",
        );
        config.finalize(dir.path());

        let err = config.validate().unwrap_err();
        let Some(ConfigError::Diagnostics(diag)) = err.downcast_ref::<ConfigError>() else {
            panic!("expected diagnostics, got {err}");
        };
        // base, not_found, missing content dir, empty redirect target
        assert_eq!(diag.len(), 4);
    }

    #[test]
    fn test_root_relative() {
        let mut config = SiteConfig::default();
        config.root = PathBuf::from("/site");
        assert_eq!(
            config.root_relative("/site/docs/vue/a.md"),
            PathBuf::from("docs/vue/a.md")
        );
        assert_eq!(config.root_relative("/other"), PathBuf::from("/other"));
    }
}
