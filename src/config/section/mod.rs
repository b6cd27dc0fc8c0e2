//! Configuration section definitions.
//!
//! Each module corresponds to a section in `notemap.toml`:
//!
//! | Module       | TOML Section      | Purpose                              |
//! |--------------|-------------------|--------------------------------------|
//! | `build`      | `[build]`         | Content scan and route table output  |
//! | `collection` | `[[collections]]` | Document groups and sidebars         |
//! | `navbar`     | `[[navbar]]`      | Top navigation                       |
//! | `serve`      | `[serve]`         | Route service                        |
//! | `site`       | `[site]`          | Site info and deployment base        |
//!
//! `[redirects]` is a plain `old = new` string table held on `SiteConfig`.

pub mod build;
pub mod collection;
mod navbar;
mod serve;
mod site;

pub use build::BuildSectionConfig;
pub use collection::{CollectionConfig, SidebarItem, validate_collections};
pub use navbar::NavItem;
pub use serve::ServeConfig;
pub use site::SiteSectionConfig;
