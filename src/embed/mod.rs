//! Embedded static resources.
//!
//! - `template` - Template types for typed variable injection
//! - `build` - Build-time templates (redirect.html)
//!
//! ```ignore
//! use embed::build::{REDIRECT_HTML, RedirectVars};
//!
//! let html = REDIRECT_HTML.render(&RedirectVars { target_url: "/blog/", lang: "zh-CN" });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod build {
    use super::{Template, TemplateVars};

    /// Variables for redirect.html template.
    pub struct RedirectVars<'a> {
        /// Encoded absolute target, base prefix included.
        pub target_url: &'a str,
        pub lang: &'a str,
    }

    impl TemplateVars for RedirectVars<'_> {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__TARGET_URL__", &escape_attr(self.target_url))
                .replace("__LANG__", &escape_attr(self.lang))
        }
    }

    /// Redirect stub written for every old path.
    pub const REDIRECT_HTML: Template<RedirectVars<'static>> =
        Template::new(include_str!("build/redirect.html"));

    fn escape_attr(value: &str) -> String {
        value
            .replace('&', "&amp;")
            .replace('"', "&quot;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }
}
