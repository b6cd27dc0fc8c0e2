//! URL path type for canonical route keys.
//!
//! - Internal representation: Always decoded (human-readable)
//! - Browser boundary: Decode on input (exactly once), encode on output
//!
//! Every route, redirect source and redirect target goes through the same
//! normalization, so a lookup key is built exactly the way stored keys were.

use std::borrow::Borrow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Decoded, canonical URL path.
///
/// Invariants:
/// - Always decoded (no percent-encoding)
/// - Always starts with `/`
/// - Directory paths end with `/`, file paths end with a segment that has an
///   extension (`/404.html`)
/// - A trailing `index.html` is folded into the directory form
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UrlPath(Arc<str>);

impl UrlPath {
    /// Create from browser URL (decode percent-encoding, strip query string).
    ///
    /// This is the only place percent-encoding is decoded. Dot segments are
    /// resolved on the encoded form before decoding.
    pub fn from_browser(encoded: &str) -> Self {
        use percent_encoding::percent_decode_str;
        let path = Self::request_path(encoded);
        let decoded = percent_decode_str(&path)
            .decode_utf8()
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| path.clone());
        Self::from_page(&decoded)
    }

    /// Create a canonical page path from decoded text.
    ///
    /// The input is taken literally: `?`, `#` and `%` are ordinary characters.
    /// `blog` -> `/blog/`, `/a//b` -> `/a/b/`, `/demo/index.html` -> `/demo/`,
    /// `/404.html` stays as is.
    pub fn from_page(decoded: &str) -> Self {
        let trimmed = decoded.trim();

        let mut segments: Vec<&str> = Vec::new();
        for segment in trimmed.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                s => segments.push(s),
            }
        }
        let Some((last, parents)) = segments.split_last() else {
            return Self::root();
        };

        if *last == "index.html" {
            return Self::from_segments(parents, true);
        }

        let trailing_dir = matches!(trimmed.rsplit('/').next(), Some("" | "." | ".."));
        let is_dir = trailing_dir || !has_extension(last);
        Self::from_segments(&segments, is_dir)
    }

    /// Create a page path from an authored link (sidebar, navbar, frontmatter).
    ///
    /// Query string and fragment are dropped, then markdown file links map to
    /// the page they produce (see [`UrlPath::from_markdown`]).
    pub fn from_link(link: &str) -> Self {
        let path = link.split(['?', '#']).next().unwrap_or(link).trim();
        Self::from_markdown(path)
    }

    /// Map a decoded path naming a markdown file to the page it produces.
    ///
    /// `/go/index.md` -> `/go/`, `/a/README.MD` -> `/a/`, `/a/b.md` -> `/a/b.html`.
    /// Paths without a `.md` extension go through [`UrlPath::from_page`].
    pub fn from_markdown(path: &str) -> Self {
        let Some(stem) = strip_markdown_ext(path) else {
            return Self::from_page(path);
        };
        let (dir, name) = match stem.rfind('/') {
            Some(idx) => (&stem[..=idx], &stem[idx + 1..]),
            None => ("", stem),
        };
        if name.eq_ignore_ascii_case("index") || name.eq_ignore_ascii_case("readme") {
            Self::from_page(&format!("{dir}/"))
        } else {
            Self::from_page(&format!("{stem}.html"))
        }
    }

    /// The site root `/`.
    pub fn root() -> Self {
        Self(Arc::from("/"))
    }

    fn from_segments(segments: &[&str], is_dir: bool) -> Self {
        if segments.is_empty() {
            return Self::root();
        }
        let joined = segments.join("/");
        if is_dir {
            Self(Arc::from(format!("/{joined}/")))
        } else {
            Self(Arc::from(format!("/{joined}")))
        }
    }

    /// Path part of a request target, still encoded, with dot segments resolved.
    fn request_path(encoded: &str) -> String {
        // Use a dummy base URL to parse the path
        static BASE: std::sync::OnceLock<Option<url::Url>> = std::sync::OnceLock::new();
        let base = BASE.get_or_init(|| url::Url::parse("http://x").ok());

        // `//host/...` would otherwise parse as a scheme-relative URL
        let collapsed = collapse_slashes(encoded.trim());
        match base.as_ref().map(|base| base.join(&collapsed)) {
            Some(Ok(parsed)) => parsed.path().to_string(),
            // Fallback to simple split if url parsing fails
            _ => collapsed
                .split(['?', '#'])
                .next()
                .unwrap_or(&collapsed)
                .to_string(),
        }
    }

    /// Get the decoded URL path as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Encode for browser (percent-encode non-ASCII and special characters).
    pub fn to_encoded(&self) -> String {
        use percent_encoding::utf8_percent_encode;
        self.0
            .split('/')
            .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Check if path starts with the given prefix.
    #[inline]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Check if this is a directory path (ends with `/`).
    #[inline]
    pub fn is_dir(&self) -> bool {
        self.0.ends_with('/')
    }

    /// Join a relative link under this directory path.
    ///
    /// `/vue/` + `guide` -> `/vue/guide/`; absolute links are returned as is.
    pub fn join_link(&self, link: &str) -> Self {
        if link.starts_with('/') {
            return Self::from_link(link);
        }
        let base = if self.is_dir() {
            self.as_str().to_string()
        } else {
            match self.0.rfind('/') {
                Some(idx) => self.0[..=idx].to_string(),
                None => "/".to_string(),
            }
        };
        Self::from_link(&format!("{base}{link}"))
    }

    /// Strip a site base (`/short-note/`) from this path.
    ///
    /// Returns `None` if the path lies outside the base.
    pub fn strip_base(&self, base: &str) -> Option<Self> {
        let base = base.trim_end_matches('/');
        if base.is_empty() {
            return Some(self.clone());
        }
        let rest = self.0.strip_prefix(base)?;
        if rest.is_empty() {
            return Some(Self::root());
        }
        rest.starts_with('/').then(|| Self::from_page(rest))
    }

    /// Encoded browser URL under a site base (`/short-note/`).
    pub fn with_base(&self, base: &str) -> String {
        let base = base.trim_end_matches('/');
        format!("{base}{}", self.to_encoded())
    }
}

/// Characters escaped inside a path segment (RFC 3986 unreserved stay as is).
const SEGMENT: &percent_encoding::AsciiSet = &percent_encoding::NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;
    for c in path.chars() {
        if c == '/' && prev_slash {
            continue;
        }
        prev_slash = c == '/';
        out.push(c);
    }
    out
}

/// `x.md`/`x.MD` -> `x`; `None` for any other extension.
fn strip_markdown_ext(path: &str) -> Option<&str> {
    let idx = path.len().checked_sub(3)?;
    let ext = path.get(idx..)?;
    ext.eq_ignore_ascii_case(".md").then(|| &path[..idx])
}

/// Whether a path segment carries a file extension (`404.html`, not `.hidden`).
fn has_extension(segment: &str) -> bool {
    segment
        .rfind('.')
        .is_some_and(|idx| idx > 0 && idx + 1 < segment.len())
}

impl std::fmt::Display for UrlPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for UrlPath {
    fn default() -> Self {
        Self::root()
    }
}

impl AsRef<str> for UrlPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for UrlPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for UrlPath {
    fn from(s: String) -> Self {
        Self::from_page(&s)
    }
}

impl From<&str> for UrlPath {
    fn from(s: &str) -> Self {
        Self::from_page(s)
    }
}

impl PartialEq<str> for UrlPath {
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for UrlPath {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl Serialize for UrlPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UrlPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_page(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_browser_chinese() {
        let url = UrlPath::from_browser("/posts/%E4%B8%AD%E6%96%87/");
        assert_eq!(url.as_str(), "/posts/中文/");
    }

    #[test]
    fn test_from_browser_space() {
        let url = UrlPath::from_browser("/posts/hello%20world/");
        assert_eq!(url.as_str(), "/posts/hello world/");
    }

    #[test]
    fn test_from_browser_strips_query() {
        let url = UrlPath::from_browser("/blog/?page=2");
        assert_eq!(url.as_str(), "/blog/");
    }

    #[test]
    fn test_from_page_adds_slashes() {
        assert_eq!(UrlPath::from_page("posts/hello").as_str(), "/posts/hello/");
        assert_eq!(UrlPath::from_page("/blog").as_str(), "/blog/");
        assert_eq!(UrlPath::from_page("").as_str(), "/");
        assert_eq!(UrlPath::from_page("/").as_str(), "/");
    }

    #[test]
    fn test_from_page_keeps_file_paths() {
        assert_eq!(UrlPath::from_page("/404.html").as_str(), "/404.html");
        assert_eq!(
            UrlPath::from_page("/old/path.html").as_str(),
            "/old/path.html"
        );
    }

    #[test]
    fn test_from_page_folds_index_html() {
        assert_eq!(UrlPath::from_page("/demo/index.html").as_str(), "/demo/");
        assert_eq!(UrlPath::from_page("/index.html").as_str(), "/");
    }

    #[test]
    fn test_from_page_collapses_slashes() {
        assert_eq!(UrlPath::from_page("//a///b").as_str(), "/a/b/");
    }

    #[test]
    fn test_from_browser_decodes_once() {
        assert_eq!(UrlPath::from_browser("/a%2541/").as_str(), "/a%41/");
        assert_ne!(UrlPath::from_browser("/a%2541/"), UrlPath::from_page("/aA/"));
        assert_eq!(UrlPath::from_browser("/50%2525.html").as_str(), "/50%25.html");
        assert_eq!(UrlPath::from_browser("/C%23.html#top").as_str(), "/C#.html");
        assert_eq!(
            UrlPath::from_browser("/%E4%B8%BA%E4%BB%80%E4%B9%88%3F.html?x=1").as_str(),
            "/为什么?.html"
        );
    }

    #[test]
    fn test_from_browser_dot_segments() {
        assert_eq!(UrlPath::from_browser("/a/./b/../c/").as_str(), "/a/c/");
        assert_eq!(UrlPath::from_browser("/../blog/").as_str(), "/blog/");
    }

    #[test]
    fn test_from_page_is_literal() {
        assert_eq!(UrlPath::from_page("/C#.html").as_str(), "/C#.html");
        assert_eq!(UrlPath::from_page("/为什么?/").as_str(), "/为什么?/");
        assert_eq!(UrlPath::from_page("/50%25.html").as_str(), "/50%25.html");
        assert_eq!(UrlPath::from_page("/a/b/..").as_str(), "/a/");
    }

    #[test]
    fn test_hidden_segment_is_not_extension() {
        assert_eq!(UrlPath::from_page("/a/.well-known").as_str(), "/a/.well-known/");
    }

    #[test]
    fn test_from_link_markdown() {
        assert_eq!(UrlPath::from_link("/go/index.md").as_str(), "/go/");
        assert_eq!(UrlPath::from_link("rust/README.md").as_str(), "/rust/");
        assert_eq!(UrlPath::from_link("/a/b.md").as_str(), "/a/b.html");
        assert_eq!(UrlPath::from_link("/vue/iorgmo8s/").as_str(), "/vue/iorgmo8s/");
        assert_eq!(UrlPath::from_link("/go/index.md#top").as_str(), "/go/");
        assert_eq!(UrlPath::from_link("/Guide.MD").as_str(), "/Guide.html");
        assert_eq!(UrlPath::from_link("/docs/README.Md").as_str(), "/docs/");
    }

    #[test]
    fn test_from_markdown_keeps_special_characters() {
        assert_eq!(UrlPath::from_markdown("/C#.md").as_str(), "/C#.html");
        assert_eq!(UrlPath::from_markdown("/为什么?.md").as_str(), "/为什么?.html");
        assert_eq!(UrlPath::from_markdown("/50%25.md").as_str(), "/50%25.html");
        assert_eq!(UrlPath::from_markdown("/C#/README.md").as_str(), "/C#/");
    }

    #[test]
    fn test_join_link() {
        let prefix = UrlPath::from_page("/vue/");
        assert_eq!(prefix.join_link("状态管理").as_str(), "/vue/状态管理/");
        assert_eq!(prefix.join_link("/rust/x/").as_str(), "/rust/x/");
        assert_eq!(prefix.join_link("guide.md").as_str(), "/vue/guide.html");

        let file = UrlPath::from_page("/a/page.html");
        assert_eq!(file.join_link("other").as_str(), "/a/other/");
    }

    #[test]
    fn test_strip_base() {
        let url = UrlPath::from_page("/short-note/blog/");
        assert_eq!(
            url.strip_base("/short-note/"),
            Some(UrlPath::from_page("/blog/"))
        );
        assert_eq!(
            UrlPath::from_page("/short-note/").strip_base("/short-note/"),
            Some(UrlPath::root())
        );
        assert_eq!(UrlPath::from_page("/other/").strip_base("/short-note/"), None);
        assert_eq!(
            UrlPath::from_page("/short-notes/").strip_base("/short-note/"),
            None
        );
        assert_eq!(url.strip_base("/"), Some(url.clone()));
    }

    #[test]
    fn test_with_base() {
        let url = UrlPath::from_page("/blog/");
        assert_eq!(url.with_base("/short-note/"), "/short-note/blog/");
        assert_eq!(url.with_base("/"), "/blog/");
        assert_eq!(
            UrlPath::from_page("/笔记/").with_base("/notes/"),
            "/notes/%E7%AC%94%E8%AE%B0/"
        );
    }

    #[test]
    fn test_to_encoded() {
        let url = UrlPath::from_page("/posts/中文/");
        assert_eq!(url.to_encoded(), "/posts/%E4%B8%AD%E6%96%87/");
        assert_eq!(UrlPath::from_page("/404.html").to_encoded(), "/404.html");
        assert_eq!(UrlPath::from_page("/a b/x-y_z/").to_encoded(), "/a%20b/x-y_z/");
    }

    #[test]
    fn test_hash() {
        use rustc_hash::FxHashSet;

        let mut set = FxHashSet::default();
        set.insert(UrlPath::from_page("/posts/hello/"));
        set.insert(UrlPath::from_page("/posts/hello"));

        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_serialize_deserialize() {
        let url = UrlPath::from_page("/posts/中文/");
        let json = serde_json::to_string(&url).unwrap();
        assert_eq!(json, r#""/posts/中文/""#);

        let parsed: UrlPath = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, url);

        for raw in ["/a%41/", "/50%25.html", "/C#.html", "/为什么?/"] {
            let url = UrlPath::from_page(raw);
            let json = serde_json::to_string(&url).unwrap();
            let parsed: UrlPath = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed.as_str(), raw);
        }
    }

    #[test]
    fn test_display() {
        let url = UrlPath::from_page("/posts/hello/");
        assert_eq!(format!("{}", url), "/posts/hello/");
    }
}
