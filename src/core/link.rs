//! Authored link classification (sidebar, navbar).

/// Syntactic kind of an authored link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind<'a> {
    /// Has a URL scheme (`https://`, `mailto:`) or is scheme-relative (`//cdn`)
    External(&'a str),
    /// Pure anchor (`#section`) on the current page
    Fragment(&'a str),
    /// Site-root path (`/vue/guide`)
    SiteRoot(&'a str),
    /// Relative to the owning collection (`guide`, `./guide.md`)
    Relative(&'a str),
}

impl<'a> LinkKind<'a> {
    pub fn parse(link: &'a str) -> Self {
        let link = link.trim();
        if is_external_link(link) || link.starts_with("//") {
            Self::External(link)
        } else if let Some(anchor) = link.strip_prefix('#') {
            Self::Fragment(anchor)
        } else if link.starts_with('/') {
            Self::SiteRoot(link)
        } else {
            Self::Relative(link.strip_prefix("./").unwrap_or(link))
        }
    }
}

/// Check if a link carries a URL scheme (`http:`, `mailto:`, `tel:`).
///
/// A scheme is at least one character of ASCII alphanumerics or `+-.`
/// before the first colon.
pub fn is_external_link(link: &str) -> bool {
    link.find(':').is_some_and(|pos| {
        pos > 0
            && link[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_external_link() {
        assert!(is_external_link("https://github.com/golang/go"));
        assert!(is_external_link("mailto:user@example.com"));
        assert!(!is_external_link("/vue/"));
        assert!(!is_external_link("guide.md"));
        assert!(!is_external_link(":odd"));
    }

    #[test]
    fn test_parse() {
        assert!(matches!(LinkKind::parse("https://v2.vuejs.org"), LinkKind::External(_)));
        assert!(matches!(LinkKind::parse("//cdn.example.com/x"), LinkKind::External(_)));
        assert!(matches!(LinkKind::parse("#install"), LinkKind::Fragment("install")));
        assert!(matches!(LinkKind::parse(" /go/ "), LinkKind::SiteRoot("/go/")));
        assert!(matches!(LinkKind::parse("./basics.md"), LinkKind::Relative("basics.md")));
        assert!(matches!(LinkKind::parse("basics"), LinkKind::Relative("basics")));
    }
}
