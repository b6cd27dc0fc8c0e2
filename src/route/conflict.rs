//! Canonical path conflict detection.

use std::path::PathBuf;

use rustc_hash::FxHashMap;

use crate::content::Document;
use crate::core::UrlPath;
use crate::log;
use crate::utils::plural_s;

/// A URL conflict: multiple documents claim the same canonical path.
#[derive(Debug, Clone)]
pub struct UrlConflict {
    /// The conflicting URL
    pub url: UrlPath,
    /// All source paths claiming this URL, in scan order
    pub sources: Vec<PathBuf>,
}

/// Find every canonical path claimed by more than one document.
///
/// Conflicts are reported in the order their URL first appeared.
pub fn detect_conflicts(documents: &[Document]) -> Vec<UrlConflict> {
    let mut order: Vec<&UrlPath> = Vec::new();
    let mut sources: FxHashMap<&UrlPath, Vec<PathBuf>> = FxHashMap::default();

    for doc in documents {
        let claimed = sources.entry(&doc.canonical).or_default();
        if claimed.is_empty() {
            order.push(&doc.canonical);
        }
        claimed.push(doc.source.clone());
    }

    order
        .into_iter()
        .filter_map(|url| {
            let claimed = sources.remove(url)?;
            (claimed.len() > 1).then(|| UrlConflict {
                url: url.clone(),
                sources: claimed,
            })
        })
        .collect()
}

/// Print conflicts using the standard log format.
///
/// ```text
/// [error] canonical path conflicts (1 url, 2 sources)
/// [url] /go/ (2 sources)
///   - go/README.md
///   - go.md
/// ```
pub fn print_conflicts(conflicts: &[UrlConflict]) {
    if conflicts.is_empty() {
        return;
    }

    let total_sources: usize = conflicts.iter().map(|c| c.sources.len()).sum();
    log!("error"; "canonical path conflicts ({} url{}, {} source{})",
        conflicts.len(), plural_s(conflicts.len()),
        total_sources, plural_s(total_sources));

    for conflict in conflicts {
        eprintln!();
        log!("url"; "{} ({} source{})", conflict.url, conflict.sources.len(), plural_s(conflict.sources.len()));
        for source in &conflict.sources {
            eprintln!("  - {}", source.display());
        }
    }
}

/// Format conflicts as a string (for error messages).
pub fn format_conflicts(conflicts: &[UrlConflict]) -> String {
    conflicts
        .iter()
        .map(|conflict| {
            let mut lines = vec![format!("{} ({})", conflict.url, conflict.sources.len())];
            for source in &conflict.sources {
                lines.push(format!("  - {}", source.display()));
            }
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(source: &str, canonical: &str) -> Document {
        Document::new(source, UrlPath::from_page(canonical), "")
    }

    #[test]
    fn test_no_conflicts() {
        let docs = vec![doc("a.md", "/a/"), doc("b.md", "/b/"), doc("c.md", "/c/")];
        assert!(detect_conflicts(&docs).is_empty());
    }

    #[test]
    fn test_three_way_conflict_keeps_every_source() {
        let docs = vec![
            doc("foo.md", "/foo/"),
            doc("bar.md", "/bar/"),
            doc("foo/README.md", "/foo/"),
            doc("x.md", "/foo"),
        ];
        let conflicts = detect_conflicts(&docs);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].url, UrlPath::from_page("/foo/"));
        assert_eq!(
            conflicts[0].sources,
            vec![
                PathBuf::from("foo.md"),
                PathBuf::from("foo/README.md"),
                PathBuf::from("x.md")
            ]
        );
    }

    #[test]
    fn test_conflicts_in_first_seen_order() {
        let docs = vec![
            doc("z1.md", "/z/"),
            doc("a1.md", "/a/"),
            doc("a2.md", "/a/"),
            doc("z2.md", "/z/"),
        ];
        let urls: Vec<_> = detect_conflicts(&docs)
            .into_iter()
            .map(|c| c.url.to_string())
            .collect();
        assert_eq!(urls, vec!["/z/", "/a/"]);
    }

    #[test]
    fn test_format_conflicts() {
        let conflicts = vec![UrlConflict {
            url: UrlPath::from_page("/foo/"),
            sources: vec![PathBuf::from("a.md"), PathBuf::from("b.md")],
        }];
        assert_eq!(format_conflicts(&conflicts), "/foo/ (2)\n  - a.md\n  - b.md");
    }
}
