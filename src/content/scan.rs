//! Content tree scanning (pure, reads the filesystem only).

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use jwalk::WalkDir;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use thiserror::Error;

use super::{Document, Frontmatter, is_document};
use crate::config::BuildSectionConfig;
use crate::core::UrlPath;
use crate::debug;

/// Source path recorded for the synthetic not-found document.
pub const BUILTIN_NOT_FOUND_SOURCE: &str = "<builtin>/404.md";

/// Errors while scanning the content tree.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("content directory `{0}` not found")]
    MissingContent(PathBuf),

    #[error("failed to walk content directory")]
    Walk(#[from] jwalk::Error),

    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid frontmatter in `{0}`")]
    Frontmatter(PathBuf, #[source] toml::de::Error),
}

/// Scan the content directory into documents, in sorted path order.
///
/// Hidden entries and directories named in `build.ignore` are skipped.
/// When `builtin_not_found` is set and no document claims the not-found
/// path, a synthetic not-found document is appended.
pub fn scan_documents(build: &BuildSectionConfig) -> Result<Vec<Document>, ScanError> {
    let content = &build.content;
    if !content.is_dir() {
        return Err(ScanError::MissingContent(content.clone()));
    }

    let filter = Arc::new(build.clone());
    let walker = WalkDir::new(content)
        .sort(true)
        .skip_hidden(true)
        .process_read_dir(move |_, _, _, children| {
            children.retain(|entry| match entry {
                Ok(entry) => {
                    !(entry.file_type().is_dir()
                        && entry
                            .file_name()
                            .to_str()
                            .is_some_and(|name| filter.is_ignored(name)))
                }
                Err(_) => true,
            });
        });

    let mut documents = Vec::new();
    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_document(&path) {
            continue;
        }
        let relative = path.strip_prefix(content).unwrap_or(&path).to_path_buf();
        documents.push(read_document(&path, relative)?);
    }

    let not_found = build.not_found_url();
    if build.builtin_not_found && !documents.iter().any(|d| d.canonical == not_found) {
        debug!("scan"; "adding builtin not-found page at {}", not_found);
        documents.push(Document::new(BUILTIN_NOT_FOUND_SOURCE, not_found, ""));
    }

    Ok(documents)
}

/// Read one markdown file into a document.
fn read_document(path: &Path, relative: PathBuf) -> Result<Document, ScanError> {
    let source = fs::read_to_string(path).map_err(|e| ScanError::Io(path.to_path_buf(), e))?;

    let (meta, body) = match Frontmatter::extract(&source) {
        Ok(Some((meta, body))) => (meta, body),
        Ok(None) => (Frontmatter::default(), source.as_str()),
        Err(e) => return Err(ScanError::Frontmatter(path.to_path_buf(), e)),
    };

    let canonical = match meta.permalink.as_deref() {
        Some(permalink) => UrlPath::from_page(permalink),
        None => canonical_from_source(&relative),
    };
    let title = meta
        .title
        .filter(|t| !t.is_empty())
        .or_else(|| first_heading(body))
        .unwrap_or_default();
    let aliases = meta
        .aliases
        .iter()
        .map(|alias| UrlPath::from_page(alias))
        .collect();

    debug!("scan"; "{} -> {}", relative.display(), canonical);
    Ok(Document::new(relative, canonical, title).with_aliases(aliases))
}

/// Derive the canonical path from a path relative to the content root.
///
/// `README.md`/`index.md` map to their directory, `x.md` to `/x.html`.
/// File names are used verbatim, so `C#.md` becomes `/C#.html`.
fn canonical_from_source(relative: &Path) -> UrlPath {
    let joined = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");
    UrlPath::from_markdown(&format!("/{joined}"))
}

/// Text of the first level-1 heading.
fn first_heading(markdown: &str) -> Option<String> {
    let mut in_heading = false;
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => in_heading = true,
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                let title = text.trim();
                return (!title.is_empty()).then(|| title.to_string());
            }
            Event::Text(t) | Event::Code(t) if in_heading => text.push_str(&t),
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn build_config(content: &Path) -> BuildSectionConfig {
        BuildSectionConfig {
            content: content.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_canonical_from_source() {
        let cases = [
            ("README.md", "/"),
            ("vue/README.md", "/vue/"),
            ("vue/index.md", "/vue/"),
            ("vue/guide.md", "/vue/guide.html"),
            ("404.md", "/404.html"),
            ("Guide.MD", "/Guide.html"),
            ("vue/Readme.MD", "/vue/"),
        ];
        for (source, expected) in cases {
            assert_eq!(canonical_from_source(Path::new(source)).as_str(), expected);
        }
    }

    #[test]
    fn test_first_heading() {
        assert_eq!(
            first_heading("intro\n\n## Sub\n\n# Go `1.22` 入门\n").as_deref(),
            Some("Go 1.22 入门")
        );
        assert_eq!(first_heading("## only h2"), None);
    }

    #[test]
    fn test_scan_documents() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "README.md", "# 首页");
        write(dir.path(), "blog/README.md", "---\ntitle: 博客\n---\n# ignored");
        write(
            dir.path(),
            "notes/demo.md",
            "---\npermalink: /demo/\naliases: /notes/demo/\n---\n",
        );
        write(dir.path(), "notes/image.png", "");
        write(dir.path(), ".vuepress/config.md", "# theme");
        write(dir.path(), "node_modules/pkg/README.md", "# dep");
        write(dir.path(), ".hidden.md", "# hidden");

        let docs = scan_documents(&build_config(dir.path())).unwrap();
        let canonicals: Vec<_> = docs.iter().map(|d| d.canonical.as_str()).collect();
        assert_eq!(canonicals, vec!["/", "/blog/", "/demo/", "/404.html"]);

        assert_eq!(docs[0].title, "首页");
        assert_eq!(docs[1].title, "博客");
        assert_eq!(docs[1].source, Path::new("blog").join("README.md"));
        assert_eq!(docs[2].aliases, vec![UrlPath::from_page("/notes/demo/")]);
        assert_eq!(docs[3].source, Path::new(BUILTIN_NOT_FOUND_SOURCE));
    }

    #[test]
    fn test_file_names_keep_special_characters() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "C#.md", "# C#");
        write(dir.path(), "C/README.md", "# C");
        write(dir.path(), "为什么?.md", "");
        write(dir.path(), "50%25.md", "");
        write(dir.path(), "Guide.MD", "");

        let docs = scan_documents(&build_config(dir.path())).unwrap();
        let mut canonicals: Vec<_> = docs.iter().map(|d| d.canonical.as_str()).collect();
        canonicals.sort_unstable();
        assert_eq!(
            canonicals,
            vec!["/404.html", "/50%25.html", "/C#.html", "/C/", "/Guide.html", "/为什么?.html"]
        );

        let csharp = docs.iter().find(|d| d.title == "C#").unwrap();
        assert_eq!(csharp.canonical, UrlPath::from_browser("/C%23.html"));
        assert_eq!(csharp.canonical.to_encoded(), "/C%23.html");
    }

    #[test]
    fn test_authored_not_found_suppresses_builtin() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "404.md", "# Not here");

        let docs = scan_documents(&build_config(dir.path())).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].canonical.as_str(), "/404.html");
        assert_eq!(docs[0].title, "Not here");
    }

    #[test]
    fn test_builtin_not_found_disabled() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.md", "");

        let mut config = build_config(dir.path());
        config.builtin_not_found = false;
        let docs = scan_documents(&config).unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_missing_content_dir() {
        let dir = TempDir::new().unwrap();
        let err = scan_documents(&build_config(&dir.path().join("nope"))).unwrap_err();
        assert!(matches!(err, ScanError::MissingContent(_)));
    }

    #[test]
    fn test_invalid_frontmatter_names_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "bad.md", "+++\ntitle = \n+++\n");

        let err = scan_documents(&build_config(dir.path())).unwrap_err();
        assert!(matches!(err, ScanError::Frontmatter(ref path, _) if path.ends_with("bad.md")));
    }
}
