//! Frontmatter extraction for markdown documents.
//!
//! Two block styles are recognized at the very top of a file:
//!
//! ```text
//! ---                          +++
//! title: Go 入门               title = "Go 入门"
//! permalink: /go/              permalink = "/go/"
//! aliases: /golang/, /go-old/  aliases = ["/golang/"]
//! ---                          +++
//! ```
//!
//! Only `title`, `permalink` and `aliases` matter for routing; every other
//! key is ignored.

use serde::Deserialize;

/// Routing-relevant frontmatter fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Frontmatter {
    pub title: Option<String>,
    pub permalink: Option<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub aliases: Vec<String>,
}

impl Frontmatter {
    /// Split `content` into frontmatter and body.
    ///
    /// Returns `Ok(None)` when the file has no frontmatter block.
    pub fn extract(content: &str) -> Result<Option<(Self, &str)>, toml::de::Error> {
        match detect_block(content) {
            Some((block, body, true)) => Ok(Some((toml::from_str(block)?, body))),
            Some((block, body, false)) => Ok(Some((parse_yaml_like(block), body))),
            None => Ok(None),
        }
    }
}

/// Detect a frontmatter block. Returns `(block, body, is_toml)`.
fn detect_block(content: &str) -> Option<(&str, &str, bool)> {
    let trimmed = content.trim_start_matches('\u{feff}').trim_start();

    for (fence, is_toml) in [("---", false), ("+++", true)] {
        if let Some(rest) = trimmed.strip_prefix(fence)
            && rest.starts_with(['\n', '\r'])
            && let Some(end) = rest.find(&format!("\n{fence}"))
        {
            let block = rest[..end].trim();
            let body = rest[end + 1 + fence.len()..].trim_start_matches(['\r', '\n']);
            return Some((block, body, is_toml));
        }
    }

    None
}

/// Parse `key: value` lines, with `a, b`, `[a, b]` and `- item` lists.
fn parse_yaml_like(block: &str) -> Frontmatter {
    let mut meta = Frontmatter::default();
    let mut list_key: Option<String> = None;

    for line in block.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(item) = trimmed.strip_prefix("- ") {
            if list_key.as_deref() == Some("aliases") {
                meta.aliases.push(unquote(item).to_string());
            }
            continue;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();
        list_key = value.is_empty().then(|| key.clone());

        match key.as_str() {
            "title" if !value.is_empty() => meta.title = Some(unquote(value).to_string()),
            "permalink" if !value.is_empty() => meta.permalink = Some(unquote(value).to_string()),
            "aliases" => meta.aliases.extend(split_list(value)),
            _ => {}
        }
    }

    meta
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|item| unquote(item.trim()).to_string())
        .filter(|item| !item.is_empty())
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    ['"', '\'']
        .into_iter()
        .find_map(|q| value.strip_prefix(q)?.strip_suffix(q))
        .unwrap_or(value)
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}
