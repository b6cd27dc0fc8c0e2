//! Link integrity report for sidebars and the navbar.

use std::collections::BTreeMap;
use std::fmt;

use owo_colors::Style;

use crate::core::UrlPath;
use crate::logger::paint;
use crate::utils::plural_s;

/// What is wrong with an authored link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkIssue {
    /// Resolves to the not-found page.
    Dangling { resolved: UrlPath },
    /// Leaf entry with no link, or an empty link.
    Empty,
    /// Works only through a redirect; should point at `target`.
    Redirected { target: UrlPath },
}

impl fmt::Display for LinkIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dangling { resolved } => write!(f, "no page at {resolved}"),
            Self::Empty => f.write_str("empty link"),
            Self::Redirected { target } => write!(f, "redirects to {target}"),
        }
    }
}

/// A single problem: the entry text, its authored link, and the issue.
#[derive(Debug, Clone)]
pub struct LinkProblem {
    pub text: String,
    pub link: String,
    pub issue: LinkIssue,
}

/// Problems grouped by collection prefix (or `navbar`).
#[derive(Debug, Default)]
pub struct LinkReport {
    groups: BTreeMap<String, Vec<LinkProblem>>,
}

impl LinkReport {
    pub fn add(&mut self, group: &str, text: &str, link: &str, issue: LinkIssue) {
        self.groups
            .entry(group.to_string())
            .or_default()
            .push(LinkProblem {
                text: text.to_string(),
                link: link.to_string(),
                issue,
            });
    }

    pub fn groups(&self) -> &BTreeMap<String, Vec<LinkProblem>> {
        &self.groups
    }

    pub fn issue_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.groups.is_empty()
    }

    /// Print the grouped report to stderr.
    pub fn print(&self) {
        if self.is_clean() {
            return;
        }
        eprintln!();

        let group_count = self.groups.len();
        let issue_count = self.issue_count();
        eprintln!(
            "{} {}",
            paint("links", Style::new().yellow().bold()),
            paint(
                format!(
                    "({group_count} group{}, {issue_count} issue{})",
                    plural_s(group_count),
                    plural_s(issue_count)
                ),
                Style::new().dimmed()
            )
        );

        for (group, problems) in &self.groups {
            eprintln!("{}{}{}", paint("[", Style::new().dimmed()), paint(group, Style::new().cyan()), paint("]", Style::new().dimmed()));
            for p in problems {
                if p.link.is_empty() {
                    eprintln!("{} {} {}", paint("→", Style::new().red()), p.text, paint(&p.issue, Style::new().dimmed()));
                } else {
                    eprintln!("{} {} ({}) {}", paint("→", Style::new().red()), p.text, p.link, paint(&p.issue, Style::new().dimmed()));
                }
            }
        }
    }
}

impl fmt::Display for LinkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.issue_count();
        if total == 0 {
            f.write_str(&paint("all links resolve", Style::new().green()))
        } else {
            write!(
                f,
                "{} {} {}",
                paint("found", Style::new().dimmed()),
                paint(total, Style::new().yellow().bold()),
                paint(format!("link issue{}", plural_s(total)), Style::new().dimmed())
            )
        }
    }
}
