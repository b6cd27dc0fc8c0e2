//! Route and snapshot error types.

use std::path::PathBuf;

use thiserror::Error;

use super::conflict::{UrlConflict, format_conflicts};
use crate::core::UrlPath;

/// Fatal route and redirect table build errors.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("duplicate canonical paths:\n{}", format_conflicts(.0))]
    DuplicateCanonical(Vec<UrlConflict>),

    #[error("missing not-found route `{0}`")]
    MissingNotFound(UrlPath),

    #[error("redirect `{old}` has conflicting targets `{first}` and `{second}`")]
    ConflictingRedirect {
        old: UrlPath,
        first: UrlPath,
        second: UrlPath,
    },

    #[error("redirect cycle: {}", format_cycle(.0))]
    RedirectCycle(Vec<UrlPath>),
}

/// Errors reading or writing the persisted snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error on `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed route snapshot `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("invalid route snapshot: {0}")]
    Route(#[from] RouteError),
}

fn format_cycle(cycle: &[UrlPath]) -> String {
    cycle
        .iter()
        .map(UrlPath::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
