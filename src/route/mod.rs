//! Route and redirect tables.
//!
//! ```text
//! Vec<Document> ──► RouteTable ─────────┐
//!                                       ├─► RouteSnapshot ──► routes.json
//! [redirects] + aliases ──► RedirectTable┘        │
//!                                                 ▼
//!                                    RouteStore (ArcSwap) ──► resolve()
//! ```
//!
//! Every key is a canonical [`UrlPath`](crate::core::UrlPath), so the same
//! normalization applies when tables are built and when requests are looked up.

mod conflict;
mod error;
mod redirect;
mod resolve;
mod snapshot;
mod store;
mod table;

pub use conflict::print_conflicts;
pub use error::RouteError;
pub use redirect::{BuildWarning, RedirectSpec};
pub use resolve::Resolution;
pub use snapshot::RouteSnapshot;
pub use store::{RouteStore, SwapOutcome};
