//! Collections and sidebars: which collection owns a page, and whether
//! every authored sidebar/navbar link still lands on a page.
//!
//! Link problems are warnings. They never block a build or a route swap.

mod registry;
mod report;

pub use registry::CollectionRegistry;
