//! Core types - pure abstractions shared across the codebase.

mod link;
mod state;
mod url;

pub use link::LinkKind;
pub use state::{
    begin_rebuild, end_rebuild, is_rebuilding, is_shutdown, register_server,
    setup_shutdown_handler,
};
pub use url::UrlPath;
