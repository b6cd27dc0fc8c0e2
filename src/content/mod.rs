//! Content scanning: markdown files to `Document` records.
//!
//! ```text
//! docs/README.md          -> /            (title from first `# heading`)
//! docs/vue/README.md      -> /vue/
//! docs/vue/guide.md       -> /vue/guide.html
//! docs/notes/demo.md      -> /demo/       (frontmatter `permalink`)
//! ```

mod document;
mod frontmatter;
mod scan;

use std::path::Path;

pub use document::Document;
use frontmatter::Frontmatter;
pub use scan::{BUILTIN_NOT_FOUND_SOURCE, scan_documents};

/// Whether a path is a markdown document.
pub fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}
