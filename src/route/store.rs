//! Atomically swappable snapshot holder for the route service.

use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use super::snapshot::{Fingerprint, RouteSnapshot};

/// Result of offering a rebuilt snapshot to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    Swapped,
    Unchanged,
}

/// Shared, lock-free readable route snapshot.
///
/// Readers call [`RouteStore::load`] and keep the returned `Arc` for the
/// whole request. Writers go through [`RouteStore::rebuild`], which runs one
/// at a time and replaces the snapshot in a single atomic swap.
pub struct RouteStore {
    current: ArcSwap<RouteSnapshot>,
    fingerprint: Mutex<Fingerprint>,
}

impl RouteStore {
    pub fn new(snapshot: RouteSnapshot) -> Self {
        let fingerprint = snapshot.fingerprint();
        Self {
            current: ArcSwap::from_pointee(snapshot),
            fingerprint: Mutex::new(fingerprint),
        }
    }

    /// Current snapshot.
    pub fn load(&self) -> Arc<RouteSnapshot> {
        self.current.load_full()
    }

    /// Run `build` and swap in its result if it differs from the current one.
    ///
    /// Rebuilds are serialized. On error the previous snapshot stays active.
    pub fn rebuild<E>(
        &self,
        build: impl FnOnce() -> Result<RouteSnapshot, E>,
    ) -> Result<SwapOutcome, E> {
        let mut fingerprint = self.fingerprint.lock();
        let snapshot = build()?;
        let next = snapshot.fingerprint();
        if next == *fingerprint {
            return Ok(SwapOutcome::Unchanged);
        }
        self.current.store(Arc::new(snapshot));
        *fingerprint = next;
        Ok(SwapOutcome::Swapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Document;
    use crate::core::UrlPath;
    use crate::route::RouteError;
    use std::thread;

    fn snapshot(title: &str) -> RouteSnapshot {
        let not_found = UrlPath::from_page("/404.html");
        let docs = vec![
            Document::new("a.md", UrlPath::from_page("/a/"), title),
            Document::new("404.md", not_found.clone(), ""),
        ];
        RouteSnapshot::build(&docs, &[], &not_found).unwrap().0
    }

    fn title(store: &RouteStore) -> String {
        store.load().routes.get_str("/a/").unwrap().meta.title.clone()
    }

    #[test]
    fn test_swap_and_unchanged() {
        let store = RouteStore::new(snapshot("one"));

        let outcome = store.rebuild(|| Ok::<_, RouteError>(snapshot("one")));
        assert_eq!(outcome.unwrap(), SwapOutcome::Unchanged);

        let outcome = store.rebuild(|| Ok::<_, RouteError>(snapshot("two")));
        assert_eq!(outcome.unwrap(), SwapOutcome::Swapped);
        assert_eq!(title(&store), "two");
    }

    #[test]
    fn test_failed_rebuild_keeps_previous() {
        let store = RouteStore::new(snapshot("one"));
        let result = store.rebuild(|| {
            Err(RouteError::MissingNotFound(UrlPath::from_page("/404.html")))
        });
        assert!(result.is_err());
        assert_eq!(title(&store), "one");
    }

    #[test]
    fn test_readers_see_whole_snapshots() {
        let store = Arc::new(RouteStore::new(snapshot("one")));
        let held = store.load();

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store
                    .rebuild(|| Ok::<_, RouteError>(snapshot("two")))
                    .unwrap()
            })
        };
        writer.join().unwrap();

        // A snapshot taken before the swap is unaffected by it
        assert_eq!(held.routes.get_str("/a/").unwrap().meta.title, "one");
        assert_eq!(title(&store), "two");
    }
}
