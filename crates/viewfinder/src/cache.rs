//! Resolution memoization.
//!
//! [`ResolutionCache`] remembers which file a view request resolved to so the
//! filesystem search runs at most once per distinct request for the lifetime
//! of the owning service. It also memoizes two derived configuration values
//! that never change after first computation: the extension-point prefix and
//! the base directory's name.
//!
//! The cache is an explicitly constructed value owned by the service — not
//! ambient static state — so its scope is visible and each test can start
//! from a fresh one. Entries are never invalidated; a service that must pick
//! up files replacing an already-resolved view needs a new cache (or a new
//! service).
//!
//! Only successful resolutions are stored. A miss is re-searched on the next
//! request, so a view file created later in the process becomes discoverable.
//! Growth is unbounded but harmless: the key space is one entry per distinct
//! requested filename.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use once_cell::unsync::OnceCell;

/// Memo of resolved view paths plus two lazily-derived config values.
///
/// Interior mutability lets the terminal stringification operation populate
/// the cache through a shared reference; the service is single-threaded by
/// design, so a `RefCell` suffices.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    views: RefCell<HashMap<String, PathBuf>>,
    hook: OnceCell<String>,
    dirname: OnceCell<String>,
}

impl ResolutionCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached resolution for `key`, if any.
    pub fn get(&self, key: &str) -> Option<PathBuf> {
        self.views.borrow().get(key).cloned()
    }

    /// Records a successful resolution for `key`.
    pub fn insert(&self, key: impl Into<String>, path: impl Into<PathBuf>) {
        self.views.borrow_mut().insert(key.into(), path.into());
    }

    /// Number of cached resolutions.
    pub fn len(&self) -> usize {
        self.views.borrow().len()
    }

    /// Returns true if no resolutions are cached.
    pub fn is_empty(&self) -> bool {
        self.views.borrow().is_empty()
    }

    /// The extension-point prefix, computed once via `init`.
    ///
    /// Later calls return the first computed value regardless of `init`.
    pub fn hook_prefix(&self, init: impl FnOnce() -> String) -> &str {
        self.hook.get_or_init(init)
    }

    /// The base directory's name, computed once via `init`.
    pub fn dirname(&self, init: impl FnOnce() -> String) -> &str {
        self.dirname.get_or_init(init)
    }
}
