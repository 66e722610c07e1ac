//! View location: candidate filenames, search directories, and the
//! first-hit search.
//!
//! [`PathResolver`] turns a [`ViewPolicy`] — a plain value object describing
//! one render request against one configuration — into a resolved file path.
//! Resolution runs in two modes:
//!
//! - **Override search** (a locate folder is configured): candidate
//!   filenames are checked across the priority-ordered directory list; the
//!   first existing file wins. Child theme beats parent theme beats the
//!   package's own views.
//! - **Fast path** (no locate folder): the single deterministic package path
//!   is returned with no existence check at all.
//!
//! Both the filename list and the directory map pass through their
//! extension points before use, so hosts can add slug variants or inject
//! extra search locations.
//!
//! Successful resolutions are recorded in the [`ResolutionCache`] under the
//! first candidate filename; misses are not recorded, so a file created
//! later is discovered on the next request.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::cache::ResolutionCache;
use crate::config::ThemePaths;
use crate::hooks::{self, ViewContext, ViewHooks};

/// File extension of view files.
pub const VIEW_EXTENSION: &str = "jinja";

/// Search priority of the child theme directory (searched first).
pub const CHILD_THEME_PRIORITY: u32 = 1;

/// Search priority of the parent theme directory.
pub const PARENT_THEME_PRIORITY: u32 = 10;

/// Search priority of the package's own view directory (searched last).
pub const PACKAGE_PRIORITY: u32 = 100;

/// Everything the resolver needs to know about one request.
///
/// A flat value object assembled by the session from its configuration and
/// the current render request; the resolver has no other inputs.
#[derive(Debug, Clone, Copy)]
pub struct ViewPolicy<'a> {
    /// The requested view slug.
    pub slug: &'a str,
    /// The optional domain namespace.
    pub domain: Option<&'a str>,
    /// Base directory holding the package's views.
    pub base_dir: &'a Path,
    /// Extension-point prefix for the hooks consulted during resolution.
    pub hook_prefix: &'a str,
    /// Views subfolder name.
    pub folder: &'a str,
    /// Optional path segment between the base directory and the view path.
    pub base_path: Option<&'a str>,
    /// Folder holding views inside a domain entry.
    pub entry: &'a str,
    /// Theme-relative folder to search; `None` disables override search.
    pub locate: Option<&'a str>,
    /// Theme directories participating in override search.
    pub themes: &'a ThemePaths,
}

/// Locates the view file for a single request.
pub struct PathResolver<'a> {
    policy: ViewPolicy<'a>,
    hooks: &'a ViewHooks,
}

impl<'a> PathResolver<'a> {
    /// Creates a resolver for `policy`, consulting `hooks` during search.
    pub fn new(policy: ViewPolicy<'a>, hooks: &'a ViewHooks) -> Self {
        Self { policy, hooks }
    }

    /// The default view filename derived from the slug.
    pub fn view_file(&self) -> String {
        format!("{}.{}", self.policy.slug, VIEW_EXTENSION)
    }

    /// The view path relative to the base directory, with trailing separator.
    ///
    /// `{base_path}/{domain}/{entry}/{folder}/` with a domain set, otherwise
    /// `{base_path}/{folder}/`; the base-path segment appears only when
    /// configured.
    pub fn view_path(&self) -> String {
        let prefix = match self.policy.base_path {
            Some(path) => format!("{path}/"),
            None => String::new(),
        };

        match self.policy.domain {
            Some(domain) => format!(
                "{prefix}{domain}/{}/{}/",
                self.policy.entry, self.policy.folder
            ),
            None => format!("{prefix}{}/", self.policy.folder),
        }
    }

    /// The absolute package view directory for this request.
    pub fn absolute_view_dir(&self) -> PathBuf {
        self.policy.base_dir.join(self.view_path())
    }

    /// Candidate filenames to search for, in order.
    ///
    /// Starts from the single default filename and passes it through the
    /// `{prefix}_render_view` extension point, which may append, reorder, or
    /// replace entries.
    pub fn candidate_filenames(&self, ctx: &ViewContext) -> Vec<String> {
        let hook = hooks::render_view_hook(self.policy.hook_prefix);
        self.hooks.apply_file_names(&hook, vec![self.view_file()], ctx)
    }

    /// The directories to search, in ascending priority order.
    ///
    /// Defaults: child theme at priority 1 (only when it actually overrides
    /// the parent), parent theme at 10, the package view directory at 100.
    /// The priority map passes through the `{prefix}_view_paths` extension
    /// point before being flattened, so hosts may insert, remove, or rekey
    /// entries; on a key collision the last write wins.
    pub fn search_dirs(&self, ctx: &ViewContext) -> Vec<PathBuf> {
        let locate_folder = self.policy.locate.unwrap_or_default();

        let mut dirs = BTreeMap::new();
        if let Some(parent) = self.policy.themes.parent() {
            dirs.insert(PARENT_THEME_PRIORITY, parent.join(locate_folder));
        }
        if let Some(child) = self.policy.themes.override_child() {
            dirs.insert(CHILD_THEME_PRIORITY, child.join(locate_folder));
        }
        dirs.insert(PACKAGE_PRIORITY, self.absolute_view_dir());

        let hook = hooks::view_paths_hook(self.policy.hook_prefix);
        let dirs = self.hooks.apply_search_paths(&hook, dirs, ctx);

        dirs.into_values().collect()
    }

    /// Resolves the request to a file path, consulting and populating `cache`.
    ///
    /// The cache key is the first candidate filename. A cached entry
    /// short-circuits the search entirely; a miss runs [`Self::locate`].
    pub fn resolve(&self, cache: &ResolutionCache, ctx: &ViewContext) -> Option<PathBuf> {
        let filenames = self.candidate_filenames(ctx);
        let cache_key = match filenames.first() {
            Some(first) => first.clone(),
            None => self.view_file(),
        };

        if let Some(hit) = cache.get(&cache_key) {
            return Some(hit);
        }

        self.locate(&filenames, &cache_key, cache, ctx)
    }

    /// Runs the search for `filenames`, caching a hit under `cache_key`.
    ///
    /// With override search disabled this is the no-override fast path: the
    /// deterministic package target is cached and returned without touching
    /// the filesystem. Otherwise each filename is tried against each
    /// directory in priority order and the first existing file wins. A miss
    /// returns `None` and is deliberately not cached.
    pub fn locate(
        &self,
        filenames: &[String],
        cache_key: &str,
        cache: &ResolutionCache,
        ctx: &ViewContext,
    ) -> Option<PathBuf> {
        if self.policy.locate.is_none() {
            let target = self.absolute_view_dir().join(self.view_file());
            cache.insert(cache_key, target.clone());
            return Some(target);
        }

        let dirs = self.search_dirs(ctx);

        for name in filenames.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
            let name = name.trim_start_matches('/');
            for dir in &dirs {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    cache.insert(cache_key, candidate.clone());
                    return Some(candidate);
                }
            }
        }

        None
    }
}
