//! Named extension points for view resolution.
//!
//! External code can transform three intermediate values of the resolution
//! pipeline: the candidate filename list, the priority-keyed search
//! directories, and the argument bag. Hooks are registered under a full hook
//! name (the service's prefix plus a fixed suffix) and run synchronously in
//! registration order, each receiving the previous hook's output.
//!
//! Hooks are treated as pure transformations by the resolver: they should
//! derive their output from the input value and the [`ViewContext`] snapshot
//! only.
//!
//! # Hook points
//!
//! | Suffix         | Value                          | Used for                   |
//! |----------------|--------------------------------|----------------------------|
//! | `_render_view` | `Vec<String>`                  | candidate filenames        |
//! | `_view_paths`  | `BTreeMap<u32, PathBuf>`       | priority-keyed search dirs |
//! | `_view_args`   | `serde_json::Map`              | argument bag               |
//!
//! # Example
//!
//! ```rust
//! use viewfinder::hooks::ViewHooks;
//!
//! let mut hooks = ViewHooks::new();
//! hooks.on_file_names("my_plugin_render_view", |mut names, ctx| {
//!     // Check a slug variant before the default filename.
//!     names.insert(0, format!("{}-wide.jinja", ctx.slug));
//!     names
//! });
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::rc::Rc;

use serde_json::{Map, Value};

/// Hook name suffix for the candidate-filename extension point.
pub const RENDER_VIEW_SUFFIX: &str = "_render_view";

/// Hook name suffix for the search-directory extension point.
pub const VIEW_PATHS_SUFFIX: &str = "_view_paths";

/// Hook name suffix for the argument-bag extension point.
pub const VIEW_ARGS_SUFFIX: &str = "_view_args";

/// Full hook name for the candidate-filename point under `prefix`.
pub fn render_view_hook(prefix: &str) -> String {
    format!("{prefix}{RENDER_VIEW_SUFFIX}")
}

/// Full hook name for the search-directory point under `prefix`.
pub fn view_paths_hook(prefix: &str) -> String {
    format!("{prefix}{VIEW_PATHS_SUFFIX}")
}

/// Full hook name for the argument-bag point under `prefix`.
pub fn view_args_hook(prefix: &str) -> String {
    format!("{prefix}{VIEW_ARGS_SUFFIX}")
}

/// Snapshot of the current render request, passed to every hook.
#[derive(Debug, Clone, Default)]
pub struct ViewContext {
    /// The requested view slug.
    pub slug: String,
    /// The optional domain namespace.
    pub domain: Option<String>,
    /// The argument bag as merged so far.
    pub args: Map<String, Value>,
}

/// Type alias for candidate-filename hook functions.
pub type FileNamesFn = Rc<dyn Fn(Vec<String>, &ViewContext) -> Vec<String>>;

/// Type alias for search-directory hook functions.
///
/// The map is keyed by numeric priority; lower keys are searched first.
pub type SearchPathsFn = Rc<dyn Fn(BTreeMap<u32, PathBuf>, &ViewContext) -> BTreeMap<u32, PathBuf>>;

/// Type alias for argument-bag hook functions.
pub type ViewArgsFn = Rc<dyn Fn(Map<String, Value>, &ViewContext) -> Map<String, Value>>;

/// Registry of extension points, keyed by full hook name.
#[derive(Clone, Default)]
pub struct ViewHooks {
    file_names: HashMap<String, Vec<FileNamesFn>>,
    search_paths: HashMap<String, Vec<SearchPathsFn>>,
    view_args: HashMap<String, Vec<ViewArgsFn>>,
}

impl ViewHooks {
    /// Creates an empty hook registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.file_names.is_empty() && self.search_paths.is_empty() && self.view_args.is_empty()
    }

    /// Registers a candidate-filename hook under `hook`.
    pub fn on_file_names<F>(&mut self, hook: impl Into<String>, f: F)
    where
        F: Fn(Vec<String>, &ViewContext) -> Vec<String> + 'static,
    {
        self.file_names.entry(hook.into()).or_default().push(Rc::new(f));
    }

    /// Registers a search-directory hook under `hook`.
    pub fn on_search_paths<F>(&mut self, hook: impl Into<String>, f: F)
    where
        F: Fn(BTreeMap<u32, PathBuf>, &ViewContext) -> BTreeMap<u32, PathBuf> + 'static,
    {
        self.search_paths.entry(hook.into()).or_default().push(Rc::new(f));
    }

    /// Registers an argument-bag hook under `hook`.
    pub fn on_view_args<F>(&mut self, hook: impl Into<String>, f: F)
    where
        F: Fn(Map<String, Value>, &ViewContext) -> Map<String, Value> + 'static,
    {
        self.view_args.entry(hook.into()).or_default().push(Rc::new(f));
    }

    /// Runs the candidate-filename hooks registered under `hook`.
    pub fn apply_file_names(
        &self,
        hook: &str,
        mut value: Vec<String>,
        ctx: &ViewContext,
    ) -> Vec<String> {
        if let Some(fns) = self.file_names.get(hook) {
            for f in fns {
                value = f(value, ctx);
            }
        }
        value
    }

    /// Runs the search-directory hooks registered under `hook`.
    pub fn apply_search_paths(
        &self,
        hook: &str,
        mut value: BTreeMap<u32, PathBuf>,
        ctx: &ViewContext,
    ) -> BTreeMap<u32, PathBuf> {
        if let Some(fns) = self.search_paths.get(hook) {
            for f in fns {
                value = f(value, ctx);
            }
        }
        value
    }

    /// Runs the argument-bag hooks registered under `hook`.
    pub fn apply_view_args(
        &self,
        hook: &str,
        mut value: Map<String, Value>,
        ctx: &ViewContext,
    ) -> Map<String, Value> {
        if let Some(fns) = self.view_args.get(hook) {
            for f in fns {
                value = f(value, ctx);
            }
        }
        value
    }
}

impl std::fmt::Debug for ViewHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewHooks")
            .field("file_names", &self.file_names.len())
            .field("search_paths", &self.search_paths.len())
            .field("view_args", &self.view_args.len())
            .finish()
    }
}
