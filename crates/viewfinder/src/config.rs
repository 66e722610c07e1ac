//! Service configuration.
//!
//! [`ServiceConfig`] carries the per-service options recognized by
//! [`ViewService::register`](crate::session::ViewService::register). Options
//! merge into the existing configuration rather than replacing it, so
//! `register()` can be called repeatedly to adjust individual settings.
//!
//! Path-like options are stored with trailing separators trimmed, so path
//! assembly later on never produces doubled separators regardless of how the
//! caller wrote the option.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default name of the views subfolder inside the base directory.
pub const DEFAULT_VIEWS_FOLDER: &str = "views";

/// Default name of the folder holding views inside a domain entry.
pub const DEFAULT_ENTRY_FOLDER: &str = "Static";

/// Host debug flags governing the error boundary.
///
/// The two flags are independent: `halt_on_error` aborts with the failure
/// message, `log_on_error` records it through the `log` facade. With both
/// off, a failed render degrades to an empty string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugFlags {
    /// Abort the current request with the failure message.
    pub halt_on_error: bool,
    /// Log the failure message and continue.
    pub log_on_error: bool,
}

impl DebugFlags {
    /// Flags with both behaviors disabled (the production default).
    pub fn none() -> Self {
        Self::default()
    }

    /// Flags that halt on any view failure.
    pub fn halting() -> Self {
        Self {
            halt_on_error: true,
            log_on_error: false,
        }
    }

    /// Flags that log view failures and swallow them.
    pub fn logging() -> Self {
        Self {
            halt_on_error: false,
            log_on_error: true,
        }
    }
}

/// The active theme directories consulted during override search.
///
/// `parent` is the base theme; `child` is an optional overriding theme. The
/// child only participates in the search when it is set and different from
/// the parent, so single-theme setups don't check the same directory twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemePaths {
    parent: Option<PathBuf>,
    child: Option<PathBuf>,
}

impl ThemePaths {
    /// Creates theme paths with only a parent theme.
    pub fn parent_only(parent: impl Into<PathBuf>) -> Self {
        Self {
            parent: Some(untrail_path(parent.into())),
            child: None,
        }
    }

    /// Creates theme paths with a parent and a child theme.
    pub fn with_child(parent: impl Into<PathBuf>, child: impl Into<PathBuf>) -> Self {
        Self {
            parent: Some(untrail_path(parent.into())),
            child: Some(untrail_path(child.into())),
        }
    }

    /// The parent (base) theme directory, if configured.
    pub fn parent(&self) -> Option<&Path> {
        self.parent.as_deref()
    }

    /// The child theme directory, if configured.
    pub fn child(&self) -> Option<&Path> {
        self.child.as_deref()
    }

    /// The child theme directory, but only when it actually overrides.
    ///
    /// Returns `None` when no child is set or when the child equals the
    /// parent, so the active theme isn't redundantly searched twice.
    pub fn override_child(&self) -> Option<&Path> {
        match (&self.child, &self.parent) {
            (Some(child), Some(parent)) if child == parent => None,
            (Some(child), _) => Some(child),
            (None, _) => None,
        }
    }

    fn is_empty(&self) -> bool {
        self.parent.is_none() && self.child.is_none()
    }
}

/// Per-service configuration, set by `register()` and merged in place.
///
/// Recognized options:
///
/// | Option   | Meaning                                            | Default    |
/// |----------|----------------------------------------------------|------------|
/// | `dir`    | base directory holding the package's views         | (required) |
/// | `hook`   | extension-point prefix override                    | derived    |
/// | `folder` | views subfolder name                               | `views`    |
/// | `path`   | extra path segment between `dir` and the view path | none       |
/// | `entry`  | folder holding views inside a domain               | `Static`   |
/// | `locate` | theme-relative folder to search for overrides      | none       |
/// | `themes` | parent/child theme directories                     | none       |
/// | `debug`  | error-boundary flags                               | all off    |
///
/// Presence of `locate` toggles the multi-directory override search; without
/// it, resolution returns the single deterministic package path with no
/// existence check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    dir: Option<PathBuf>,
    hook: Option<String>,
    folder: Option<String>,
    path: Option<String>,
    entry: Option<String>,
    locate: Option<String>,
    themes: ThemePaths,
    debug: Option<DebugFlags>,
}

impl ServiceConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base directory holding the package's views.
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Overrides the derived extension-point prefix.
    pub fn hook(mut self, hook: impl Into<String>) -> Self {
        self.hook = Some(hook.into());
        self
    }

    /// Sets the views subfolder name.
    pub fn folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    /// Sets an extra path segment between the base directory and the view path.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the folder name holding views inside a domain entry.
    pub fn entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    /// Enables override search, naming the theme-relative folder to check.
    pub fn locate(mut self, folder: impl Into<String>) -> Self {
        self.locate = Some(folder.into());
        self
    }

    /// Sets the theme directories consulted during override search.
    pub fn themes(mut self, themes: ThemePaths) -> Self {
        self.themes = themes;
        self
    }

    /// Sets the error-boundary debug flags.
    pub fn debug(mut self, flags: DebugFlags) -> Self {
        self.debug = Some(flags);
        self
    }

    /// Merges `other` into `self`, overwriting only the options `other` sets.
    ///
    /// String and path options are trimmed of trailing separators on the way
    /// in; this is the single normalization point for configuration.
    pub(crate) fn merge(&mut self, other: ServiceConfig) {
        if let Some(dir) = other.dir {
            self.dir = Some(untrail_path(dir));
        }
        if let Some(hook) = other.hook {
            self.hook = Some(untrail(&hook));
        }
        if let Some(folder) = other.folder {
            self.folder = Some(untrail(&folder));
        }
        if let Some(path) = other.path {
            self.path = Some(untrail(&path));
        }
        if let Some(entry) = other.entry {
            self.entry = Some(untrail(&entry));
        }
        if let Some(locate) = other.locate {
            self.locate = Some(untrail(&locate));
        }
        if !other.themes.is_empty() {
            self.themes = other.themes;
        }
        if let Some(debug) = other.debug {
            self.debug = Some(debug);
        }
    }

    /// The registered base directory, if any.
    pub fn base_dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// The explicit extension-point prefix override, if any.
    pub fn hook_override(&self) -> Option<&str> {
        self.hook.as_deref()
    }

    /// The views subfolder name, falling back to [`DEFAULT_VIEWS_FOLDER`].
    pub fn views_folder(&self) -> &str {
        self.folder.as_deref().unwrap_or(DEFAULT_VIEWS_FOLDER)
    }

    /// The extra base-path segment, if any.
    pub fn base_path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// The domain entry folder name, falling back to [`DEFAULT_ENTRY_FOLDER`].
    pub fn entry_folder(&self) -> &str {
        self.entry.as_deref().unwrap_or(DEFAULT_ENTRY_FOLDER)
    }

    /// The theme-relative locate folder; `None` disables override search.
    pub fn locate_folder(&self) -> Option<&str> {
        self.locate.as_deref()
    }

    /// The configured theme directories.
    pub fn theme_paths(&self) -> &ThemePaths {
        &self.themes
    }

    /// The effective debug flags (all off when never configured).
    pub fn debug_flags(&self) -> DebugFlags {
        self.debug.unwrap_or_default()
    }
}

fn untrail(value: &str) -> String {
    value
        .trim_end_matches(|c| c == '/' || c == '\\')
        .to_string()
}

fn untrail_path(value: PathBuf) -> PathBuf {
    match value.to_str() {
        Some(s) => PathBuf::from(untrail(s)),
        None => value,
    }
}
